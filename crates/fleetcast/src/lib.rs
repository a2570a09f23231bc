#![forbid(unsafe_code)]

pub mod cli;
pub mod cockpit;
pub mod config;
pub mod error;
pub mod forecast;
pub mod form;
pub mod inspect;
pub mod options;
pub mod output;
pub mod report;
pub mod session;
pub mod telemetry;

pub use cli::run_from_env;
pub use error::{CockpitError, Result};
