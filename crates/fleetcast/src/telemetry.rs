//! Process-wide `tracing` subscriber.
//!
//! Logs go to stderr, or to `--log-file` when given. The interactive form
//! owns the terminal, so without a log file it runs with logging off.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{CockpitError, Result};

#[derive(Debug, Clone, Default)]
pub struct TelemetryOptions<'a> {
    pub filter: &'a str,
    pub json: bool,
    pub log_file: Option<&'a Path>,
}

pub fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|err| CockpitError::invalid(format!("invalid log filter {filter:?}: {err}")))
}

/// Install the global subscriber. Returns false when one was already
/// installed, in which case `options` had no effect.
pub fn init(options: &TelemetryOptions<'_>) -> Result<bool> {
    let filter = parse_filter(options.filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // try_init only fails when a subscriber is already set.
    let installed = match (options.log_file, options.json) {
        (Some(path), json) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        (None, true) => builder.with_writer(std::io::stderr).json().try_init(),
        (None, false) => builder.with_writer(std::io::stderr).try_init(),
    }
    .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        for filter in ["warn", "info", "off", "fleetcast.forecast=debug,warn"] {
            assert!(parse_filter(filter).is_ok(), "{filter}");
        }
    }

    #[test]
    fn rejects_garbage_filter() {
        let error = parse_filter("fleetcast=loud").unwrap_err();
        assert!(matches!(error, CockpitError::InvalidArgument { .. }));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let options = TelemetryOptions {
            filter: "off",
            json: false,
            log_file: None,
        };
        // Another test may have installed the subscriber first.
        let _ = init(&options).unwrap();
        assert!(!init(&options).unwrap());
    }
}
