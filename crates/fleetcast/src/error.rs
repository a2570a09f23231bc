use std::path::PathBuf;

use fleetcast_core::ForecastError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CockpitError>;

#[derive(Debug, Error)]
pub enum CockpitError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("config line {line}: {message}")]
    Config { line: usize, message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl CockpitError {
    /// Selection mistakes exit 2, explicit exits carry their own code,
    /// everything else exits 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::Forecast(error) if error.is_input_error() => 2,
            Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config(line: usize, message: impl Into<String>) -> Self {
        Self::Config {
            line,
            message: message.into(),
        }
    }
}
