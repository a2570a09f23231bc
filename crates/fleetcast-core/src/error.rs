use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Which encoding table a failed lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Model,
    Region,
}

impl LookupTable {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Region => "region",
        }
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("unknown {table}: {name}")]
    Lookup { table: LookupTable, name: String },

    #[error("forecast year out of range: {year} (expected 2025..=2030)")]
    InvalidYear { year: i64 },

    #[error("unsupported engine size: {liters} L")]
    InvalidEngineSize { liters: f64 },

    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },

    #[error("unknown fuel technology: {value}")]
    UnknownFuel { value: String },

    #[error("unknown transmission: {value}")]
    UnknownTransmission { value: String },

    #[error("invalid growth multiplier for {region}: {value}")]
    InvalidGrowthRate { region: String, value: f64 },

    #[error("invalid artifact: {reason}")]
    Artifact { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    #[must_use]
    pub fn artifact(reason: impl Into<String>) -> Self {
        Self::Artifact {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn lookup(table: LookupTable, name: impl Into<String>) -> Self {
        Self::Lookup {
            table,
            name: name.into(),
        }
    }

    /// True for errors caused by a selection rather than by the artifact or I/O.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Lookup { .. }
                | Self::InvalidYear { .. }
                | Self::InvalidEngineSize { .. }
                | Self::NotANumber { .. }
                | Self::UnknownFuel { .. }
                | Self::UnknownTransmission { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ForecastError, LookupTable};

    #[test]
    fn lookup_error_names_table_and_value() {
        let error = ForecastError::lookup(LookupTable::Model, "Z9");
        assert_eq!(error.to_string(), "unknown model: Z9");
        assert!(error.is_input_error());
    }

    #[test]
    fn artifact_error_is_not_an_input_error() {
        let error = ForecastError::artifact("palette must have 5 entries");
        assert_eq!(
            error.to_string(),
            "invalid artifact: palette must have 5 entries"
        );
        assert!(!error.is_input_error());
    }
}
