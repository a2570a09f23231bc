//! The model bundle produced by the training pipeline.
//!
//! The bundle is a JSON document:
//!
//! ```json
//! {
//!   "palette": ["#1C69D4", "#6F6F6F", "#BBBBBB", "#0653B6", "#F4F4F4"],
//!   "model_encoder": { "X5": 7, "3 Series": 2 },
//!   "region_encoder": { "Europe": 2, "Asia": 1 },
//!   "vol_model": { "kind": "linear", "intercept": 0.0, "coefficients": [...] },
//!   "rev_model": { "kind": "forest", "trees": [...] }
//! }
//! ```
//!
//! It is read once at startup, checked, and never mutated.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ForecastError, LookupTable, Result};
use crate::predictor::RegressionModel;

/// Name → integer code table. Iteration is in sorted name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeTable(BTreeMap<String, i64>);

impl CodeTable {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Code for `name`, or a lookup error naming `table`.
    pub fn code(&self, table: LookupTable, name: &str) -> Result<i64> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| ForecastError::lookup(table, name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Five `#RRGGBB` colours: primary, secondary, muted, accent, background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette([String; 5]);

impl Palette {
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    #[must_use]
    pub fn secondary(&self) -> &str {
        &self.0[1]
    }

    #[must_use]
    pub fn muted(&self) -> &str {
        &self.0[2]
    }

    #[must_use]
    pub fn accent(&self) -> &str {
        &self.0[3]
    }

    #[must_use]
    pub fn background(&self) -> &str {
        &self.0[4]
    }

    #[must_use]
    pub fn colors(&self) -> &[String; 5] {
        &self.0
    }

    pub fn validate(&self) -> Result<()> {
        for (idx, color) in self.0.iter().enumerate() {
            if !is_hex_color(color) {
                return Err(ForecastError::artifact(format!(
                    "palette entry {idx} is not a #RRGGBB colour: {color:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(
            ["#1C69D4", "#6F6F6F", "#BBBBBB", "#0653B6", "#F4F4F4"].map(ToString::to_string),
        )
    }
}

fn is_hex_color(raw: &str) -> bool {
    raw.len() == 7
        && raw.starts_with('#')
        && raw[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub palette: Palette,
    pub model_encoder: CodeTable,
    pub region_encoder: CodeTable,
    pub vol_model: RegressionModel,
    pub rev_model: RegressionModel,
}

impl ArtifactBundle {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(raw)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        self.palette.validate()?;
        if self.model_encoder.is_empty() {
            return Err(ForecastError::artifact("model_encoder is empty"));
        }
        if self.region_encoder.is_empty() {
            return Err(ForecastError::artifact("region_encoder is empty"));
        }
        self.vol_model
            .validate()
            .map_err(|err| prefix_artifact_error("vol_model", err))?;
        self.rev_model
            .validate()
            .map_err(|err| prefix_artifact_error("rev_model", err))?;
        Ok(())
    }
}

fn prefix_artifact_error(field: &str, error: ForecastError) -> ForecastError {
    match error {
        ForecastError::Artifact { reason } => ForecastError::artifact(format!("{field}: {reason}")),
        other => other,
    }
}

/// A bundle together with where it came from.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    /// Lower-case hex SHA-256 of the file bytes.
    pub sha256: String,
    pub bundle: ArtifactBundle,
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let sha256 = hex_digest(&bytes);
        let raw = std::str::from_utf8(&bytes)
            .map_err(|err| ForecastError::artifact(format!("not UTF-8: {err}")))?;
        let bundle = ArtifactBundle::from_json_str(raw)?;

        tracing::info!(
            target: "fleetcast.artifact",
            path = %path.display(),
            sha256 = %sha256,
            models = bundle.model_encoder.len(),
            regions = bundle.region_encoder.len(),
            vol_model = bundle.vol_model.kind(),
            rev_model = bundle.rev_model.kind(),
            "artifact loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            sha256,
            bundle,
        })
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
