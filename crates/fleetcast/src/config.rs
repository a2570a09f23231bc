//! Startup configuration.
//!
//! Sources, highest precedence first: CLI flags (and their env vars),
//! an optional `key=value` config file, built-in defaults.
//!
//! ```text
//! # fleetcast.conf
//! artifact=/srv/fleetcast/artifact.json
//! format=html
//! growth.Asia=1.031
//! growth."Middle East"=1.02
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use fleetcast_core::GrowthTable;
use serde::Serialize;

use crate::error::{CockpitError, Result};

/// Artifact file name looked up in the working directory when nothing else
/// names one.
pub const DEFAULT_ARTIFACT: &str = "fleetcast_artifact.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CockpitError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(CockpitError::invalid(format!(
                "unknown output format: {other} (expected text, json or html)"
            ))),
        }
    }
}

/// Values read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub artifact: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub growth: BTreeMap<String, f64>,
}

pub fn parse_config_content(content: &str) -> Result<ConfigFile> {
    let mut config = ConfigFile::default();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value_raw)) = line.split_once('=') else {
            return Err(CockpitError::config(line_no, "expected key=value"));
        };
        let key = key.trim();
        let value = unquote(value_raw.trim());

        if key == "artifact" {
            if value.is_empty() {
                return Err(CockpitError::config(line_no, "artifact path is empty"));
            }
            config.artifact = Some(PathBuf::from(value));
        } else if key == "format" {
            let format = value
                .parse::<OutputFormat>()
                .map_err(|err| CockpitError::config(line_no, err.to_string()))?;
            config.format = Some(format);
        } else if let Some(region) = key.strip_prefix("growth.") {
            let region = unquote(region.trim());
            if region.is_empty() {
                return Err(CockpitError::config(line_no, "growth key has no region"));
            }
            let rate = value.parse::<f64>().map_err(|_| {
                CockpitError::config(line_no, format!("growth rate is not a number: {value}"))
            })?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CockpitError::config(
                    line_no,
                    format!("growth rate must be positive: {value}"),
                ));
            }
            config.growth.insert(region.to_string(), rate);
        } else {
            return Err(CockpitError::config(line_no, format!("unknown key: {key}")));
        }
    }

    Ok(config)
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(CockpitError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_config_content(&content)
}

/// Effective configuration after merging all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub artifact_path: PathBuf,
    pub format: OutputFormat,
    pub growth_overrides: BTreeMap<String, f64>,
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn resolve(artifact_flag: Option<&Path>, config_flag: Option<&Path>) -> Result<Self> {
        let file = match config_flag {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };
        Ok(Self::merge(artifact_flag, config_flag, file))
    }

    #[must_use]
    pub fn merge(artifact_flag: Option<&Path>, config_flag: Option<&Path>, file: ConfigFile) -> Self {
        let artifact_path = artifact_flag
            .map(Path::to_path_buf)
            .or(file.artifact)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT));
        Self {
            artifact_path,
            format: file.format.unwrap_or_default(),
            growth_overrides: file.growth,
            config_path: config_flag.map(Path::to_path_buf),
        }
    }

    /// Built-in growth table with config overrides applied.
    pub fn growth_table(&self) -> Result<GrowthTable> {
        let mut table = GrowthTable::default();
        for (region, rate) in &self.growth_overrides {
            table = table.with_rate(region.clone(), *rate)?;
        }
        Ok(table)
    }
}
