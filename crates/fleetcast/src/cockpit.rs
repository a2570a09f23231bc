use std::path::Path;

use fleetcast_core::{Artifact, ForecastContext, Palette};

use crate::config::AppConfig;
use crate::error::{CockpitError, Result};

/// Loaded startup state: configuration, artifact, and the forecast context
/// built from them. Constructed once per process and only read afterwards.
#[derive(Debug)]
pub struct Cockpit {
    pub config: AppConfig,
    pub artifact: Artifact,
    pub context: ForecastContext,
}

impl Cockpit {
    pub fn open(config: AppConfig) -> Result<Self> {
        ensure_exists(&config.artifact_path)?;
        let artifact = Artifact::load(&config.artifact_path)?;
        let growth = config.growth_table()?;

        for region in artifact.bundle.region_encoder.names() {
            if !growth.contains(region) {
                tracing::warn!(
                    target: "fleetcast.cockpit",
                    region = %region,
                    "artifact region has no growth rate; forecasts will use the default"
                );
            }
        }

        let context = ForecastContext::from_bundle(&artifact.bundle, growth);
        Ok(Self {
            config,
            artifact,
            context,
        })
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.artifact.bundle.palette
    }
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CockpitError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}
