use clap::Args;
use serde::Serialize;

use crate::cockpit::Cockpit;
use crate::error::Result;
use crate::output::{OutputIntegration, output_for};

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRow {
    pub region: String,
    pub multiplier: f64,
    pub overridden: bool,
    pub in_artifact: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub artifact_path: String,
    pub sha256: String,
    pub models: usize,
    pub regions: usize,
    pub vol_model: String,
    pub rev_model: String,
    pub palette: Vec<String>,
    pub growth: Vec<GrowthRow>,
    /// Artifact regions that will forecast with the default multiplier.
    pub fallback_regions: Vec<String>,
    pub config_path: Option<String>,
}

impl Inspection {
    #[must_use]
    pub fn build(cockpit: &Cockpit) -> Self {
        let bundle = &cockpit.artifact.bundle;
        let growth = cockpit.context.growth();
        Self {
            artifact_path: cockpit.artifact.path.display().to_string(),
            sha256: cockpit.artifact.sha256.clone(),
            models: bundle.model_encoder.len(),
            regions: bundle.region_encoder.len(),
            vol_model: bundle.vol_model.describe(),
            rev_model: bundle.rev_model.describe(),
            palette: bundle.palette.colors().to_vec(),
            growth: growth
                .iter()
                .map(|(region, multiplier)| GrowthRow {
                    region: region.to_string(),
                    multiplier,
                    overridden: growth.is_override(region),
                    in_artifact: bundle.region_encoder.contains(region),
                })
                .collect(),
            fallback_regions: bundle
                .region_encoder
                .names()
                .filter(|region| !growth.contains(region))
                .map(str::to_string)
                .collect(),
            config_path: cockpit
                .config
                .config_path
                .as_ref()
                .map(|path| path.display().to_string()),
        }
    }
}

pub fn run_inspect(cockpit: &Cockpit, args: InspectArgs) -> Result<()> {
    let inspection = Inspection::build(cockpit);
    let integration = OutputIntegration::detect();

    if args.json || integration.should_emit_json() {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    let ui = output_for(&integration);
    ui.rule(Some("fleetcast artifact"));
    ui.info(&format!("path={}", inspection.artifact_path));
    ui.info(&format!("sha256={}", inspection.sha256));
    ui.info(&format!(
        "models={} regions={}",
        inspection.models, inspection.regions
    ));
    ui.info(&format!("vol_model={}", inspection.vol_model));
    ui.info(&format!("rev_model={}", inspection.rev_model));
    ui.info(&format!("palette={}", inspection.palette.join(" ")));
    if let Some(path) = &inspection.config_path {
        ui.info(&format!("config={path}"));
    }

    ui.rule(Some("growth table"));
    for row in &inspection.growth {
        let mut line = format!("{:<16} x{:.3}", row.region, row.multiplier);
        if row.overridden {
            line.push_str("  (config override)");
        }
        if !row.in_artifact {
            line.push_str("  (not in artifact)");
        }
        ui.info(&line);
    }

    if inspection.fallback_regions.is_empty() {
        ui.success("every artifact region has a growth rate");
    } else {
        ui.warning(&format!(
            "regions using the default multiplier: {}",
            inspection.fallback_regions.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::{AppConfig, ConfigFile};

    #[test]
    fn summarizes_fixture_with_overrides() {
        let artifact = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_artifact.json");
        let mut file = ConfigFile::default();
        file.growth.insert("Asia".to_string(), 1.05);
        file.growth.insert("Oceania".to_string(), 1.02);
        let cockpit = Cockpit::open(AppConfig::merge(Some(&artifact), None, file)).unwrap();

        let inspection = Inspection::build(&cockpit);
        assert_eq!(inspection.models, 12);
        assert_eq!(inspection.regions, 6);
        assert_eq!(inspection.vol_model, "linear (11 coefficients)");
        assert!(inspection.rev_model.starts_with("boosted"));
        assert_eq!(inspection.palette[0], "#1C69D4");
        assert!(inspection.fallback_regions.is_empty());

        let asia = inspection.growth.iter().find(|row| row.region == "Asia").unwrap();
        assert!(asia.overridden);
        assert_eq!(asia.multiplier, 1.05);
        let oceania = inspection.growth.iter().find(|row| row.region == "Oceania").unwrap();
        assert!(!oceania.in_artifact);
        let europe = inspection.growth.iter().find(|row| row.region == "Europe").unwrap();
        assert!(!europe.overridden);
    }
}
