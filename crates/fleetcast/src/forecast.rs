use std::path::PathBuf;

use clap::Args;
use fleetcast_core::{EngineSize, Forecast, ForecastInputs, ForecastYear, Fuel, Transmission};

use crate::cockpit::Cockpit;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::{ForecastCard, ForecastDocument, render_html, render_text, render_trend_text};

#[derive(Debug, Clone, Args)]
pub struct ForecastArgs {
    /// Model series, as listed by `fleetcast options`.
    #[arg(long)]
    pub model: String,

    /// Target market.
    #[arg(long)]
    pub region: String,

    #[arg(long, default_value = "2025")]
    pub year: String,

    /// Electric, Hybrid, Petrol or Diesel.
    #[arg(long, default_value = "Electric")]
    pub fuel: String,

    /// Automatic or Manual.
    #[arg(long, default_value = "Automatic")]
    pub transmission: String,

    /// Engine size in litres.
    #[arg(long, default_value = "1.5")]
    pub engine: String,

    /// Output format; defaults to the config file's `format`, then text.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Project every year 2025-2030 instead of just `--year`.
    #[arg(long)]
    pub trend: bool,

    /// Write the rendered output here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ForecastArgs {
    pub fn inputs(&self) -> Result<ForecastInputs> {
        Ok(ForecastInputs::new(
            self.model.trim(),
            self.region.trim(),
            self.year.parse::<ForecastYear>()?,
            self.fuel.parse::<Fuel>()?,
            self.transmission.parse::<Transmission>()?,
            self.engine.parse::<EngineSize>()?,
        ))
    }
}

/// Run the pipeline and render it in the requested format.
pub fn render_forecast(cockpit: &Cockpit, args: &ForecastArgs) -> Result<String> {
    let inputs = args.inputs()?;
    let forecasts: Vec<Forecast> = if args.trend {
        cockpit.context.trend(&inputs)?
    } else {
        vec![cockpit.context.forecast(&inputs)?]
    };

    let format = args.format.unwrap_or(cockpit.config.format);
    let cards: Vec<ForecastCard> = forecasts.iter().map(ForecastCard::from_forecast).collect();

    let rendered = match format {
        OutputFormat::Json => {
            let document = ForecastDocument::new(&cockpit.artifact, &forecasts);
            serde_json::to_string_pretty(&document)? + "\n"
        }
        OutputFormat::Html => render_html(&cards, cockpit.palette()),
        OutputFormat::Text if args.trend => render_trend_text(&cards),
        OutputFormat::Text => cards.iter().map(render_text).collect(),
    };
    Ok(rendered)
}

pub fn run_forecast(cockpit: &Cockpit, args: ForecastArgs) -> Result<()> {
    let rendered = render_forecast(cockpit, &args)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, rendered)?;
            tracing::info!(target: "fleetcast.cli", path = %path.display(), "forecast written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use fleetcast_core::ForecastError;

    use super::*;
    use crate::config::{AppConfig, ConfigFile};
    use crate::error::CockpitError;

    fn cockpit() -> Cockpit {
        let artifact = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_artifact.json");
        Cockpit::open(AppConfig::merge(Some(&artifact), None, ConfigFile::default())).unwrap()
    }

    fn args(format: OutputFormat) -> ForecastArgs {
        ForecastArgs {
            model: " X5 ".to_string(),
            region: "Europe".to_string(),
            year: "2027".to_string(),
            fuel: "electric".to_string(),
            transmission: "Automatic".to_string(),
            engine: "3.0L".to_string(),
            format: Some(format),
            trend: false,
            output: None,
        }
    }

    #[test]
    fn text_card_for_fixture() {
        let text = render_forecast(&cockpit(), &args(OutputFormat::Text)).unwrap();
        assert!(text.starts_with("2027 FORECAST: X5\n"));
        assert!(text.contains("6,155 Units"));
        assert!(text.contains("$291,881,040"));
        assert!(text.contains("growth x1.012/yr"));
    }

    #[test]
    fn base_year_is_not_grown() {
        let mut request = args(OutputFormat::Json);
        request.year = "2025".to_string();
        let rendered = render_forecast(&cockpit(), &request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let forecast = &value["forecasts"][0]["forecast"];
        assert_eq!(forecast["result"]["volume"], 6010);
        assert_eq!(forecast["result"]["revenue"], 285_000_000.0);
        assert_eq!(forecast["projection"]["years_ahead"], 0);
        assert_eq!(value["status"], "ok");
        assert_eq!(value["artifact"]["sha256"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn trend_renders_six_years() {
        let mut request = args(OutputFormat::Text);
        request.trend = true;
        let text = render_forecast(&cockpit(), &request).unwrap();
        for year in 2025..=2030 {
            assert!(text.contains(&format!("\n{year} ")), "{year} missing:\n{text}");
        }
    }

    #[test]
    fn html_uses_artifact_palette() {
        let html = render_forecast(&cockpit(), &args(OutputFormat::Html)).unwrap();
        assert!(html.contains("#1C69D4"));
        assert!(html.contains("2027 FORECAST: X5"));
    }

    #[test]
    fn bad_inputs_are_rejected_before_forecasting() {
        let cockpit = cockpit();

        let mut request = args(OutputFormat::Text);
        request.year = "2031".to_string();
        let error = render_forecast(&cockpit, &request).unwrap_err();
        assert!(matches!(
            error,
            CockpitError::Forecast(ForecastError::InvalidYear { year: 2031 })
        ));

        let mut request = args(OutputFormat::Text);
        request.engine = "2.2".to_string();
        assert_eq!(render_forecast(&cockpit, &request).unwrap_err().exit_code(), 2);

        let mut request = args(OutputFormat::Text);
        request.region = "Antarctica".to_string();
        let error = render_forecast(&cockpit, &request).unwrap_err();
        assert_eq!(error.to_string(), "unknown region: Antarctica");
    }
}
