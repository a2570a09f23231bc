use std::fs;
use std::path::{Path, PathBuf};

use fleetcast::cli::{Cli, Commands, run};
use fleetcast::config::OutputFormat;
use fleetcast::forecast::ForecastArgs;
use fleetcast::inspect::InspectArgs;
use fleetcast::CockpitError;
use serde_json::Value;
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_artifact.json")
}

fn forecast(model: &str, region: &str, year: &str) -> ForecastArgs {
    ForecastArgs {
        model: model.to_string(),
        region: region.to_string(),
        year: year.to_string(),
        fuel: "Electric".to_string(),
        transmission: "Automatic".to_string(),
        engine: "3.0".to_string(),
        format: None,
        trend: false,
        output: None,
    }
}

fn cli(artifact: Option<PathBuf>, config: Option<PathBuf>, command: Commands) -> Cli {
    Cli {
        artifact,
        config,
        log_level: "off".to_string(),
        log_json: false,
        log_file: None,
        command,
    }
}

#[test]
fn config_file_supplies_artifact_format_and_growth() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fleetcast.conf");
    fs::write(
        &config,
        format!(
            "# test config\nartifact={}\nformat=json\ngrowth.Europe=1.1\n",
            fixture().display()
        ),
    )
    .unwrap();
    let output = dir.path().join("forecast.json");
    let mut args = forecast("X5", "Europe", "2027");
    args.output = Some(output.clone());

    run(cli(None, Some(config), Commands::Forecast(args))).unwrap();

    let document: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    let entry = &document["forecasts"][0];
    // 6010 * 1.1^2 = 7272.1
    assert_eq!(entry["forecast"]["result"]["volume"], 7272);
    assert_eq!(entry["forecast"]["growth"]["multiplier"], 1.1);
    assert_eq!(entry["card"]["growth_note"], "growth x1.100/yr");
}

#[test]
fn artifact_flag_beats_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fleetcast.conf");
    fs::write(&config, "artifact=/nonexistent/bundle.json\n").unwrap();

    let result = run(cli(
        Some(fixture()),
        Some(config),
        Commands::Inspect(InspectArgs { json: true }),
    ));
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn unknown_config_key_reports_line() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fleetcast.conf");
    fs::write(&config, "format=text\ncolour=blue\n").unwrap();

    let error = run(cli(
        Some(fixture()),
        Some(config),
        Commands::Inspect(InspectArgs { json: true }),
    ))
    .unwrap_err();
    assert!(matches!(error, CockpitError::Config { line: 2, .. }), "{error}");
}

#[test]
fn html_report_is_written_for_trend() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("reports/x5.html");
    let mut args = forecast("X5", "Asia", "2025");
    args.format = Some(OutputFormat::Html);
    args.trend = true;
    args.output = Some(output.clone());

    run(cli(Some(fixture()), None, Commands::Forecast(args))).unwrap();

    let html = fs::read_to_string(output).unwrap();
    assert_eq!(html.matches("<section class=\"result-card\">").count(), 6);
    assert!(html.contains("2030 FORECAST: X5"));
}

#[test]
fn corrupt_artifact_is_rejected() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("bundle.json");
    let broken = fs::read_to_string(fixture())
        .unwrap()
        .replace("\"#F4F4F4\"", "\"not-a-colour\"");
    fs::write(&artifact, broken).unwrap();

    let error = run(cli(
        Some(artifact),
        None,
        Commands::Forecast(forecast("X5", "Asia", "2025")),
    ))
    .unwrap_err();
    assert!(error.to_string().starts_with("invalid artifact"), "{error}");
    assert_eq!(error.exit_code(), 1);
}
