use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cockpit::Cockpit;
use crate::config::AppConfig;
use crate::error::Result;
use crate::forecast::{ForecastArgs, run_forecast};
use crate::inspect::{InspectArgs, run_inspect};
use crate::options::{OptionsArgs, run_options};
use crate::session::{FormArgs, run_form};
use crate::telemetry::{self, TelemetryOptions};

#[derive(Debug, Parser)]
#[command(
    name = "fleetcast",
    about = "Strategic sales forecast cockpit: volume and revenue projections from a trained artifact",
    version
)]
pub struct Cli {
    /// Model artifact (JSON bundle).
    #[arg(long, global = true, env = "FLEETCAST_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// `key=value` config file.
    #[arg(long, global = true, env = "FLEETCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `fleetcast.forecast=debug`.
    #[arg(long, global = true, env = "FLEETCAST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast one configuration (or every year with `--trend`).
    Forecast(ForecastArgs),

    /// Interactive forecast form.
    Form(FormArgs),

    /// List the values each input accepts.
    Options(OptionsArgs),

    /// Summarize the loaded artifact and growth table.
    Inspect(InspectArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, Commands::Form(_));
    let filter = if interactive && cli.log_file.is_none() {
        "off"
    } else {
        cli.log_level.as_str()
    };
    let installed = telemetry::init(&TelemetryOptions {
        filter,
        json: cli.log_json,
        log_file: cli.log_file.as_deref(),
    })?;
    if !installed {
        tracing::debug!(
            target: "fleetcast.cli",
            "tracing subscriber already installed; log flags ignored"
        );
    }

    let config = AppConfig::resolve(cli.artifact.as_deref(), cli.config.as_deref())?;
    tracing::debug!(
        target: "fleetcast.cli",
        artifact = %config.artifact_path.display(),
        format = %config.format,
        overrides = config.growth_overrides.len(),
        "configuration resolved"
    );
    let cockpit = Cockpit::open(config)?;

    match cli.command {
        Commands::Forecast(args) => run_forecast(&cockpit, args),
        Commands::Form(args) => run_form(&cockpit, args),
        Commands::Options(args) => run_options(&cockpit, args),
        Commands::Inspect(args) => run_inspect(&cockpit, args),
    }
}
