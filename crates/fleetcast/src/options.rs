use clap::Args;
use fleetcast_core::{EngineSize, ForecastContext, ForecastYear, Fuel, Transmission};
use serde::Serialize;

use crate::cockpit::Cockpit;
use crate::error::Result;
use crate::output::{OutputIntegration, output_for};

#[derive(Debug, Clone, Args)]
pub struct OptionsArgs {
    /// Print the choices as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Every value the form offers, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choices {
    pub models: Vec<String>,
    pub regions: Vec<String>,
    pub years: Vec<ForecastYear>,
    pub fuels: Vec<Fuel>,
    pub transmissions: Vec<Transmission>,
    pub engine_sizes: Vec<EngineSize>,
}

impl Choices {
    #[must_use]
    pub fn from_context(context: &ForecastContext) -> Self {
        Self {
            models: context.model_codes().names().map(str::to_string).collect(),
            regions: context.region_codes().names().map(str::to_string).collect(),
            years: ForecastYear::all().collect(),
            fuels: Fuel::ALL.to_vec(),
            transmissions: Transmission::ALL.to_vec(),
            engine_sizes: EngineSize::all().collect(),
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run_options(cockpit: &Cockpit, args: OptionsArgs) -> Result<()> {
    let choices = Choices::from_context(&cockpit.context);
    let integration = OutputIntegration::detect();

    if args.json || integration.should_emit_json() {
        println!("{}", serde_json::to_string_pretty(&choices)?);
        return Ok(());
    }

    let ui = output_for(&integration);
    ui.rule(Some("fleetcast options"));
    ui.info(&format!("models: {}", join(&choices.models)));
    ui.info(&format!("regions: {}", join(&choices.regions)));
    ui.info(&format!("years: {}", join(&choices.years)));
    ui.info(&format!("fuels: {}", join(&choices.fuels)));
    ui.info(&format!("transmissions: {}", join(&choices.transmissions)));
    ui.info(&format!("engine sizes (L): {}", join(&choices.engine_sizes)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use fleetcast_core::{CodeTable, EncodedVector, GrowthTable};

    use super::*;

    #[test]
    fn choices_are_sorted_and_complete() {
        let context = ForecastContext::new(
            CodeTable::from_pairs([("X5", 8), ("1 Series", 0), ("i3", 10)]),
            CodeTable::from_pairs([("Europe", 2), ("Asia", 1)]),
            |_: &EncodedVector| 0.0,
            |_: &EncodedVector| 0.0,
            GrowthTable::default(),
        );
        let choices = Choices::from_context(&context);

        assert_eq!(choices.models, ["1 Series", "X5", "i3"]);
        assert_eq!(choices.regions, ["Asia", "Europe"]);
        assert_eq!(choices.years.len(), 6);
        assert_eq!(choices.fuels[0], Fuel::Electric);
        assert_eq!(join(&choices.engine_sizes), "1.5, 2.0, 2.5, 3.0, 3.5, 4.4, 6.0");
    }
}
