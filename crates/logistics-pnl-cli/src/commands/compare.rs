use clap::Args;
use serde_json::Value;

use logistics_pnl_core::comparison::run_comparison;

use super::scenario::ScenarioArgs;

/// Arguments for plan vs scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.scenario.resolve()?;
    let result = run_comparison(&request)?;
    Ok(serde_json::to_value(result)?)
}
