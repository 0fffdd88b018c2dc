use clap::Args;
use serde_json::Value;

use logistics_pnl_core::projection::run_projection;

use super::scenario::ScenarioArgs;

/// Arguments for a single projection
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.scenario.resolve()?;
    let result = run_projection(&request)?;
    Ok(serde_json::to_value(result)?)
}
