use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use logistics_pnl_core::sensitivity::{
    self, GridInput, Lever, LeverRange, SweepInput, SweepMetric,
};

use super::scenario::ScenarioArgs;

/// Arguments for lever sensitivity
#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Lever to sweep in format name:min:max:step
    /// (e.g. "robotization:0:100:10")
    #[arg(long)]
    pub lever: String,

    /// Second lever (optional, produces a two-way grid)
    #[arg(long)]
    pub lever2: Option<String>,

    /// Figure tracked in the two-way grid
    #[arg(long, default_value = "ebitda")]
    pub metric: String,
}

fn parse_lever_range(raw: &str) -> Result<LeverRange, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(format!("Lever range must be name:min:max:step, got '{}'", raw).into());
    }
    let number = |s: &str| -> Result<Decimal, Box<dyn std::error::Error>> {
        s.trim()
            .parse()
            .map_err(|e| format!("Invalid number '{}' in '{}': {}", s, raw, e).into())
    };
    Ok(LeverRange {
        lever: parts[0].parse::<Lever>()?,
        min: number(parts[1])?,
        max: number(parts[2])?,
        step: number(parts[3])?,
    })
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rows = parse_lever_range(&args.lever)?;
    let columns = args.lever2.as_deref().map(parse_lever_range).transpose()?;
    let request = args.scenario.resolve()?;

    match columns {
        None => {
            let result = sensitivity::sweep_lever(&SweepInput {
                baseline: request.baseline,
                params: request.params,
                drivers: request.drivers,
                range: rows,
            })?;
            Ok(serde_json::to_value(result)?)
        }
        Some(columns) => {
            let metric: SweepMetric = args.metric.parse()?;
            let result = sensitivity::sensitivity_grid(&GridInput {
                baseline: request.baseline,
                params: request.params,
                drivers: request.drivers,
                rows,
                columns,
                metric,
            })?;
            Ok(serde_json::to_value(result)?)
        }
    }
}
