use clap::Args;
use serde_json::{json, Value};

use logistics_pnl_core::projection::BaselineStatement;

use crate::input;

/// Arguments for inspecting a baseline statement
#[derive(Args)]
pub struct BaselineArgs {
    /// Baseline file (JSON or YAML); omit for the built-in 2026 plan
    #[arg(long)]
    pub file: Option<String>,
}

pub fn run_baseline(args: BaselineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let baseline: BaselineStatement = match args.file {
        Some(ref path) => input::file::read_config(path)?,
        None => BaselineStatement::reference_2026(),
    };
    baseline.validate()?;

    let mut result = serde_json::to_value(&baseline)?;
    if let Value::Object(ref mut map) = result {
        map.insert("totalCogs".into(), json!(baseline.total_cogs()));
        map.insert("totalSga".into(), json!(baseline.total_sga()));
        map.insert("ebitda".into(), json!(baseline.ebitda()));
        map.insert("ebitdaMargin".into(), json!(baseline.ebitda_margin()));
        map.insert("netIncome".into(), json!(baseline.net_income()));
    }
    Ok(json!({ "result": result }))
}
