use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use logistics_pnl_core::advisory::{resolve_prompt, AdvisoryContext};
use logistics_pnl_core::comparison::run_comparison;
use logistics_pnl_core::projection::engine::ProjectionInput;
use logistics_pnl_core::projection::{
    project_with_drivers, run_projection, BaselineStatement, CovenantThresholds, DriverConfig,
    ScenarioParameters,
};
use logistics_pnl_core::sensitivity::{self, GridInput, SweepInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_scenario(input_json: String) -> NapiResult<String> {
    let input: ProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenario(input_json: String) -> NapiResult<String> {
    let input: ProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn reference_baseline() -> NapiResult<String> {
    serde_json::to_string(&BaselineStatement::reference_2026()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn sweep_lever(input_json: String) -> NapiResult<String> {
    let input: SweepInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::sweep_lever(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: GridInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::sensitivity_grid(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvisoryPromptInput {
    baseline: BaselineStatement,
    params: ScenarioParameters,
    #[serde(default)]
    drivers: DriverConfig,
    #[serde(default)]
    covenants: Option<CovenantThresholds>,
    #[serde(default)]
    context: Option<AdvisoryContext>,
    #[serde(default)]
    custom_prompt: Option<String>,
}

/// Prompt text only; the host application owns the call to the model.
#[napi]
pub fn build_advisory_prompt(input_json: String) -> NapiResult<String> {
    let input: AdvisoryPromptInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let statement = project_with_drivers(&input.baseline, &input.params, &input.drivers)
        .map_err(to_napi_error)?;

    let mut context = input.context.unwrap_or_default();
    if let Some(covenants) = input.covenants {
        context.covenants = covenants;
    }
    Ok(resolve_prompt(
        input.custom_prompt.as_deref(),
        &context,
        &input.params,
        &statement,
    ))
}
