use clap::Args;
use serde_json::{json, Value};
use tracing::warn;

use logistics_pnl_core::advisory::{
    request_advisory, resolve_prompt, AdvisoryContext, TextGenerator,
};
use logistics_pnl_core::projection::run_projection;

use super::scenario::ScenarioArgs;
use crate::gemini::{GeminiClient, DEFAULT_MODEL};
use crate::input;

/// Arguments for CFO commentary on a scenario
#[derive(Args)]
pub struct AdviseArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Print the prompt without calling the service
    #[arg(long)]
    pub prompt_only: bool,

    /// Text file whose contents replace the generated prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Gemini model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
}

pub fn run_advise(args: AdviseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.scenario.resolve()?;
    let projection = run_projection(&request)?;

    let custom = args.prompt.as_deref().map(input::file::read_text).transpose()?;
    let context = AdvisoryContext {
        covenants: request.covenants.clone(),
        ..AdvisoryContext::default()
    };
    let prompt = resolve_prompt(custom.as_deref(), &context, &request.params, &projection.result);

    if args.prompt_only {
        return Ok(json!({ "result": { "prompt": prompt } }));
    }

    let client = match GeminiClient::api_key_from_env() {
        Some(key) => match GeminiClient::new(key, &args.model) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "advisory client unavailable");
                None
            }
        },
        None => None,
    };
    let report = request_advisory(client.as_ref().map(|c| c as &dyn TextGenerator), prompt);

    let mut warnings = projection.warnings.clone();
    if !report.is_generated() {
        warnings.push("Advisory text is a placeholder; see 'reason'".into());
    }

    let mut result = serde_json::to_value(&report)?;
    if let Value::Object(ref mut map) = result {
        map.insert("projected".into(), serde_json::to_value(&projection.result)?);
    }

    let mut envelope = serde_json::to_value(&projection)?;
    if let Value::Object(ref mut map) = envelope {
        map.insert("result".into(), result);
        map.insert("warnings".into(), json!(warnings));
        map.insert(
            "methodology".into(),
            json!("Driver-based P&L projection with external CFO commentary"),
        );
    }
    Ok(envelope)
}
