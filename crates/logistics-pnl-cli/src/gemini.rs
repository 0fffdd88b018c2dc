//! Gemini `generateContent` client used for CFO commentary.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use logistics_pnl_core::advisory::TextGenerator;
use logistics_pnl_core::{ProjectionError, ProjectionResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.5;
const MAX_OUTPUT_TOKENS: u32 = 500;
const TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables checked for the API key, in order.
const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: &str) -> ProjectionResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| ProjectionError::AdvisoryUnavailable(format!("HTTP client: {e}")))?;
        Ok(GeminiClient {
            http,
            api_key,
            model: model.to_string(),
        })
    }

    /// First non-empty key among the supported environment variables.
    pub fn api_key_from_env() -> Option<String> {
        KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> ProjectionResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        let url = format!("{ENDPOINT}/{}:generateContent", self.model);
        debug!(model = %self.model, prompt_chars = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ProjectionError::AdvisoryUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProjectionError::AdvisoryUnavailable(format!(
                "service answered HTTP {status}"
            )));
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            ProjectionError::AdvisoryUnavailable(format!("unreadable response: {e}"))
        })?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 500);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "**Status**: " }, { "text": "Risk" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.text(), "**Status**: Risk");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed.text(), "");
    }
}
