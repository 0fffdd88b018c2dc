use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ProjectionResult;

/// Anything that can turn a prompt into free text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> ProjectionResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AdvisoryStatus {
    Generated,
    Placeholder { reason: String },
}

/// Advisory text together with the exact prompt that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    #[serde(flatten)]
    pub status: AdvisoryStatus,
    pub text: String,
    pub prompt: String,
}

impl AdvisoryReport {
    fn placeholder(reason: impl Into<String>, prompt: String) -> Self {
        let reason = reason.into();
        AdvisoryReport {
            text: format!(
                "[Advisory unavailable] {reason}. The projected statement is unaffected."
            ),
            status: AdvisoryStatus::Placeholder { reason },
            prompt,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.status == AdvisoryStatus::Generated
    }
}

/// Ask the generator for commentary. Never fails: a missing generator, an
/// error, or an empty reply all degrade to a labeled placeholder.
pub fn request_advisory(generator: Option<&dyn TextGenerator>, prompt: String) -> AdvisoryReport {
    let Some(generator) = generator else {
        return AdvisoryReport::placeholder("no text-generation service configured", prompt);
    };

    match generator.generate(&prompt) {
        Ok(text) if !text.trim().is_empty() => {
            info!(chars = text.len(), "advisory text generated");
            AdvisoryReport {
                status: AdvisoryStatus::Generated,
                text,
                prompt,
            }
        }
        Ok(_) => AdvisoryReport::placeholder("the service returned an empty response", prompt),
        Err(e) => {
            warn!(error = %e, "advisory request failed");
            AdvisoryReport::placeholder(e.to_string(), prompt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectionError;

    struct Canned(&'static str);

    impl TextGenerator for Canned {
        fn generate(&self, _prompt: &str) -> ProjectionResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextGenerator for Failing {
        fn generate(&self, _prompt: &str) -> ProjectionResult<String> {
            Err(ProjectionError::AdvisoryUnavailable("HTTP 503".into()))
        }
    }

    #[test]
    fn test_generated_text_passed_through() {
        let canned = Canned("**Status**: Risk");
        let report = request_advisory(Some(&canned as &dyn TextGenerator), "p".into());
        assert!(report.is_generated());
        assert_eq!(report.text, "**Status**: Risk");
        assert_eq!(report.prompt, "p");
    }

    #[test]
    fn test_missing_generator_placeholder() {
        let report = request_advisory(None, "p".into());
        assert!(!report.is_generated());
        assert!(report.text.starts_with("[Advisory unavailable]"));
    }

    #[test]
    fn test_failure_placeholder_carries_reason() {
        let report = request_advisory(Some(&Failing as &dyn TextGenerator), "p".into());
        match &report.status {
            AdvisoryStatus::Placeholder { reason } => assert!(reason.contains("HTTP 503")),
            AdvisoryStatus::Generated => panic!("expected placeholder"),
        }
    }

    #[test]
    fn test_blank_reply_placeholder() {
        let report = request_advisory(Some(&Canned("  \n") as &dyn TextGenerator), "p".into());
        assert!(!report.is_generated());
    }

    #[test]
    fn test_report_serializes_status_tag() {
        let report = request_advisory(None, "p".into());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "placeholder");
        assert!(json["reason"].is_string());
    }
}
