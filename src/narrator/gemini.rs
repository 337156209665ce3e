use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Narrator;
use crate::config::GeminiConfig;
use crate::error::{DashboardError, Result};

// ─── Wire types ───

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ─── Client ───

/// The key travels in a header so it never appears in a URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error text with the request URL stripped.
fn transport_error(context: &str, e: reqwest::Error) -> DashboardError {
    DashboardError::ServiceError(format!("{context}: {}", e.without_url()))
}

/// Blocking client for the `generateContent` endpoint.
pub struct GeminiNarrator {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

impl GeminiNarrator {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {e}");
                reqwest::blocking::Client::new()
            });
        Self { config, client }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl Narrator for GeminiNarrator {
    fn ask(&self, prompt: &str) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(DashboardError::ServiceError(
                "No Gemini API key configured (set GEMINI_API_KEY)".to_string(),
            ));
        }

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&body)
            .send()
            .map_err(|e| transport_error("Request to Gemini failed", e))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| transport_error("Reading reply", e))?;

        if !status.is_success() {
            return Err(DashboardError::ServiceError(format!("Gemini API error {status}: {text}")));
        }

        parse_reply(&text)
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_reply(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| DashboardError::ServiceError(format!("Malformed Gemini reply: {e}")))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Err(DashboardError::ServiceError("Gemini returned no text".to_string()))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn reply_parts_are_joined() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Warmer "},{"text":"decades."}],"role":"model"},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Warmer decades.");
    }

    #[test]
    fn blocked_reply_is_service_error() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(parse_reply(body), Err(DashboardError::ServiceError(_))));
        assert!(parse_reply("<html>").is_err());
    }

    #[test]
    fn missing_key_fails_without_network() {
        let narrator = GeminiNarrator::new(GeminiConfig::default());
        let err = narrator.ask("anything").unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn transport_failure_does_not_expose_key() {
        let narrator = GeminiNarrator::new(GeminiConfig {
            api_key: "SECRET-KEY-123".into(),
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 5,
            ..GeminiConfig::default()
        });
        let err = narrator.ask("anything").unwrap_err().to_string();
        assert!(err.starts_with("Request to Gemini failed"), "got {err}");
        assert!(!err.contains("SECRET-KEY-123"), "got {err}");
        assert!(!narrator.url().contains("SECRET-KEY-123"));
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let narrator = GeminiNarrator::new(GeminiConfig {
            endpoint: "https://example.test/v1beta/".into(),
            ..GeminiConfig::default()
        });
        assert_eq!(
            narrator.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash-lite:generateContent"
        );
    }
}
