//! Google Gemini provider over the Generative Language REST API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stepwise_error::{Error, Result};

use super::CompletionProvider;

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

// =============================================================================
// Provider
// =============================================================================

/// Completion provider backed by the Gemini `generateContent` endpoint
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(Error::config_invalid("GEMINI_API_KEY is not set")
                .with_operation("gemini::from_env")
                .with_context("env", "GEMINI_API_KEY")),
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different API base URL (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::network_failed("request failed")
                    .with_operation("gemini::complete")
                    .set_source(e)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = match status {
                429 => Error::rate_limited("rate limited by the API"),
                401 | 403 => Error::api_failed(status, "authentication rejected"),
                500..=599 => Error::completion_failed(format!("server error {}", status)),
                _ => Error::api_failed(status, "request rejected"),
            };
            return Err(err
                .with_operation("gemini::complete")
                .with_context("body", truncate(&body, 200)));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            Error::parse_failed("invalid response body")
                .with_operation("gemini::complete")
                .set_source(e)
        })?;

        extract_reply(parsed)
    }
}

/// Pull the first candidate's text out of a decoded response
fn extract_reply(response: GenerateResponse) -> Result<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        Error::completion_failed("no candidates in response").with_operation("gemini::complete")
    })?;

    let reply: String = candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect();

    if reply.trim().is_empty() {
        return Err(
            Error::completion_failed("model returned empty reply")
                .with_operation("gemini::complete"),
        );
    }

    Ok(reply)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_error::ErrorKind;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "What is 2+2?".to_string(),
                }],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"parts": [{"text": "What is 2+2?"}]}]
            })
        );
    }

    #[test]
    fn test_extract_reply_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Hello, "}, {"text": "world"}]
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(extract_reply(response).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_reply_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        let err = extract_reply(response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CompletionFailed);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_extract_reply_empty_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
        )
        .unwrap();

        let err = extract_reply(response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CompletionFailed);
    }

    #[test]
    fn test_builders() {
        let provider = GeminiProvider::new("test-key")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:9090");

        assert_eq!(provider.model(), "gemini-2.0-flash");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9090/models/gemini-2.0-flash:generateContent"
        );
    }
}
