//! # Translator
//!
//! English to German translation behind a backend trait.
//!
//! ## Design
//! - `TranslateBackend` is the seam: the executor is generic over it, so
//!   plan execution is testable without network access
//! - `GoogleTranslate` talks to the public gtx endpoint, which answers with
//!   positional JSON arrays rather than an object schema
//! - No retries here: one failed request is one failed step

use std::fmt;
use std::time::Duration;

use reqwest::Client;

/// Why a translation could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The backend failed - transport, HTTP status, or response shape
    BackendFailure(String),
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendFailure(detail) => write!(f, "translation backend failure: {}", detail),
        }
    }
}

impl std::error::Error for TranslationError {}

/// Translation backend trait
#[allow(async_fn_in_trait)]
pub trait TranslateBackend: Send + Sync {
    /// Backend name for diagnostics
    fn name(&self) -> &str;

    /// Translate English text to German
    async fn translate_to_german(&self, text: &str) -> Result<String, TranslationError>;
}

/// Google translate backend (public gtx endpoint, no API key)
pub struct GoogleTranslate {
    client: Client,
    base_url: String,
}

impl GoogleTranslate {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://translate.googleapis.com".to_string(),
        }
    }

    /// Override the endpoint base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslateBackend for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_to_german(&self, text: &str) -> Result<String, TranslationError> {
        let url = format!("{}/translate_a/single", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", "de"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::BackendFailure(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranslationError::BackendFailure(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslationError::BackendFailure(format!("invalid response body: {}", e)))?;

        collect_segments(&payload)
            .ok_or_else(|| TranslationError::BackendFailure("unexpected response shape".to_string()))
    }
}

/// Join the translated segments out of the gtx array-of-arrays payload.
///
/// The shape is `[[["<german>", "<english>", ...], ...], ...]` - the first
/// element holds one entry per sentence, each starting with the translation.
fn collect_segments(payload: &serde_json::Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|t| t.as_str()) {
            translated.push_str(text);
        }
    }

    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}
