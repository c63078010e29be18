//! # Completion Providers
//!
//! A trait-based abstraction for querying hosted LLM completion APIs.
//!
//! ## Design
//! - `CompletionProvider` defines the core interface: one prompt in, one
//!   text reply out
//! - `GeminiProvider` implements it over the Generative Language REST API
//! - `complete_with_retry` wraps any provider with a bounded fixed-delay
//!   retry loop driven by the error's status

pub mod gemini;

pub use gemini::GeminiProvider;

use std::time::Duration;
use stepwise_error::{Error, Result};

/// The main completion provider trait
#[allow(async_fn_in_trait)]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "gemini")
    fn name(&self) -> &str;

    /// The model this provider queries
    fn model(&self) -> &str;

    /// Send a prompt and return the full text reply
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Bounded retry with a fixed delay between attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: usize,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit attempts and delay
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy with no delay between attempts (tests, impatient callers)
    pub fn immediate(attempts: usize) -> Self {
        Self {
            attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Run a completion with bounded retries.
///
/// Permanent errors return immediately. When every attempt fails with a
/// retryable error, the last one is returned marked persistent.
pub async fn complete_with_retry<P: CompletionProvider>(
    provider: &P,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut last_err = None;

    for attempt in 1..=policy.attempts {
        match provider.complete(prompt).await {
            Ok(reply) => return Ok(reply),
            Err(err) => {
                if !err.is_retryable() {
                    return Err(err);
                }
                if attempt < policy.attempts && !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => Err(err
            .with_context("attempts", policy.attempts.to_string())
            .persist()),
        None => Err(Error::config_invalid("retry policy allows zero attempts")
            .with_operation("provider::complete_with_retry")),
    }
}
