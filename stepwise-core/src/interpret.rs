//! # Plan Interpretation
//!
//! Turns raw model output into a validated [`Plan`].
//!
//! ## Design
//! - Markdown code fences are stripped the way models wrap them
//! - Recognized actions validate strictly: a missing field is a malformed step
//! - Unrecognized actions are preserved as [`Step::Unknown`], never rejected
//! - Prose is not an error at this layer: `NotJson` carries the cleaned text
//!   so callers can decide how to degrade

use crate::plan::{Plan, Step};
use std::fmt;

/// Why a reply could not be interpreted as a plan
#[derive(Debug, Clone, PartialEq)]
pub enum InterpretError {
    /// The reply was not JSON of the expected shape - carries the de-fenced text
    NotJson(String),
    /// A recognized action failed validation
    MalformedStep {
        /// Position of the step in the plan
        index: usize,
        /// The recognized action tag
        action: String,
        /// What was wrong with it
        detail: String,
    },
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJson(text) => write!(f, "reply is not a valid plan: {}", truncate(text, 60)),
            Self::MalformedStep {
                index,
                action,
                detail,
            } => write!(f, "step {} ('{}') is malformed: {}", index, action, detail),
        }
    }
}

impl std::error::Error for InterpretError {}

/// Strip a markdown code fence wrapper from model output.
///
/// Handles both ```json and bare ``` fences; plain text passes through
/// trimmed.
pub fn strip_code_fences(content: &str) -> &str {
    if content.contains("```json") {
        content
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(content)
    } else if content.contains("```") {
        content
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(content)
    } else {
        content.trim()
    }
}

/// Parse a multi-step plan from raw model output.
///
/// The wire shape is `{"steps": [{"action": ...}, ...]}`. JSON that is not
/// an object carrying a `steps` array degrades to `NotJson`, exactly like
/// prose, so callers have a single fallback path.
pub fn parse_plan(content: &str) -> Result<Plan, InterpretError> {
    let cleaned = strip_code_fences(content);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|_| InterpretError::NotJson(cleaned.to_string()))?;

    let raw_steps = value
        .get("steps")
        .and_then(|s| s.as_array())
        .ok_or_else(|| InterpretError::NotJson(cleaned.to_string()))?;

    let mut steps = Vec::with_capacity(raw_steps.len());
    for (index, raw) in raw_steps.iter().enumerate() {
        steps.push(interpret_step(index, raw)?);
    }

    Ok(Plan::new(steps))
}

/// Parse a single action object from raw model output.
///
/// The wire shape is one JSON object with an `action` key, e.g.
/// `{"action": "use_calculator", "expression": "12+7"}`.
pub fn parse_single_action(content: &str) -> Result<Step, InterpretError> {
    let cleaned = strip_code_fences(content);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|_| InterpretError::NotJson(cleaned.to_string()))?;

    if !value.is_object() {
        return Err(InterpretError::NotJson(cleaned.to_string()));
    }

    interpret_step(0, &value)
}

/// Validate one raw step.
///
/// A recognized action must deserialize into its variant; anything else is
/// preserved as `Unknown` (including elements that are not objects).
fn interpret_step(index: usize, raw: &serde_json::Value) -> Result<Step, InterpretError> {
    let action = raw.get("action").and_then(|a| a.as_str());

    match action {
        Some(name) if Step::is_recognized(name) => {
            match serde_json::from_value::<Step>(raw.clone()) {
                Ok(Step::Unknown(_)) => Err(InterpretError::MalformedStep {
                    index,
                    action: name.to_string(),
                    detail: "missing required fields".to_string(),
                }),
                Ok(step) => Ok(step),
                Err(e) => Err(InterpretError::MalformedStep {
                    index,
                    action: name.to_string(),
                    detail: e.to_string(),
                }),
            }
        }
        _ => Ok(Step::Unknown(raw.clone())),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
