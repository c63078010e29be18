//! # Action Plans
//!
//! The step vocabulary for the stepwise agent - what a model reply may ask for.
//! A plan is the unit of interpretation: the interpreter validates model JSON
//! into one, and the executor runs it step by step.
//!
//! ## Design Philosophy
//! - The model is the planner, not the executor
//! - Steps are immutable once parsed; execution never mutates a plan
//! - Unknown actions survive parsing so execution can report them

use serde::{Deserialize, Serialize};

/// A single step in an action plan - the instruction set for the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Evaluate an arithmetic expression with the local calculator
    UseCalculator {
        /// Symbolic expression, e.g. "5*6" or "100 / 4"
        expression: String,
    },

    /// Translate an English phrase to German
    UseTranslator {
        /// Phrase to translate
        text: String,
    },

    /// Answer from the model's own knowledge, no tool involved
    AnswerDirect {
        /// The model's direct answer text
        response: String,
    },

    /// In-band error reported by the model or the query layer
    Error {
        /// Why no useful step could be produced
        message: String,
    },

    /// Any step whose action is not recognized - raw JSON preserved
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl Step {
    /// Actions the executor knows how to dispatch or consume
    pub fn is_recognized(action: &str) -> bool {
        matches!(
            action,
            "use_calculator" | "use_translator" | "answer_direct" | "error"
        )
    }

    /// The action tag for this step.
    ///
    /// For `Unknown` steps this digs the tag out of the raw JSON, falling
    /// back to "unknown" when there is none.
    pub fn action_name(&self) -> &str {
        match self {
            Step::UseCalculator { .. } => "use_calculator",
            Step::UseTranslator { .. } => "use_translator",
            Step::AnswerDirect { .. } => "answer_direct",
            Step::Error { .. } => "error",
            Step::Unknown(value) => value
                .get("action")
                .and_then(|a| a.as_str())
                .unwrap_or("unknown"),
        }
    }

    /// Check if this step dispatches to a local tool
    pub fn is_tool_call(&self) -> bool {
        matches!(self, Step::UseCalculator { .. } | Step::UseTranslator { .. })
    }

    /// Format step into (action, details) for pretty printing
    fn format_parts(&self) -> (&str, String) {
        match self {
            Step::UseCalculator { expression } => ("use_calculator", format!("\"{}\"", expression)),
            Step::UseTranslator { text } => ("use_translator", format!("\"{}\"", truncate(text, 40))),
            Step::AnswerDirect { response } => {
                ("answer_direct", format!("\"{}\"", truncate(response, 40)))
            }
            Step::Error { message } => ("error", format!("\"{}\"", truncate(message, 40))),
            Step::Unknown(value) => ("unknown", truncate(&value.to_string(), 40)),
        }
    }
}

/// An ordered action plan - possibly empty, order is execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// The steps that make up this plan
    pub steps: Vec<Step>,
}

impl Plan {
    /// Create a new plan from steps
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Number of steps in the plan
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the plan has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pretty print the plan to stdout
    pub fn pretty_print(&self) {
        println!("--- Plan ({} steps) ---", self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            let (name, details) = step.format_parts();
            if details.is_empty() {
                println!("{:3} | {}", i, name);
            } else {
                println!("{:3} | {} {}", i, name, details);
            }
        }
        println!();
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
