//! # Step Executor
//!
//! Runs a validated [`Plan`] against the local tools.
//!
//! ## Design
//! - Execution is total: every step yields exactly one [`StepResult`], in
//!   plan order, no matter what fails
//! - Tool failures are caught at the step boundary and rendered into that
//!   step's summary - a failing step never aborts its siblings
//! - Unknown actions execute as warnings, model `error` steps as failures
//! - An optional progress callback observes each step before it runs

use crate::plan::{Plan, Step};
use crate::tools::calculator::{self, format_number};
use crate::tools::translator::TranslateBackend;
use serde::{Deserialize, Serialize};

/// How a single step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step produced its result
    Ok,
    /// The step failed; the summary carries the error text
    Failed,
    /// The step was not understood (unknown action)
    Warning,
}

/// The outcome of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Position of the step in the plan
    pub index: usize,
    /// How the step ended
    pub status: StepStatus,
    /// Human-readable rendering - success text or error text
    pub summary: String,
}

impl StepResult {
    /// A successful step
    pub fn ok(index: usize, summary: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Ok,
            summary: summary.into(),
        }
    }

    /// A failed step
    pub fn failed(index: usize, summary: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Failed,
            summary: summary.into(),
        }
    }

    /// A step with an unrecognized action
    pub fn warning(index: usize, summary: impl Into<String>) -> Self {
        Self {
            index,
            status: StepStatus::Warning,
            summary: summary.into(),
        }
    }

    /// Check if the step succeeded
    pub fn is_ok(&self) -> bool {
        self.status == StepStatus::Ok
    }
}

/// All step results for one plan, in plan order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionOutcome {
    results: Vec<StepResult>,
}

impl ExecutionOutcome {
    /// Create an outcome from step results
    pub fn new(results: Vec<StepResult>) -> Self {
        Self { results }
    }

    /// All results, in plan order
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// Number of step results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if there are no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of steps that succeeded
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of steps that failed
    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count()
    }

    /// The final answer: every step summary, one per line, in plan order
    pub fn combined_summary(&self) -> String {
        self.results
            .iter()
            .map(|r| r.summary.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Executes plans against the local tools.
///
/// Generic over the translation backend so tests can run without network.
pub struct StepExecutor<T: TranslateBackend> {
    translator: T,
    progress: Option<Box<dyn Fn(usize, &Step) + Send + Sync>>,
}

impl<T: TranslateBackend> StepExecutor<T> {
    /// Create a new executor over the given translation backend
    pub fn new(translator: T) -> Self {
        Self {
            translator,
            progress: None,
        }
    }

    /// Set a callback invoked with (index, step) before each step runs
    pub fn with_progress(
        mut self,
        callback: impl Fn(usize, &Step) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Execute every step of the plan in order.
    ///
    /// Total: one result per step, failures isolated per step.
    pub async fn execute(&self, plan: &Plan) -> ExecutionOutcome {
        let mut results = Vec::with_capacity(plan.len());

        for (index, step) in plan.steps.iter().enumerate() {
            if let Some(callback) = &self.progress {
                callback(index, step);
            }
            results.push(self.execute_step(index, step).await);
        }

        ExecutionOutcome::new(results)
    }

    /// Run one step against its tool
    async fn execute_step(&self, index: usize, step: &Step) -> StepResult {
        match step {
            Step::UseCalculator { expression } => match calculator::evaluate(expression) {
                Ok(value) => StepResult::ok(
                    index,
                    format!("Calculator result: {} = {}", expression, format_number(value)),
                ),
                Err(e) => StepResult::failed(index, format!("Error executing step: {}", e)),
            },
            Step::UseTranslator { text } => {
                match self.translator.translate_to_german(text).await {
                    Ok(translated) => StepResult::ok(
                        index,
                        format!("Translation: '{}' → '{}'", text, translated),
                    ),
                    Err(e) => StepResult::failed(index, format!("Error executing step: {}", e)),
                }
            }
            Step::AnswerDirect { response } => {
                StepResult::ok(index, format!("Answer: {}", response))
            }
            Step::Error { message } => {
                StepResult::failed(index, format!("Model error: {}", message))
            }
            Step::Unknown(_) => {
                StepResult::warning(index, format!("Unknown action: {}", step.action_name()))
            }
        }
    }
}
