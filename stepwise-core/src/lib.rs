//! # Stepwise Core
//!
//! Building blocks for a plan-executing LLM agent.
//!
//! ## Core Concepts
//! - **Plan**: A model-authored sequence of steps, each naming an action
//! - **Interpreter**: Turns raw model output into a validated plan
//! - **Executor**: Dispatches steps to local tools, isolating per-step failures
//! - **Tools**: Calculator (strict two-operand arithmetic) and translator (en -> de)
//! - **Provider**: Trait-based completion API with bounded retries (Gemini)
//! - **Logbook**: Append-only JSONL audit records, one per interaction

pub mod plan;
pub mod interpret;
pub mod executor;
pub mod tools;
pub mod provider;
pub mod prompt;
pub mod logbook;

pub use plan::{Plan, Step};
pub use interpret::{parse_plan, parse_single_action, strip_code_fences, InterpretError};
pub use executor::{ExecutionOutcome, StepExecutor, StepResult, StepStatus};
pub use tools::{evaluate, format_number, EvalError};
pub use tools::{GoogleTranslate, TranslateBackend, TranslationError};
pub use provider::{complete_with_retry, CompletionProvider, GeminiProvider, RetryPolicy};
pub use logbook::{LogRecord, Logbook};
pub use stepwise_error::{Error, ErrorKind, ErrorStatus, Result};
