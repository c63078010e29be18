//! # Local Tools
//!
//! The tools a plan step can dispatch to. Each tool is a leaf: no retries,
//! no logging, no knowledge of plans - errors are reported to the executor
//! through small contract enums and rendered there.

pub mod calculator;
pub mod translator;

pub use calculator::{evaluate, format_number, EvalError};
pub use translator::{GoogleTranslate, TranslateBackend, TranslationError};
