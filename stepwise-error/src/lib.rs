//! # stepwise-error
//!
//! Unified error handling for stepwise - following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., CompletionFailed, RateLimited)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use stepwise_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::CompletionFailed, "model returned no candidates")
//!         .with_operation("provider::complete")
//!         .with_context("model", "gemini-1.5-flash")
//!         .with_context("attempt", "2"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible operations return `Result<T, stepwise_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using stepwise Error
pub type Result<T> = std::result::Result<T, Error>;
