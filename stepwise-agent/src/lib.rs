//! # Stepwise Agent
//!
//! The agent orchestrates the model <-> tools loop:
//! 1. User provides a question
//! 2. The model answers directly, or proposes actions as JSON
//! 3. The interpreter validates the reply into a plan
//! 4. The executor dispatches each step to a local tool
//! 5. Per-step results aggregate into one final answer
//! 6. Every interaction lands in an append-only logbook
//!
//! The model proposes, the tools dispose.

mod agent;

pub use agent::{Agent, AgentConfig, AgentResult};
pub use agent::{AGENT_LOG_FILE, CHAT_LOG_FILE, TOOL_LOG_FILE};
