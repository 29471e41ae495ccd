//! UI Builder — natural-language UI requests to React component code.
//!
//! A `UiAgent` drives an LLM through plan → generate → explain, extracting
//! a JSON layout plan and component source from free-text replies, and
//! streams progress to the caller. A separate modify track edits existing
//! code in place.

pub mod agent;
pub mod config;
pub mod conversation;
pub mod extract;
pub mod history;
pub mod llm;

pub use agent::progress::{GenerationResult, ProgressEvent, ProgressStream, Stage};
pub use agent::{AgentError, UiAgent};
pub use config::Config;
pub use history::VersionHistory;
pub use llm::{ChatBackend, ChatTransport};
