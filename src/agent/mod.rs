//! Mode-routed conversational agent over the article corpus.
//!
//! One request flows through a single bounded exchange:
//!
//! ```text
//! POST /deployments/{mode}/run
//!   └── Mode (slug → prompt + tool profile)
//!       └── ModeRouter::run
//!           ├── LlmProvider::chat (OpenAI-compatible)
//!           ├── ToolExecutor (permission gate → typed dispatch)
//!           │   ├── search_articles      → external semantic index
//!           │   └── everything else      → in-process snapshot
//!           └── final text answer
//! ```
//!
//! Tools are the only path from the model to article data; the permission
//! profile attached to the mode decides which of the five tools the model
//! may call, and a disallowed call comes back to the model as an error
//! result rather than an HTTP failure.

pub mod client;
pub mod executor;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod router;
pub mod tool;

pub use client::create_provider;
pub use executor::{ToolExecutor, ToolInvocation};
pub use provider::LlmProvider;
pub use router::{ChatAnswer, Mode, ModeRouter};
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
