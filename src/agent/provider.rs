//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. This keeps the mode router decoupled
//! from any particular LLM vendor and lets tests substitute canned models.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::Error;

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer (HTTP, SDK calls) for a
/// specific provider while presenting a uniform interface to the router.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request. One attempt; no internal retry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] on API failures, timeouts, or parse
    /// errors.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, Error>;
}
