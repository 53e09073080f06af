//! Mode routing and the bounded tool-calling exchange.
//!
//! A [`Mode`] fixes three things for a request: the system prompt, the
//! tool permission profile, and nothing else; the loop mechanics are
//! identical across modes. [`ModeRouter::run`] drives the model ↔ tool
//! round-trip: send the request, execute any tool calls, append results,
//! repeat until the model answers in text or the round limit is hit.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::executor::ToolExecutor;
use super::message::{
    ChatRequest, TokenUsage, assistant_tool_calls_message, system_message, tool_message,
    user_message,
};
use super::prompt;
use super::provider::LlmProvider;
use super::tool::ToolSet;
use crate::config::AppConfig;
use crate::corpus::CorpusStore;
use crate::error::Error;
use crate::index::SemanticIndex;

/// Maximum raw byte length of a user query.
const MAX_QUERY_LEN: usize = 8_000;

/// The three conversational modes.
///
/// Modes are selected per request by URL slug; there is no session state
/// and no way for a conversation to change mode mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Public-facing article discovery. Summaries and links only.
    Discovery,
    /// Portfolio showcase centered on technology expertise.
    TechExplorer,
    /// Private content-strategy analysis with full corpus access.
    Analytics,
}

impl Mode {
    /// The URL slug identifying this mode.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::TechExplorer => "tech-explorer",
            Self::Analytics => "analytics",
        }
    }

    /// The tool permission profile for this mode.
    #[must_use]
    pub fn tools(self) -> ToolSet {
        match self {
            Self::Discovery => ToolSet::discovery_tools(),
            Self::TechExplorer => ToolSet::tech_explorer_tools(),
            Self::Analytics => ToolSet::analytics_tools(),
        }
    }

    /// The persona system prompt for this mode.
    #[must_use]
    pub fn system_prompt(self) -> String {
        match self {
            Self::Discovery => prompt::discovery_prompt(),
            Self::TechExplorer => prompt::tech_explorer_prompt(),
            Self::Analytics => prompt::analytics_prompt(),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(Self::Discovery),
            "tech-explorer" => Ok(Self::TechExplorer),
            "analytics" => Ok(Self::Analytics),
            other => Err(Error::validation(format!("unknown mode: {other}"))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// The answer produced by one routed exchange.
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    /// Final assistant text.
    pub answer: String,
    /// Token usage from the final model call.
    pub usage: TokenUsage,
}

/// Drives one request through the mode's persona and tool profile.
///
/// Borrows everything; a router is built per request from shared state.
pub struct ModeRouter<'a> {
    store: &'a CorpusStore,
    index: &'a dyn SemanticIndex,
    provider: &'a dyn LlmProvider,
    config: &'a AppConfig,
}

impl<'a> ModeRouter<'a> {
    /// Creates a router over the shared corpus, index, and provider.
    #[must_use]
    pub const fn new(
        store: &'a CorpusStore,
        index: &'a dyn SemanticIndex,
        provider: &'a dyn LlmProvider,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            store,
            index,
            provider,
            config,
        }
    }

    /// Runs one bounded exchange for `mode` and returns the final answer.
    ///
    /// The model gets a single round of tool calls. The one extension: a
    /// round that included a permission-rejected tool grants one recovery
    /// round, capped by `max_tool_rounds` overall. Tool-level failures
    /// (permission, bad arguments, unknown ids) are reported back to the
    /// model as error results; only index and provider failures abort.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty or oversized query. The model
    ///   is never called in that case.
    /// - [`Error::Upstream`] when the provider or index fails, or when the
    ///   model still requests tools after the final permitted round.
    pub async fn run(&self, mode: Mode, query: &str) -> Result<ChatAnswer, Error> {
        if query.trim().is_empty() {
            return Err(Error::validation("query must not be empty"));
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(Error::validation(format!(
                "query too long ({} bytes, max {MAX_QUERY_LEN})",
                query.len()
            )));
        }

        let tools = mode.tools();
        let executor = ToolExecutor::new(self.store, self.index, &tools, mode.slug(), self.config);

        let mut request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                system_message(&mode.system_prompt()),
                user_message(query),
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            tools: tools.definitions().to_vec(),
        };

        // One tool round by default. A round containing a disallowed tool
        // earns exactly one recovery round so the model can retract; a
        // fully-permitted round earns nothing.
        let max_rounds = self.config.max_tool_rounds;
        let mut allowed_rounds = max_rounds.min(1);
        let mut rounds_used = 0;

        loop {
            let response = self.provider.chat(&request).await?;

            if response.tool_calls.is_empty() {
                debug!(mode = %mode, rounds_used, "exchange completed with text answer");
                return Ok(ChatAnswer {
                    answer: response.content,
                    usage: response.usage,
                });
            }

            if rounds_used >= allowed_rounds {
                return Err(Error::upstream(
                    "model",
                    format!("model still requested tools after {rounds_used} rounds"),
                ));
            }

            let forbidden_in_round = response
                .tool_calls
                .iter()
                .any(|call| !tools.permits(&call.name));

            debug!(
                mode = %mode,
                round = rounds_used,
                tool_count = response.tool_calls.len(),
                forbidden_in_round,
                "executing tool calls"
            );

            request
                .messages
                .push(assistant_tool_calls_message(response.tool_calls.clone()));

            for call in &response.tool_calls {
                let result = executor.execute(call).await?;
                debug!(
                    tool = %call.name,
                    call_id = %call.id,
                    is_error = result.is_error,
                    "tool execution complete"
                );
                request
                    .messages
                    .push(tool_message(&result.tool_call_id, &result.content));
            }

            rounds_used += 1;
            if forbidden_in_round {
                allowed_rounds = (rounds_used + 1).min(max_rounds);
            }
        }
    }
}
