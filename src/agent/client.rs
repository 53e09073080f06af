//! Provider registry and factory.
//!
//! Maps provider names to concrete [`LlmProvider`] implementations.

use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::config::AppConfig;
use crate::error::Error;

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default): OpenAI-compatible APIs via `async-openai`
///
/// # Errors
///
/// Returns [`Error::Config`] for unknown provider names.
pub fn create_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, Error> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config))),
        other => Err(Error::Config {
            message: format!("unsupported provider: {other}"),
        }),
    }
}
