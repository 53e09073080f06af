//! Service configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! Everything is read once at startup; a missing credential is a fatal
//! [`Error::Config`] before the server binds.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default chat model (matches the hosted deployment).
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default maximum tokens per model response.
const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default tool rounds: one normal round plus one Forbidden-recovery round.
const DEFAULT_MAX_TOOL_ROUNDS: usize = 2;
/// Default `top_k` for semantic search when the model omits it.
const DEFAULT_SEARCH_TOP_K: usize = 3;
/// Hard cap on `top_k` regardless of what the model asks for.
const MAX_SEARCH_TOP_K: usize = 25;
/// Default minimum relevance score for search hits.
const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.0;
/// Default article count below which a technology is a content gap.
const DEFAULT_GAP_THRESHOLD: usize = 3;
/// Default upstream request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default corpus snapshot path.
const DEFAULT_SNAPSHOT_PATH: &str = "data/articles.json";
/// Default bind address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Connection settings for the hosted semantic index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Service base URL.
    pub base_url: String,
    /// Index name within the service.
    pub index_name: String,
    /// Project the index belongs to.
    pub project: String,
    /// Owning organization identifier.
    pub organization_id: String,
    /// Bearer token for the index service.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Expected-coverage settings for content gap analysis.
#[derive(Debug, Clone)]
pub struct GapConfig {
    /// Technologies the corpus is expected to cover.
    pub expected_coverage: BTreeSet<String>,
    /// Article count below which a technology counts as under-covered.
    pub coverage_threshold: usize,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the model provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Chat model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per model response.
    pub max_tokens: u32,
    /// Maximum tool-calling rounds per request.
    pub max_tool_rounds: usize,
    /// Default semantic-search `top_k`.
    pub default_top_k: usize,
    /// Upper bound on semantic-search `top_k`.
    pub max_top_k: usize,
    /// Minimum relevance score for search hits.
    pub relevance_threshold: f32,
    /// Path to the corpus snapshot.
    pub snapshot_path: PathBuf,
    /// HTTP bind address.
    pub bind_addr: String,
    /// Hosted index settings.
    pub index: IndexConfig,
    /// Content gap settings.
    pub gap: GapConfig,
}

impl AppConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required credential is missing.
    pub fn from_env() -> Result<Self, Error> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_tool_rounds: Option<usize>,
    default_top_k: Option<usize>,
    relevance_threshold: Option<f32>,
    snapshot_path: Option<PathBuf>,
    bind_addr: Option<String>,
    index_base_url: Option<String>,
    index_name: Option<String>,
    index_project: Option<String>,
    index_organization_id: Option<String>,
    index_api_key: Option<String>,
    timeout: Option<Duration>,
    expected_coverage: Option<BTreeSet<String>>,
    coverage_threshold: Option<usize>,
}

impl AppConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL").ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("ARTICLE_CHAT_MODEL").ok();
        }
        if self.snapshot_path.is_none() {
            self.snapshot_path = std::env::var("ARTICLE_CHAT_SNAPSHOT")
                .ok()
                .map(PathBuf::from);
        }
        if self.bind_addr.is_none() {
            self.bind_addr = std::env::var("ARTICLE_CHAT_BIND").ok();
        }
        if self.relevance_threshold.is_none() {
            self.relevance_threshold = std::env::var("ARTICLE_CHAT_RELEVANCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.index_base_url.is_none() {
            self.index_base_url = std::env::var("ARTICLE_CHAT_INDEX_URL").ok();
        }
        if self.index_name.is_none() {
            self.index_name = std::env::var("ARTICLE_CHAT_INDEX_NAME").ok();
        }
        if self.index_project.is_none() {
            self.index_project = std::env::var("ARTICLE_CHAT_INDEX_PROJECT").ok();
        }
        if self.index_organization_id.is_none() {
            self.index_organization_id = std::env::var("ARTICLE_CHAT_INDEX_ORG").ok();
        }
        if self.index_api_key.is_none() {
            self.index_api_key = std::env::var("ARTICLE_CHAT_INDEX_API_KEY").ok();
        }
        if self.expected_coverage.is_none() {
            self.expected_coverage = std::env::var("ARTICLE_CHAT_EXPECTED_TECH").ok().map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            });
        }
        if self.coverage_threshold.is_none() {
            self.coverage_threshold = std::env::var("ARTICLE_CHAT_GAP_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the model provider API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model provider base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the chat model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the maximum tokens per model response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the maximum tool-calling rounds.
    #[must_use]
    pub const fn max_tool_rounds(mut self, n: usize) -> Self {
        self.max_tool_rounds = Some(n);
        self
    }

    /// Sets the default semantic-search `top_k`.
    #[must_use]
    pub const fn default_top_k(mut self, n: usize) -> Self {
        self.default_top_k = Some(n);
        self
    }

    /// Sets the upstream request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the corpus snapshot path.
    #[must_use]
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    /// Sets the minimum relevance score for search hits.
    #[must_use]
    pub const fn relevance_threshold(mut self, t: f32) -> Self {
        self.relevance_threshold = Some(t);
        self
    }

    /// Sets the hosted index base URL.
    #[must_use]
    pub fn index_base_url(mut self, url: impl Into<String>) -> Self {
        self.index_base_url = Some(url.into());
        self
    }

    /// Sets the hosted index name.
    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Sets the hosted index project.
    #[must_use]
    pub fn index_project(mut self, project: impl Into<String>) -> Self {
        self.index_project = Some(project.into());
        self
    }

    /// Sets the hosted index API key.
    #[must_use]
    pub fn index_api_key(mut self, key: impl Into<String>) -> Self {
        self.index_api_key = Some(key.into());
        self
    }

    /// Sets the owning organization id for the hosted index.
    #[must_use]
    pub fn index_organization_id(mut self, id: impl Into<String>) -> Self {
        self.index_organization_id = Some(id.into());
        self
    }

    /// Sets the expected technology coverage for gap analysis.
    #[must_use]
    pub fn expected_coverage(mut self, techs: impl IntoIterator<Item = String>) -> Self {
        self.expected_coverage = Some(techs.into_iter().collect());
        self
    }

    /// Sets the article count below which a technology is a gap.
    #[must_use]
    pub const fn coverage_threshold(mut self, n: usize) -> Self {
        self.coverage_threshold = Some(n);
        self
    }

    /// Builds the [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the model or index API key is missing.
    pub fn build(self) -> Result<AppConfig, Error> {
        let api_key = self.api_key.ok_or_else(|| Error::Config {
            message: "OPENAI_API_KEY is not set".to_string(),
        })?;
        let index_api_key = self.index_api_key.ok_or_else(|| Error::Config {
            message: "ARTICLE_CHAT_INDEX_API_KEY is not set".to_string(),
        })?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(AppConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            max_tool_rounds: self.max_tool_rounds.unwrap_or(DEFAULT_MAX_TOOL_ROUNDS),
            default_top_k: self.default_top_k.unwrap_or(DEFAULT_SEARCH_TOP_K),
            max_top_k: MAX_SEARCH_TOP_K,
            relevance_threshold: self
                .relevance_threshold
                .unwrap_or(DEFAULT_RELEVANCE_THRESHOLD),
            snapshot_path: self
                .snapshot_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            bind_addr: self.bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            index: IndexConfig {
                base_url: self
                    .index_base_url
                    .unwrap_or_else(|| "https://index.invalid".to_string()),
                index_name: self
                    .index_name
                    .unwrap_or_else(|| "medium_articles_chatbot".to_string()),
                project: self.index_project.unwrap_or_else(|| "Default".to_string()),
                organization_id: self.index_organization_id.unwrap_or_default(),
                api_key: index_api_key,
                timeout,
            },
            gap: GapConfig {
                expected_coverage: self.expected_coverage.unwrap_or_default(),
                coverage_threshold: self.coverage_threshold.unwrap_or(DEFAULT_GAP_THRESHOLD),
            },
        })
    }
}
