//! HTTP client for the hosted semantic index.
//!
//! Speaks a small JSON protocol: `POST {base}/indexes/{name}/query` with a
//! bearer token, body `{"query", "top_k", "project", "organization_id"}`,
//! response `{"matches": [{"id", "score"}]}`. One attempt per call; any
//! transport or parse failure surfaces as [`Error::Upstream`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::error::Error;

use super::{ScoredMatch, SemanticIndex};

/// Client for the hosted semantic index service.
#[derive(Debug, Clone)]
pub struct RemoteIndex {
    client: reqwest::Client,
    config: IndexConfig,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    top_k: usize,
    project: &'a str,
    organization_id: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    matches: Vec<ScoredMatch>,
}

impl RemoteIndex {
    /// Creates a client from index configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: IndexConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("index http client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/indexes/{}/query",
            self.config.base_url.trim_end_matches('/'),
            self.config.index_name
        )
    }
}

#[async_trait::async_trait]
impl SemanticIndex for RemoteIndex {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredMatch>, Error> {
        let body = QueryBody {
            query: text,
            top_k,
            project: &self.config.project,
            organization_id: &self.config.organization_id,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "index request failed");
                Error::upstream("index", e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "index returned non-success status");
            return Err(Error::upstream(
                "index",
                format!("status {status} from {}", self.endpoint()),
            ));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream("index", format!("unparseable response: {e}")))?;

        debug!(hits = parsed.matches.len(), "index query complete");
        Ok(parsed.matches)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config() -> IndexConfig {
        IndexConfig {
            base_url: "https://index.example.com/".to_string(),
            index_name: "medium_articles".to_string(),
            project: "Default".to_string(),
            organization_id: "org-123".to_string(),
            api_key: "key".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let index = RemoteIndex::new(config()).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            index.endpoint(),
            "https://index.example.com/indexes/medium_articles/query"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"matches":[{"id":"a-001","score":0.83},{"id":"a-002","score":0.41}]}"#;
        let parsed: QueryResponse = serde_json::from_str(raw)
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].id, "a-001");
    }
}
