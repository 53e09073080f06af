//! External semantic index seam.
//!
//! Relevance scoring is delegated entirely to a hosted index service. The
//! [`SemanticIndex`] trait keeps the tool layer decoupled from the wire
//! protocol so tests can substitute canned rankings.

pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use remote::RemoteIndex;

/// One ranked hit from the index: an article id with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Article identifier as known to the corpus.
    pub id: String,
    /// Relevance score assigned by the index (higher is better).
    pub score: f32,
}

/// Query interface over the hosted semantic index.
///
/// Implementations handle transport and authentication; callers see only
/// ranked identifiers.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Returns up to `top_k` matches for the query text, best first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] if the index is unreachable or responds
    /// with something unparseable.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredMatch>, Error>;
}
