//! Article record types.
//!
//! [`ArticleRecord`] mirrors one entry of the snapshot manifest.
//! [`ArticleSummary`] is the projection handed to non-analytics modes:
//! everything except the full body text.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single article as loaded from the corpus snapshot.
///
/// Immutable after load. `content` may be absent in the snapshot; tools that
/// are restricted to summaries never read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Unique identifier across the corpus.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Topic tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Technologies the article covers. Source of the tech index.
    #[serde(default)]
    pub tech_stack: BTreeSet<String>,
    /// Short summary / teaser text.
    pub summary: String,
    /// Full body text. Optional in the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Canonical source URL.
    pub url: String,
    /// Body word count, when the snapshot provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
}

impl ArticleRecord {
    /// Publication year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Summary projection of an article with no full body text.
///
/// This is the only article shape the discovery and tech-explorer modes can
/// ever see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Unique identifier across the corpus.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Topic tags.
    pub tags: BTreeSet<String>,
    /// Technologies the article covers.
    pub tech_stack: BTreeSet<String>,
    /// Short summary / teaser text.
    pub summary: String,
    /// Canonical source URL.
    pub url: String,
}

impl From<&ArticleRecord> for ArticleSummary {
    fn from(record: &ArticleRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            date: record.date,
            tags: record.tags.clone(),
            tech_stack: record.tech_stack.clone(),
            summary: record.summary.clone(),
            url: record.url.clone(),
        }
    }
}
