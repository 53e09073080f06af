//! Corpus store: snapshot loading and the derived technology index.
//!
//! `BTreeMap`/`BTreeSet` keep iteration order deterministic, so loading the
//! same snapshot twice yields identical collections and every tool result
//! built from them is reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::info;

use crate::error::Error;

use super::article::{ArticleRecord, ArticleSummary};

/// Immutable article collection plus the technology index derived from it.
///
/// Built once at startup and shared read-only by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStore {
    articles: BTreeMap<String, ArticleRecord>,
    tech_index: BTreeMap<String, BTreeSet<String>>,
}

impl CorpusStore {
    /// Loads the corpus from a JSON snapshot file (an array of records).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the file is unreadable, the JSON is
    /// malformed, a record is missing required fields, or two records share
    /// an id.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::load(format!("cannot read {}: {e}", path.display())))?;

        let records: Vec<ArticleRecord> = serde_json::from_str(&raw)
            .map_err(|e| Error::load(format!("cannot parse {}: {e}", path.display())))?;

        let store = Self::from_records(records)?;
        info!(
            articles = store.len(),
            technologies = store.tech_index.len(),
            path = %path.display(),
            "corpus loaded"
        );
        Ok(store)
    }

    /// Builds the store and tech index from already-parsed records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] on an empty id or a duplicate id.
    pub fn from_records(records: Vec<ArticleRecord>) -> Result<Self, Error> {
        let mut articles = BTreeMap::new();
        let mut tech_index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for record in records {
            if record.id.is_empty() {
                return Err(Error::load(format!(
                    "article '{}' has an empty id",
                    record.title
                )));
            }
            for tech in &record.tech_stack {
                tech_index
                    .entry(tech.clone())
                    .or_default()
                    .insert(record.id.clone());
            }
            if let Some(previous) = articles.insert(record.id.clone(), record) {
                return Err(Error::load(format!("duplicate article id: {}", previous.id)));
            }
        }

        Ok(Self {
            articles,
            tech_index,
        })
    }

    /// Returns the article with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the id is absent.
    pub fn get(&self, id: &str) -> Result<&ArticleRecord, Error> {
        self.articles.get(id).ok_or_else(|| Error::NotFound {
            id: id.to_string(),
        })
    }

    /// Summary projection of the article with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the id is absent.
    pub fn get_summary(&self, id: &str) -> Result<ArticleSummary, Error> {
        self.get(id).map(ArticleSummary::from)
    }

    /// Iterates all articles in id order.
    pub fn articles(&self) -> impl Iterator<Item = &ArticleRecord> {
        self.articles.values()
    }

    /// Technology name → ids of articles covering it.
    #[must_use]
    pub const fn tech_index(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.tech_index
    }

    /// Number of articles in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Returns `true` when the corpus holds no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Total number of (article, technology) pairs in the corpus.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.tech_index.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("valid date literal"))
    }

    fn record(id: &str, techs: &[&str]) -> ArticleRecord {
        ArticleRecord {
            id: id.to_string(),
            title: format!("Article {id}"),
            date: date(2024, 1, 1),
            tags: BTreeSet::new(),
            tech_stack: techs.iter().map(|t| (*t).to_string()).collect(),
            summary: "s".to_string(),
            content: None,
            url: format!("https://medium.com/@x/{id}"),
            word_count: None,
        }
    }

    #[test]
    fn test_from_records_builds_index() {
        let store = CorpusStore::from_records(vec![
            record("a", &["Rust", "Docker"]),
            record("b", &["Rust"]),
        ])
        .unwrap_or_else(|e| panic!("load failed: {e}"));

        assert_eq!(store.len(), 2);
        let rust = store
            .tech_index()
            .get("Rust")
            .unwrap_or_else(|| panic!("Rust entry missing"));
        assert_eq!(rust.len(), 2);
        assert_eq!(store.pair_count(), 3);
    }

    #[test]
    fn test_index_ids_all_exist() {
        let store = CorpusStore::from_records(vec![
            record("a", &["Rust"]),
            record("b", &["Python", "Docker"]),
        ])
        .unwrap_or_else(|e| panic!("load failed: {e}"));

        for ids in store.tech_index().values() {
            for id in ids {
                assert!(store.get(id).is_ok(), "index references unknown id {id}");
            }
        }
    }

    #[test]
    fn test_duplicate_id_is_load_error() {
        let result = CorpusStore::from_records(vec![record("a", &[]), record("a", &[])]);
        assert!(matches!(result, Err(Error::Load { .. })));
    }

    #[test]
    fn test_empty_id_is_load_error() {
        let result = CorpusStore::from_records(vec![record("", &[])]);
        assert!(matches!(result, Err(Error::Load { .. })));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = CorpusStore::from_records(vec![record("a", &[])])
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        assert!(matches!(store.get("nope"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new()
            .unwrap_or_else(|e| panic!("tempfile failed: {e}"));
        let json = serde_json::to_string(&vec![record("a", &["Rust"])]).unwrap_or_default();
        file.write_all(json.as_bytes())
            .unwrap_or_else(|e| panic!("write failed: {e}"));

        let store = CorpusStore::load(file.path()).unwrap_or_else(|e| panic!("load failed: {e}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new()
            .unwrap_or_else(|e| panic!("tempfile failed: {e}"));
        file.write_all(b"{not json")
            .unwrap_or_else(|e| panic!("write failed: {e}"));

        let result = CorpusStore::load(file.path());
        assert!(matches!(result, Err(Error::Load { .. })));
    }

    #[test]
    fn test_round_trip_identical() {
        let records = vec![record("b", &["Rust"]), record("a", &["Python", "Rust"])];
        let first = CorpusStore::from_records(records.clone())
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        let second = CorpusStore::from_records(records)
            .unwrap_or_else(|e| panic!("load failed: {e}"));
        assert_eq!(first, second);

        // Iteration order is part of the contract.
        let ids_first: Vec<_> = first.articles().map(|a| a.id.clone()).collect();
        let ids_second: Vec<_> = second.articles().map(|a| a.id.clone()).collect();
        assert_eq!(ids_first, ids_second);
        assert_eq!(ids_first, vec!["a".to_string(), "b".to_string()]);
    }
}
