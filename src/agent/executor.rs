//! Tool executor: typed dispatch of model tool calls over the corpus.
//!
//! Every call is checked against the active mode's [`ToolSet`] before
//! anything runs, then parsed into the closed [`ToolInvocation`] enum and
//! dispatched by exhaustive match. Unknown names and malformed arguments
//! never reach a tool body; they come back to the model as tool errors.
//! Only `search_articles` touches the network; everything else is a pure
//! read of the in-process snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::corpus::{ArticleSummary, CorpusStore};
use crate::error::Error;
use crate::index::SemanticIndex;

use super::tool::{ToolCall, ToolResult, ToolSet};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 100_000;
/// Maximum summaries returned by `filter_by_metadata`.
const FILTER_RESULT_CAP: usize = 25;

/// A parsed, validated tool call: the closed set of operations the model
/// may request.
///
/// Dispatch is an exhaustive match over these variants; there is no
/// open-ended name-to-function lookup beyond [`ToolInvocation::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    /// Semantic search via the external index.
    SearchArticles {
        /// Free-text query.
        query: String,
        /// Requested result count; clamped by the executor.
        top_k: Option<usize>,
    },
    /// Deterministic metadata filter over the snapshot.
    FilterByMetadata {
        /// Technology substring, case-insensitive.
        tech: Option<String>,
        /// Tag substring, case-insensitive.
        tag: Option<String>,
        /// Publication year.
        year: Option<i32>,
        /// Earliest date, inclusive.
        date_from: Option<NaiveDate>,
        /// Latest date, inclusive.
        date_to: Option<NaiveDate>,
    },
    /// Per-technology aggregation from the tech index.
    AnalyzeTechStack {
        /// Optional technology substring to narrow the breakdown.
        technology: Option<String>,
    },
    /// Coverage-gap report (analytics profile only).
    FindContentGaps,
    /// Full article body by id (analytics profile only).
    GetFullArticle {
        /// Article identifier.
        id: String,
    },
}

impl ToolInvocation {
    /// Parses a tool name and its JSON arguments into a typed invocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for names outside the closed set or
    /// arguments that do not match the tool's schema.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, Error> {
        // Providers send "" or "{}" interchangeably for no-arg tools.
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };

        match name {
            "search_articles" => {
                #[derive(Deserialize)]
                struct Args {
                    query: String,
                    top_k: Option<usize>,
                }
                let args: Args = parse_args(name, arguments)?;
                Ok(Self::SearchArticles {
                    query: args.query,
                    top_k: args.top_k,
                })
            }
            "filter_by_metadata" => {
                #[derive(Deserialize)]
                struct Args {
                    tech: Option<String>,
                    tag: Option<String>,
                    year: Option<i32>,
                    date_from: Option<NaiveDate>,
                    date_to: Option<NaiveDate>,
                }
                let args: Args = parse_args(name, arguments)?;
                Ok(Self::FilterByMetadata {
                    tech: args.tech,
                    tag: args.tag,
                    year: args.year,
                    date_from: args.date_from,
                    date_to: args.date_to,
                })
            }
            "analyze_tech_stack" => {
                #[derive(Deserialize)]
                struct Args {
                    technology: Option<String>,
                }
                let args: Args = parse_args(name, arguments)?;
                Ok(Self::AnalyzeTechStack {
                    technology: args.technology,
                })
            }
            "find_content_gaps" => {
                #[derive(Deserialize)]
                struct Args {}
                let Args {} = parse_args(name, arguments)?;
                Ok(Self::FindContentGaps)
            }
            "get_full_article" => {
                #[derive(Deserialize)]
                struct Args {
                    id: String,
                }
                let args: Args = parse_args(name, arguments)?;
                Ok(Self::GetFullArticle { id: args.id })
            }
            other => Err(Error::validation(format!("unknown tool: {other}"))),
        }
    }
}

fn parse_args<'de, T: Deserialize<'de>>(name: &str, arguments: &'de str) -> Result<T, Error> {
    serde_json::from_str(arguments)
        .map_err(|e| Error::validation(format!("invalid arguments for {name}: {e}")))
}

/// Executes tool calls against the corpus snapshot and the semantic index.
///
/// Holds shared references only; the corpus is read-only and the executor
/// is cheap to build per request.
pub struct ToolExecutor<'a> {
    store: &'a CorpusStore,
    index: &'a dyn SemanticIndex,
    allowed: &'a ToolSet,
    mode_slug: &'a str,
    config: &'a AppConfig,
}

impl<'a> ToolExecutor<'a> {
    /// Creates an executor scoped to one mode's permission profile.
    #[must_use]
    pub const fn new(
        store: &'a CorpusStore,
        index: &'a dyn SemanticIndex,
        allowed: &'a ToolSet,
        mode_slug: &'a str,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            store,
            index,
            allowed,
            mode_slug,
            config,
        }
    }

    /// Dispatches one tool call.
    ///
    /// Permission and argument failures become `is_error` tool results and
    /// go back to the model. Only an index failure aborts the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the external index call fails.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, Error> {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return Ok(tool_error(
                call,
                &format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            ));
        }

        // Permission gate fires before parsing: a disallowed name must never
        // execute, even with valid arguments.
        if !self.allowed.permits(&call.name) {
            let err = Error::Forbidden {
                tool: call.name.clone(),
                mode: self.mode_slug.to_string(),
            };
            warn!(tool = %call.name, mode = %self.mode_slug, "tool call outside permission profile");
            return Ok(tool_error(call, &err.to_string()));
        }

        let invocation = match ToolInvocation::parse(&call.name, &call.arguments) {
            Ok(inv) => inv,
            Err(e) => return Ok(tool_error(call, &e.to_string())),
        };

        let payload = match invocation {
            ToolInvocation::SearchArticles { query, top_k } => {
                // The one networked tool; upstream failure is fatal for the
                // request rather than a model-recoverable tool error.
                let hits = self.search_articles(&query, top_k).await?;
                serialize_payload(&call.name, &hits)
            }
            ToolInvocation::FilterByMetadata {
                tech,
                tag,
                year,
                date_from,
                date_to,
            } => {
                let report = self.filter_by_metadata(
                    tech.as_deref(),
                    tag.as_deref(),
                    year,
                    date_from,
                    date_to,
                );
                serialize_payload(&call.name, &report)
            }
            ToolInvocation::AnalyzeTechStack { technology } => {
                let report = self.analyze_tech_stack(technology.as_deref());
                serialize_payload(&call.name, &report)
            }
            ToolInvocation::FindContentGaps => {
                let report = self.find_content_gaps();
                serialize_payload(&call.name, &report)
            }
            ToolInvocation::GetFullArticle { id } => match self.store.get(&id) {
                Ok(record) => serialize_payload(&call.name, record),
                Err(e) => return Ok(tool_error(call, &e.to_string())),
            },
        };

        match payload {
            Ok(content) => Ok(ToolResult {
                tool_call_id: call.id.clone(),
                content,
                is_error: false,
            }),
            Err(e) => Ok(tool_error(call, &e.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Tool implementations
    // -----------------------------------------------------------------------

    /// Queries the external index and maps hits back to summaries.
    async fn search_articles(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<SearchHit>, Error> {
        let top_k = top_k
            .unwrap_or(self.config.default_top_k)
            .clamp(1, self.config.max_top_k);

        let matches = self.index.query(query, top_k).await?;

        let mut hits = Vec::new();
        for m in matches {
            if m.score < self.config.relevance_threshold {
                continue;
            }
            // The hosted index may lag the snapshot; drop ids we don't know.
            match self.store.get_summary(&m.id) {
                Ok(summary) => hits.push(SearchHit {
                    score: m.score,
                    article: summary,
                }),
                Err(_) => debug!(id = %m.id, "index returned id absent from corpus"),
            }
        }
        Ok(hits)
    }

    /// Deterministic metadata filter, ordered by date descending then id.
    fn filter_by_metadata(
        &self,
        tech: Option<&str>,
        tag: Option<&str>,
        year: Option<i32>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> FilterReport {
        let mut matches: Vec<&crate::corpus::ArticleRecord> = self
            .store
            .articles()
            .filter(|a| {
                tech.is_none_or(|t| a.tech_stack.iter().any(|s| contains_ci(s, t)))
                    && tag.is_none_or(|t| a.tags.iter().any(|s| contains_ci(s, t)))
                    && year.is_none_or(|y| a.year() == y)
                    && date_from.is_none_or(|d| a.date >= d)
                    && date_to.is_none_or(|d| a.date <= d)
            })
            .collect();

        matches.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        let total = matches.len();
        let articles = matches
            .into_iter()
            .take(FILTER_RESULT_CAP)
            .map(ArticleSummary::from)
            .collect();

        FilterReport { total, articles }
    }

    /// Aggregates article counts and date ranges per technology.
    fn analyze_tech_stack(&self, technology: Option<&str>) -> TechStackReport {
        let mut technologies = Vec::new();

        for (tech, ids) in self.store.tech_index() {
            if let Some(filter) = technology
                && !contains_ci(tech, filter)
            {
                continue;
            }

            let mut articles: Vec<TechArticle> = ids
                .iter()
                .filter_map(|id| self.store.get(id).ok())
                .map(|a| TechArticle {
                    id: a.id.clone(),
                    title: a.title.clone(),
                    date: a.date,
                })
                .collect();
            articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

            let first_mention = articles.iter().map(|a| a.date).min();
            let latest_mention = articles.iter().map(|a| a.date).max();

            technologies.push(TechStat {
                technology: tech.clone(),
                article_count: ids.len(),
                first_mention,
                latest_mention,
                articles,
            });
        }

        TechStackReport { technologies }
    }

    /// Compares observed coverage against the configured expectation.
    fn find_content_gaps(&self) -> GapReport {
        let threshold = self.config.gap.coverage_threshold;

        let gaps = self
            .config
            .gap
            .expected_coverage
            .iter()
            .filter_map(|expected| {
                let observed = self.observed_count(expected);
                (observed < threshold).then(|| GapEntry {
                    technology: expected.clone(),
                    observed,
                    threshold,
                })
            })
            .collect();

        let mut articles_per_year: BTreeMap<i32, usize> = BTreeMap::new();
        for article in self.store.articles() {
            *articles_per_year.entry(article.year()).or_default() += 1;
        }

        GapReport {
            total_articles: self.store.len(),
            gaps,
            articles_per_year,
        }
    }

    /// Distinct articles covering a technology, matched case-insensitively.
    fn observed_count(&self, expected: &str) -> usize {
        let mut ids = std::collections::BTreeSet::new();
        for (tech, article_ids) in self.store.tech_index() {
            if tech.eq_ignore_ascii_case(expected) {
                ids.extend(article_ids.iter());
            }
        }
        ids.len()
    }
}

/// Case-insensitive substring match.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn tool_error(call: &ToolCall, message: &str) -> ToolResult {
    ToolResult {
        tool_call_id: call.id.clone(),
        content: message.to_string(),
        is_error: true,
    }
}

fn serialize_payload<T: Serialize>(name: &str, payload: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| Error::validation(format!("serialization error in {name}: {e}")))
}

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// One semantic search hit: relevance score plus the article summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score from the index.
    pub score: f32,
    /// Summary projection of the matched article.
    pub article: ArticleSummary,
}

/// Result of `filter_by_metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    /// Total matches before the result cap.
    pub total: usize,
    /// Matching summaries, date descending, capped.
    pub articles: Vec<ArticleSummary>,
}

/// One article reference inside a [`TechStat`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechArticle {
    /// Article identifier.
    pub id: String,
    /// Article title.
    pub title: String,
    /// Publication date.
    pub date: NaiveDate,
}

/// Aggregated statistics for one technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechStat {
    /// Technology name as it appears in the corpus.
    pub technology: String,
    /// Number of articles covering it.
    pub article_count: usize,
    /// Earliest publication date among those articles.
    pub first_mention: Option<NaiveDate>,
    /// Latest publication date among those articles.
    pub latest_mention: Option<NaiveDate>,
    /// The articles themselves, date descending.
    pub articles: Vec<TechArticle>,
}

/// Result of `analyze_tech_stack`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechStackReport {
    /// Per-technology statistics in technology-name order.
    pub technologies: Vec<TechStat>,
}

/// One under-covered technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapEntry {
    /// Technology from the expected-coverage set.
    pub technology: String,
    /// Distinct articles covering it.
    pub observed: usize,
    /// Coverage bar it fell below.
    pub threshold: usize,
}

/// Result of `find_content_gaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    /// Corpus size.
    pub total_articles: usize,
    /// Technologies below the coverage threshold, in expected-set order.
    pub gaps: Vec<GapEntry>,
    /// Publication counts by year.
    pub articles_per_year: BTreeMap<i32, usize>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;
    use proptest::prelude::*;

    use crate::index::ScoredMatch;

    use super::*;

    /// Canned index: returns fixed matches, never touches the network.
    struct FixedIndex {
        matches: Vec<ScoredMatch>,
    }

    #[async_trait]
    impl SemanticIndex for FixedIndex {
        async fn query(&self, _text: &str, top_k: usize) -> Result<Vec<ScoredMatch>, Error> {
            Ok(self.matches.iter().take(top_k).cloned().collect())
        }
    }

    /// Index that always fails, for upstream-error paths.
    struct BrokenIndex;

    #[async_trait]
    impl SemanticIndex for BrokenIndex {
        async fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<ScoredMatch>, Error> {
            Err(Error::upstream("index", "connection refused"))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("valid date literal"))
    }

    fn record(
        id: &str,
        title: &str,
        d: NaiveDate,
        tags: &[&str],
        techs: &[&str],
    ) -> crate::corpus::ArticleRecord {
        crate::corpus::ArticleRecord {
            id: id.to_string(),
            title: title.to_string(),
            date: d,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            tech_stack: techs.iter().map(|t| (*t).to_string()).collect(),
            summary: format!("Summary of {title}"),
            content: Some(format!("Full body of {title}")),
            url: format!("https://medium.com/@x/{id}"),
            word_count: Some(900),
        }
    }

    fn store() -> CorpusStore {
        CorpusStore::from_records(vec![
            record(
                "a-001",
                "Python Patterns",
                date(2024, 3, 1),
                &["tutorial"],
                &["Python", "Docker"],
            ),
            record(
                "a-002",
                "Rust Services",
                date(2024, 6, 15),
                &["tutorial", "backend"],
                &["Rust"],
            ),
            record(
                "a-003",
                "Python for AI",
                date(2023, 11, 20),
                &["ai"],
                &["Python", "OpenAI"],
            ),
        ])
        .unwrap_or_else(|e| panic!("store build failed: {e}"))
    }

    fn config() -> AppConfig {
        AppConfig::builder()
            .api_key("k")
            .index_api_key("k")
            .expected_coverage(["Python".to_string(), "Kubernetes".to_string()])
            .coverage_threshold(3)
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    async fn run(
        store: &CorpusStore,
        index: &dyn SemanticIndex,
        allowed: &ToolSet,
        config: &AppConfig,
        c: &ToolCall,
    ) -> ToolResult {
        let executor = ToolExecutor::new(store, index, allowed, "discovery", config);
        executor
            .execute(c)
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"))
    }

    #[test]
    fn test_parse_unknown_tool() {
        let result = ToolInvocation::parse("drop_tables", "{}");
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_parse_search() {
        let inv = ToolInvocation::parse("search_articles", r#"{"query":"python","top_k":5}"#)
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(
            inv,
            ToolInvocation::SearchArticles {
                query: "python".to_string(),
                top_k: Some(5),
            }
        );
    }

    #[test]
    fn test_parse_empty_arguments() {
        let inv = ToolInvocation::parse("find_content_gaps", "")
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(inv, ToolInvocation::FindContentGaps);
    }

    #[test]
    fn test_parse_bad_arguments() {
        let result = ToolInvocation::parse("get_full_article", r#"{"id":42}"#);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_parse_malformed_no_arg_tool() {
        // No-arg tools still reject broken argument JSON.
        let result = ToolInvocation::parse("find_content_gaps", r#"{"junk":"#);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_search_maps_ids_to_summaries() {
        let store = store();
        let index = FixedIndex {
            matches: vec![
                ScoredMatch {
                    id: "a-001".to_string(),
                    score: 0.9,
                },
                ScoredMatch {
                    id: "stale-id".to_string(),
                    score: 0.8,
                },
            ],
        };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("search_articles", r#"{"query":"python"}"#),
        )
        .await;

        assert!(!result.is_error, "got: {}", result.content);
        let hits: Vec<SearchHit> = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));
        // Stale id dropped, known id mapped to a summary without body text.
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article.id, "a-001");
        assert!(!result.content.contains("Full body"));
    }

    #[tokio::test]
    async fn test_search_empty_is_not_error() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("search_articles", r#"{"query":"quantum basket weaving"}"#),
        )
        .await;

        assert!(!result.is_error);
        assert_eq!(result.content.trim(), "[]");
    }

    #[tokio::test]
    async fn test_search_upstream_failure_aborts() {
        let store = store();
        let allowed = ToolSet::discovery_tools();
        let config = config();
        let executor = ToolExecutor::new(&store, &BrokenIndex, &allowed, "discovery", &config);

        let result = executor
            .execute(&call("search_articles", r#"{"query":"python"}"#))
            .await;
        assert!(matches!(result, Err(Error::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_filter_deterministic_and_ordered() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();
        let c = call("filter_by_metadata", r#"{"tech":"python"}"#);

        let first = run(&store, &index, &allowed, &config, &c).await;
        let second = run(&store, &index, &allowed, &config, &c).await;
        assert_eq!(first.content, second.content);

        let report: FilterReport = serde_json::from_str(&first.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));
        assert_eq!(report.total, 2);
        // Date descending: 2024-03-01 before 2023-11-20.
        assert_eq!(report.articles[0].id, "a-001");
        assert_eq!(report.articles[1].id, "a-003");
    }

    #[tokio::test]
    async fn test_filter_by_year_and_date_range() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("filter_by_metadata", r#"{"year":2024}"#),
        )
        .await;
        let report: FilterReport = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));
        assert_eq!(report.total, 2);

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call(
                "filter_by_metadata",
                r#"{"date_from":"2024-04-01","date_to":"2024-12-31"}"#,
            ),
        )
        .await;
        let report: FilterReport = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));
        assert_eq!(report.total, 1);
        assert_eq!(report.articles[0].id, "a-002");
    }

    #[tokio::test]
    async fn test_analyze_counts_sum_to_pair_count() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("analyze_tech_stack", "{}"),
        )
        .await;
        let report: TechStackReport = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));

        let sum: usize = report.technologies.iter().map(|t| t.article_count).sum();
        assert_eq!(sum, store.pair_count());

        // Every reported technology exists as an index key.
        for stat in &report.technologies {
            assert!(store.tech_index().contains_key(&stat.technology));
        }
    }

    #[tokio::test]
    async fn test_analyze_subset_case_insensitive() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("analyze_tech_stack", r#"{"technology":"python"}"#),
        )
        .await;
        let report: TechStackReport = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));
        assert_eq!(report.technologies.len(), 1);
        assert_eq!(report.technologies[0].technology, "Python");
        assert_eq!(report.technologies[0].article_count, 2);
        assert_eq!(
            report.technologies[0].first_mention,
            Some(date(2023, 11, 20))
        );
        assert_eq!(
            report.technologies[0].latest_mention,
            Some(date(2024, 3, 1))
        );
    }

    #[tokio::test]
    async fn test_gaps_report_below_threshold_only() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::analytics_tools();
        let config = config();
        let executor = ToolExecutor::new(&store, &index, &allowed, "analytics", &config);

        let result = executor
            .execute(&call("find_content_gaps", "{}"))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));
        let report: GapReport = serde_json::from_str(&result.content)
            .unwrap_or_else(|e| panic!("payload parse failed: {e}"));

        // Python has 2 articles (< 3), Kubernetes has 0: both are gaps.
        assert_eq!(report.gaps.len(), 2);
        assert_eq!(report.gaps[0].technology, "Kubernetes");
        assert_eq!(report.gaps[0].observed, 0);
        assert_eq!(report.gaps[1].technology, "Python");
        assert_eq!(report.gaps[1].observed, 2);
        assert_eq!(report.total_articles, 3);
        assert_eq!(report.articles_per_year.get(&2024), Some(&2));
    }

    #[tokio::test]
    async fn test_full_article_forbidden_outside_analytics() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("get_full_article", r#"{"id":"a-001"}"#),
        )
        .await;

        assert!(result.is_error);
        assert!(result.content.contains("not permitted"));
        assert!(!result.content.contains("Full body"));
    }

    #[tokio::test]
    async fn test_full_article_in_analytics() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::analytics_tools();
        let config = config();
        let executor = ToolExecutor::new(&store, &index, &allowed, "analytics", &config);

        let result = executor
            .execute(&call("get_full_article", r#"{"id":"a-001"}"#))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));

        assert!(!result.is_error, "got: {}", result.content);
        assert!(result.content.contains("Full body of Python Patterns"));
    }

    #[tokio::test]
    async fn test_full_article_unknown_id() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::analytics_tools();
        let config = config();
        let executor = ToolExecutor::new(&store, &index, &allowed, "analytics", &config);

        let result = executor
            .execute(&call("get_full_article", r#"{"id":"nope"}"#))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));

        assert!(result.is_error);
        assert!(result.content.contains("not found"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_error() {
        let store = store();
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::discovery_tools();
        let config = config();

        let result = run(
            &store,
            &index,
            &allowed,
            &config,
            &call("delete_everything", "{}"),
        )
        .await;

        assert!(result.is_error);
        assert!(result.content.contains("not permitted"));
    }

    proptest! {
        /// Forbidden holds for every id, existing or not, under discovery.
        #[test]
        fn prop_full_article_always_forbidden_in_discovery(id in "[a-z0-9-]{0,24}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap_or_else(|e| panic!("runtime build failed: {e}"));
            rt.block_on(async {
                let store = store();
                let index = FixedIndex { matches: vec![] };
                let allowed = ToolSet::discovery_tools();
                let config = config();
                let arguments = serde_json::json!({ "id": id }).to_string();

                let result = run(
                    &store,
                    &index,
                    &allowed,
                    &config,
                    &call("get_full_article", &arguments),
                )
                .await;

                prop_assert!(result.is_error);
                prop_assert!(!result.content.contains("Full body"));
                Ok(())
            })?;
        }
    }

    #[test]
    fn test_observed_count_unions_case_variants() {
        let store = CorpusStore::from_records(vec![
            record("a", "A", date(2024, 1, 1), &[], &["rust"]),
            record("b", "B", date(2024, 1, 2), &[], &["Rust"]),
        ])
        .unwrap_or_else(|e| panic!("store build failed: {e}"));
        let index = FixedIndex { matches: vec![] };
        let allowed = ToolSet::analytics_tools();
        let config = config();
        let executor = ToolExecutor::new(&store, &index, &allowed, "analytics", &config);

        assert_eq!(executor.observed_count("RUST"), 2);
    }
}
