//! Tool type definitions for function-calling over the article corpus.
//!
//! Provides provider-agnostic types for tool definitions, calls, and
//! results, plus the per-mode permission profiles. Five tools exist in
//! total; which subset a request may use depends entirely on its mode.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the dispatch table in the executor).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// Result content (JSON string on success, error message on failure).
    pub content: String,
    /// Whether this result represents an error.
    pub is_error: bool,
}

/// A set of tool definitions scoped to a conversational mode.
///
/// Permission profiles:
/// - Discovery / tech-explorer: `search_articles`, `filter_by_metadata`,
///   `analyze_tech_stack`
/// - Analytics: all five tools, adding `find_content_gaps` and
///   `get_full_article`
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` when a tool of this name is permitted.
    #[must_use]
    pub fn permits(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// Tool set for the public discovery mode.
    #[must_use]
    pub fn discovery_tools() -> Self {
        Self {
            definitions: vec![
                def_search_articles(),
                def_filter_by_metadata(),
                def_analyze_tech_stack(),
            ],
        }
    }

    /// Tool set for the tech-explorer showcase mode.
    ///
    /// Same surface as discovery; the persona prompt differs.
    #[must_use]
    pub fn tech_explorer_tools() -> Self {
        Self::discovery_tools()
    }

    /// Tool set for the private analytics mode.
    ///
    /// The only profile that can retrieve full article bodies or run gap
    /// analysis.
    #[must_use]
    pub fn analytics_tools() -> Self {
        Self {
            definitions: vec![
                def_search_articles(),
                def_filter_by_metadata(),
                def_analyze_tech_stack(),
                def_find_content_gaps(),
                def_get_full_article(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tool schema definitions
// ---------------------------------------------------------------------------

/// Defines the `search_articles` tool.
fn def_search_articles() -> ToolDefinition {
    ToolDefinition {
        name: "search_articles".to_string(),
        description: "Search articles semantically by free-text query. Returns article \
                       summaries ranked by relevance. Returns an empty list when nothing \
                       meets the relevance threshold."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query text."
                },
                "top_k": {
                    "type": "integer",
                    "description": "Number of results to return. Defaults to 3.",
                    "default": 3
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}

/// Defines the `filter_by_metadata` tool.
fn def_filter_by_metadata() -> ToolDefinition {
    ToolDefinition {
        name: "filter_by_metadata".to_string(),
        description: "Filter articles by technology, tag, year, or publication date range. \
                       Deterministic, no relevance ranking. Results are ordered by date \
                       descending."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "tech": {
                    "type": "string",
                    "description": "Technology name, matched case-insensitively (e.g., 'Python')."
                },
                "tag": {
                    "type": "string",
                    "description": "Article tag, matched case-insensitively."
                },
                "year": {
                    "type": "integer",
                    "description": "Publication year (e.g., 2024)."
                },
                "date_from": {
                    "type": "string",
                    "format": "date",
                    "description": "Earliest publication date, inclusive (YYYY-MM-DD)."
                },
                "date_to": {
                    "type": "string",
                    "format": "date",
                    "description": "Latest publication date, inclusive (YYYY-MM-DD)."
                }
            },
            "additionalProperties": false
        }),
    }
}

/// Defines the `analyze_tech_stack` tool.
fn def_analyze_tech_stack() -> ToolDefinition {
    ToolDefinition {
        name: "analyze_tech_stack".to_string(),
        description: "Aggregate per-technology statistics: article counts, date ranges, and \
                       the articles covering each technology. Pass 'technology' to narrow to \
                       matching technologies; omit it for the full breakdown."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "technology": {
                    "type": "string",
                    "description": "Technology name to analyze, matched case-insensitively."
                }
            },
            "additionalProperties": false
        }),
    }
}

/// Defines the `find_content_gaps` tool (analytics only).
fn def_find_content_gaps() -> ToolDefinition {
    ToolDefinition {
        name: "find_content_gaps".to_string(),
        description: "Report technologies whose coverage falls below the configured \
                       expectation, plus publication counts by year. Analytics mode only."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}

/// Defines the `get_full_article` tool (analytics only).
fn def_get_full_article() -> ToolDefinition {
    ToolDefinition {
        name: "get_full_article".to_string(),
        description: "Retrieve the full record of an article by id, including its body text. \
                       Analytics mode only."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Article identifier."
                }
            },
            "required": ["id"],
            "additionalProperties": false
        }),
    }
}
