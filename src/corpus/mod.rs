//! Immutable article corpus loaded once at process start.
//!
//! The store owns every [`ArticleRecord`] plus a derived technology index
//! and exposes read accessors only. All tool-layer queries read from this
//! shared snapshot; there is no mutation path after load.

pub mod article;
pub mod store;

pub use article::{ArticleRecord, ArticleSummary};
pub use store::CorpusStore;
