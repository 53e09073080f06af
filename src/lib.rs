//! article-chat: a mode-routed chatbot service over a Medium article corpus.
//!
//! The service exposes three conversational modes, each pairing a persona
//! prompt with a tool permission profile:
//!
//! - `discovery` — public article discovery; summaries and links only
//! - `tech-explorer` — portfolio showcase focused on technology expertise
//! - `analytics` — private content strategy with full corpus access
//!
//! Requests arrive over HTTP, run exactly one bounded tool-calling
//! exchange against an OpenAI-compatible model, and return a single text
//! answer. The article snapshot is loaded once at startup and never
//! mutated; semantic search is delegated to an external index service.
//!
//! # Crate Layout
//!
//! - [`corpus`] — the immutable article snapshot and derived tech index
//! - [`index`] — the semantic index trait and its HTTP client
//! - [`agent`] — messages, tools, providers, executor, and mode router
//! - [`server`] — the axum transport layer
//! - [`config`] — environment-driven configuration
//! - [`error`] — the service error taxonomy

pub mod agent;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod server;

pub use config::AppConfig;
pub use error::Error;
