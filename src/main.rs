//! article-chat service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Init tracing from `RUST_LOG`
//!   3. Build config from the environment
//!   4. Load the article snapshot (fatal on failure)
//!   5. Wire the provider and index clients
//!   6. Serve until shutdown

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use article_chat::agent::create_provider;
use article_chat::config::AppConfig;
use article_chat::corpus::CorpusStore;
use article_chat::index::RemoteIndex;
use article_chat::server::{AppState, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("article_chat=info")),
        )
        .init();

    let config = AppConfig::from_env().context("configuration error")?;

    // A corpus that fails to load is fatal; serving with no articles
    // would answer every question from nothing.
    let store = CorpusStore::load(&config.snapshot_path).with_context(|| {
        format!(
            "failed to load corpus from {}",
            config.snapshot_path.display()
        )
    })?;
    info!(
        articles = store.len(),
        technologies = store.tech_index().len(),
        path = %config.snapshot_path.display(),
        "corpus loaded"
    );

    let provider = create_provider(&config).context("provider setup failed")?;
    let index = RemoteIndex::new(config.index.clone()).context("index client setup failed")?;

    let state = AppState {
        store: Arc::new(store),
        index: Arc::new(index),
        provider: Arc::from(provider),
        config: Arc::new(config),
    };

    serve(state).await.context("server failed")?;
    Ok(())
}
