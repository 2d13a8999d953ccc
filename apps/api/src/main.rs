mod analysis;
mod config;
mod credentials;
mod download;
mod errors;
mod files;
mod llm_client;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::Analyzer;
use crate::config::Config;
use crate::credentials::{CredentialStore, CREDENTIAL_NAME};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Tailor v{}", env!("CARGO_PKG_VERSION"));

    // Credential store: seeded only from explicit configuration
    let credentials = Arc::new(CredentialStore::new(config.completion_api_key.clone()));
    if credentials.is_configured().await {
        info!("Credential {} loaded from environment", CREDENTIAL_NAME);
    } else {
        warn!(
            "{} is not set; analyses will fail until a key is provided via PUT /api/v1/credential",
            CREDENTIAL_NAME
        );
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.completion_api_url.clone(),
        Duration::from_secs(config.completion_timeout_secs),
    )
    .context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (model: {}, endpoint: {}, timeout: {}s)",
        llm_client::MODEL,
        llm.endpoint(),
        config.completion_timeout_secs
    );

    let analyzer = Arc::new(Analyzer::new(Arc::new(llm), credentials.clone()));

    // Build app state
    let state = AppState {
        analyzer,
        credentials,
        config: config.clone(),
    };

    match &config.cors_allowed_origin {
        Some(origin) => info!("Cross-origin calls allowed from {:?}", origin),
        None => info!("Cross-origin calls disabled; same-origin only"),
    }

    // Build router (origin policy is part of it)
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
