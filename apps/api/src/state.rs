use std::sync::Arc;

use crate::analysis::orchestrator::Analyzer;
use crate::config::Config;
use crate::credentials::CredentialStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single analysis slot. Also holds the last outcome for downloads.
    pub analyzer: Arc<Analyzer>,
    /// Same store the analyzer reads its key from.
    pub credentials: Arc<CredentialStore>,
    pub config: Config,
}
