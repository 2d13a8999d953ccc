use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credentials::CREDENTIAL_NAME;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    pub name: &'static str,
    pub configured: bool,
}

/// GET /api/v1/credential
/// Reports whether a key is set. The key itself is never returned.
pub async fn handle_get_credential(State(state): State<AppState>) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        name: CREDENTIAL_NAME,
        configured: state.credentials.is_configured().await,
    })
}

/// PUT /api/v1/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(request): Json<SetCredentialRequest>,
) -> Result<StatusCode, AppError> {
    if !state.credentials.set(&request.api_key).await {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }
    info!("Credential {} updated", CREDENTIAL_NAME);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/credential
pub async fn handle_clear_credential(State(state): State<AppState>) -> StatusCode {
    state.credentials.clear().await;
    info!("Credential {} cleared", CREDENTIAL_NAME);
    StatusCode::NO_CONTENT
}
