use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Why an analysis ended in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingInput,
    MissingCredential,
    TransportError,
    ResponseFormatError,
}

/// Errors produced by one run of the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Paste a job description or a job posting URL")]
    MissingInput,

    #[error("No API key is configured")]
    MissingCredential,

    #[error("Completion request failed{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    #[error("Unexpected completion format: {0}")]
    ResponseFormat(String),

    /// Returned to a caller that asks for an analysis while one is running.
    /// The running analysis is untouched.
    #[error("An analysis is already in progress")]
    InProgress,
}

impl AnalysisError {
    /// The failure recorded on the state machine. `InProgress` never reaches
    /// the machine, so it has no kind.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            AnalysisError::MissingInput => Some(FailureKind::MissingInput),
            AnalysisError::MissingCredential => Some(FailureKind::MissingCredential),
            AnalysisError::Transport { .. } => Some(FailureKind::TransportError),
            AnalysisError::ResponseFormat(_) => Some(FailureKind::ResponseFormatError),
            AnalysisError::InProgress => None,
        }
    }

    /// Short notification title shown above the error description.
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => "Missing job description",
            AnalysisError::MissingCredential => "API key required",
            AnalysisError::Transport { .. } => "Completion request failed",
            AnalysisError::ResponseFormat(_) => "Unexpected response",
            AnalysisError::InProgress => "Analysis already running",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, title, message) = match &self {
            AppError::Analysis(err) => {
                let (status, code) = match err {
                    AnalysisError::MissingInput => (StatusCode::BAD_REQUEST, "MISSING_INPUT"),
                    AnalysisError::MissingCredential => {
                        (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL")
                    }
                    AnalysisError::Transport { .. } => {
                        tracing::error!("Completion transport error: {err}");
                        (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR")
                    }
                    AnalysisError::ResponseFormat(_) => {
                        tracing::error!("Completion format error: {err}");
                        (StatusCode::BAD_GATEWAY, "RESPONSE_FORMAT_ERROR")
                    }
                    AnalysisError::InProgress => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS"),
                };
                (status, code, err.title(), err.to_string())
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid request",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Not found",
                msg.clone(),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN_ORIGIN",
                "Request not allowed",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Something went wrong",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "title": title,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
