//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::analysis::orchestrator::{AnalysisOutcome, AnalysisRequest};
use crate::analysis::state::AnalysisState;
use crate::download::{attachment, COVER_LETTER_FILENAME, RESUME_FILENAME};
use crate::errors::AppError;
use crate::files::read_resume_text;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisStatusResponse {
    #[serde(flatten)]
    pub state: AnalysisState,
    pub outcome: Option<AnalysisOutcome>,
}

/// POST /api/v1/analyze
///
/// Multipart form: `job_text`, `job_url`, and an optional `resume` file.
/// The analysis runs on its own task so a dropped connection cannot leave
/// the state machine stuck mid-flight; the outcome stays readable through
/// `GET /api/v1/analysis`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let request = read_analysis_form(multipart).await?;
    info!("Analyze requested: {}", form_summary(&request));

    let analyzer = state.analyzer.clone();
    let outcome = tokio::spawn(async move { analyzer.analyze(request).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Analysis task failed: {e}")))??;

    Ok(Json(outcome))
}

/// GET /api/v1/analysis
///
/// Current state of the analysis slot plus the outcome, if one is held.
pub async fn handle_get_analysis(State(state): State<AppState>) -> Json<AnalysisStatusResponse> {
    let (state, outcome) = state.analyzer.snapshot().await;
    Json(AnalysisStatusResponse { state, outcome })
}

/// GET /api/v1/analysis/resume
pub async fn handle_download_resume(State(state): State<AppState>) -> Result<Response, AppError> {
    let outcome = current_outcome(&state).await?;
    Ok(attachment(RESUME_FILENAME, outcome.resume_content))
}

/// GET /api/v1/analysis/cover-letter
pub async fn handle_download_cover_letter(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let outcome = current_outcome(&state).await?;
    Ok(attachment(COVER_LETTER_FILENAME, outcome.cover_letter))
}

async fn current_outcome(state: &AppState) -> Result<AnalysisOutcome, AppError> {
    state.analyzer.outcome().await.ok_or_else(|| {
        AppError::NotFound("No tailored documents yet. Run an analysis first.".to_string())
    })
}

/// Collects the form fields. Unknown fields are skipped; a second `resume`
/// file replaces the first.
async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisRequest, AppError> {
    let mut request = AnalysisRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_text" => request.job_text = field_text(field).await?,
            "job_url" => request.job_url = field_text(field).await?,
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                if file_name.is_empty() && bytes.is_empty() {
                    // Browsers send an empty part when no file was chosen.
                    continue;
                }
                request.resume_text = read_resume_text(&file_name, &bytes)?;
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Sizes only; the texts themselves never reach the log.
fn form_summary(request: &AnalysisRequest) -> String {
    format!(
        "job_text={} chars, job_url={}, resume={} chars",
        request.job_text.chars().count(),
        !request.job_url.trim().is_empty(),
        request.resume_text.chars().count()
    )
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}
