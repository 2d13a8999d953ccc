//! Analysis Orchestrator — runs one analysis end to end.
//!
//! Flow: validate inputs → extract keywords → skill gap → build prompt →
//!       completion call → split response → store outcome.
//!
//! Exactly one analysis may be in flight. Entry is guarded by a
//! compare-and-swap on the state slot; a second caller gets `InProgress`
//! and the running analysis is left alone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::state::AnalysisState;
use crate::credentials::CredentialStore;
use crate::errors::AnalysisError;
use crate::llm_client::CompletionClient;
use crate::matching::keywords::extract_keywords;
use crate::matching::prompt_builder::build_prompt;
use crate::matching::skill_gap::missing_skills;
use crate::matching::splitter::split_response;

/// Inputs of one "Analyze" action.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub job_text: String,
    /// Forwarded to the model as literal text; the page is never fetched.
    pub job_url: String,
    pub resume_text: String,
}

impl AnalysisRequest {
    /// The job text sent to the model: the pasted description if present,
    /// otherwise the URL string. `None` when both are blank.
    fn job_input(&self) -> Option<&str> {
        [self.job_text.as_str(), self.job_url.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Result of a completed analysis. Kept in memory until the next analysis
/// starts.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    pub resume_content: String,
    pub cover_letter: String,
    pub missing_skills: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

pub struct Analyzer {
    client: Arc<dyn CompletionClient>,
    credentials: Arc<CredentialStore>,
    state: Mutex<AnalysisState>,
    outcome: RwLock<Option<AnalysisOutcome>>,
}

impl Analyzer {
    pub fn new(client: Arc<dyn CompletionClient>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
            state: Mutex::new(AnalysisState::Idle),
            outcome: RwLock::new(None),
        }
    }

    pub async fn outcome(&self) -> Option<AnalysisOutcome> {
        self.outcome.read().await.clone()
    }

    /// State and outcome read together. Writers take the state lock before
    /// the outcome lock, so the pair is always consistent.
    pub async fn snapshot(&self) -> (AnalysisState, Option<AnalysisOutcome>) {
        let state = self.state.lock().await;
        let outcome = self.outcome.read().await.clone();
        (*state, outcome)
    }

    /// Runs one analysis. On success the outcome is stored and returned; on
    /// failure the machine rests in `Failed(kind)` with no outcome.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        self.begin().await?;

        let analysis_id = Uuid::new_v4();
        let result = self
            .run(analysis_id, &request)
            .instrument(info_span!("analysis", %analysis_id))
            .await;

        match &result {
            Ok(outcome) => {
                self.complete(outcome.clone()).await;
                info!(
                    "Analysis {} complete: {} missing skills",
                    analysis_id,
                    outcome.missing_skills.len()
                );
            }
            Err(err) => {
                // Every error raised after `begin` carries a failure kind.
                if let Some(kind) = err.kind() {
                    self.transition(AnalysisState::Failed(kind)).await;
                }
                warn!("Analysis {} failed: {}", analysis_id, err);
            }
        }

        result
    }

    /// Idle/Complete/Failed → Validating, or `InProgress` if a run is active.
    /// Clears the previous outcome so it never outlives a newer attempt.
    async fn begin(&self) -> Result<(), AnalysisError> {
        let mut state = self.state.lock().await;
        if state.is_in_flight() {
            debug!("Rejecting analysis: state is {:?}", *state);
            return Err(AnalysisError::InProgress);
        }
        *self.outcome.write().await = None;
        *state = AnalysisState::Validating;
        debug!("Analysis state -> Validating");
        Ok(())
    }

    /// Parsing → Complete. The outcome is published under the state lock so
    /// `snapshot` never pairs an in-flight state with a stored outcome.
    async fn complete(&self, outcome: AnalysisOutcome) {
        let mut state = self.state.lock().await;
        if !state.can_transition_to(AnalysisState::Complete) {
            warn!("Illegal analysis transition {:?} -> Complete", *state);
            return;
        }
        *self.outcome.write().await = Some(outcome);
        *state = AnalysisState::Complete;
        debug!("Analysis state -> Complete");
    }

    async fn transition(&self, next: AnalysisState) {
        let mut state = self.state.lock().await;
        if !state.can_transition_to(next) {
            warn!("Illegal analysis transition {:?} -> {:?}", *state, next);
            return;
        }
        debug!("Analysis state {:?} -> {:?}", *state, next);
        *state = next;
    }

    async fn run(
        &self,
        analysis_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        // Validating
        let job_text = request.job_input().ok_or(AnalysisError::MissingInput)?;
        let api_key = self
            .credentials
            .get()
            .await
            .ok_or(AnalysisError::MissingCredential)?;

        let job_keywords = extract_keywords(Some(job_text));
        let resume_keywords = extract_keywords(Some(&request.resume_text));
        let missing = missing_skills(&job_keywords, &resume_keywords);
        if job_keywords.is_empty() {
            debug!("Job input produced no keywords; prompt will list no missing skills");
        }
        debug!(
            "Keywords: job={}, resume={}, missing={}",
            job_keywords.len(),
            resume_keywords.len(),
            missing.len()
        );

        let prompt = build_prompt(job_text, &request.resume_text, &missing);

        // Requesting
        self.transition(AnalysisState::Requesting).await;
        let raw = self.client.complete(&prompt, &api_key).await?;

        // Parsing
        self.transition(AnalysisState::Parsing).await;
        let documents = split_response(&raw)?;

        Ok(AnalysisOutcome {
            analysis_id,
            resume_content: documents.resume,
            cover_letter: documents.cover_letter,
            missing_skills: missing,
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::llm_client::testing::{Reply, ScriptedClient};
    use tokio::sync::Notify;

    fn analyzer(client: Arc<ScriptedClient>, key: Option<&str>) -> Analyzer {
        let credentials = Arc::new(CredentialStore::new(key.map(String::from)));
        Analyzer::new(client, credentials)
    }

    fn request(job_text: &str, job_url: &str, resume_text: &str) -> AnalysisRequest {
        AnalysisRequest {
            job_text: job_text.to_string(),
            job_url: job_url.to_string(),
            resume_text: resume_text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_happy_path_completes_with_outcome() {
        let client = Arc::new(ScriptedClient::well_formed("My resume", "My letter"));
        let analyzer = analyzer(client.clone(), Some("sk-test"));

        let outcome = analyzer
            .analyze(request("Rust Kafka Kubernetes engineer", "", "I write rust daily"))
            .await
            .unwrap();

        assert_eq!(outcome.resume_content, "My resume");
        assert_eq!(outcome.cover_letter, "My letter");
        assert_eq!(outcome.missing_skills, vec!["kafka", "kubernetes", "engineer"]);
        assert_eq!(analyzer.snapshot().await.0, AnalysisState::Complete);
        assert_eq!(
            analyzer.outcome().await.map(|o| o.analysis_id),
            Some(outcome.analysis_id)
        );
        assert_eq!(client.calls(), 1);
        assert_eq!(client.last_key().as_deref(), Some("sk-test"));
    }

    #[tokio::test]
    async fn test_prompt_carries_job_resume_and_missing_skills() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), Some("sk"));

        analyzer
            .analyze(request("Senior Python developer", "", "python"))
            .await
            .unwrap();

        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("Job Description:\nSenior Python developer"));
        assert!(prompt.contains("Current Resume:\npython"));
        assert!(prompt.contains("Missing Skills: senior, developer"));
    }

    #[tokio::test]
    async fn test_empty_inputs_fail_without_network_call() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), Some("sk"));

        let err = analyzer.analyze(request("", "  ", "resume")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::MissingInput));
        assert_eq!(
            analyzer.snapshot().await.0,
            AnalysisState::Failed(FailureKind::MissingInput)
        );
        assert_eq!(client.calls(), 0);
        assert!(analyzer.outcome().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network_call() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), None);

        let err = analyzer.analyze(request("Rust job", "", "")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::MissingCredential));
        assert_eq!(
            analyzer.snapshot().await.0,
            AnalysisState::Failed(FailureKind::MissingCredential)
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_http_401_fails_as_transport_error_and_leaves_outcome_unset() {
        let client = Arc::new(ScriptedClient::new(Reply::Status(401, "Unauthorized")));
        let analyzer = analyzer(client.clone(), Some("sk-bad"));

        let err = analyzer.analyze(request("Rust job", "", "")).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Transport {
                status: Some(401),
                ..
            }
        ));
        assert_eq!(
            analyzer.snapshot().await.0,
            AnalysisState::Failed(FailureKind::TransportError)
        );
        assert!(analyzer.outcome().await.is_none());
    }

    #[tokio::test]
    async fn test_completion_without_delimiter_fails_as_format_error() {
        let client = Arc::new(ScriptedClient::new(Reply::Text(
            "Here is your resume, no letter".to_string(),
        )));
        let analyzer = analyzer(client, Some("sk"));

        let err = analyzer.analyze(request("Rust job", "", "")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::ResponseFormat(_)));
        assert_eq!(
            analyzer.snapshot().await.0,
            AnalysisState::Failed(FailureKind::ResponseFormatError)
        );
    }

    #[tokio::test]
    async fn test_empty_content_fails_as_format_error() {
        let client = Arc::new(ScriptedClient::new(Reply::Empty));
        let analyzer = analyzer(client, Some("sk"));

        let err = analyzer.analyze(request("Rust job", "", "")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_url_is_forwarded_verbatim_when_no_text() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), Some("sk"));

        analyzer
            .analyze(request("", "https://jobs.example.com/rust-42", ""))
            .await
            .unwrap();

        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("Job Description:\nhttps://jobs.example.com/rust-42\n"));
    }

    #[tokio::test]
    async fn test_job_text_wins_over_url() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), Some("sk"));

        analyzer
            .analyze(request("Pasted description", "https://jobs.example.com/1", ""))
            .await
            .unwrap();

        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("Pasted description"));
        assert!(!prompt.contains("jobs.example.com"));
    }

    #[tokio::test]
    async fn test_second_analyze_while_requesting_is_rejected() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(ScriptedClient::well_formed("R", "C").gated(gate.clone()));
        let analyzer = Arc::new(analyzer(client.clone(), Some("sk")));

        let first = {
            let analyzer = analyzer.clone();
            tokio::spawn(async move { analyzer.analyze(request("Rust job", "", "")).await })
        };

        while analyzer.snapshot().await.0 != AnalysisState::Requesting {
            tokio::task::yield_now().await;
        }

        let err = analyzer
            .analyze(request("Another job", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InProgress));
        assert_eq!(analyzer.snapshot().await.0, AnalysisState::Requesting);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.resume_content, "R");
        assert_eq!(analyzer.snapshot().await.0, AnalysisState::Complete);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_analysis_can_be_retried() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client.clone(), Some("sk"));

        assert!(analyzer.analyze(request("", "", "")).await.is_err());
        let outcome = analyzer.analyze(request("Rust job", "", "")).await.unwrap();

        assert_eq!(outcome.cover_letter, "C");
        assert_eq!(analyzer.snapshot().await.0, AnalysisState::Complete);
    }

    #[tokio::test]
    async fn test_new_analysis_clears_previous_outcome_on_failure() {
        let client = Arc::new(ScriptedClient::well_formed("R", "C"));
        let analyzer = analyzer(client, Some("sk"));

        analyzer.analyze(request("Rust job", "", "")).await.unwrap();
        assert!(analyzer.outcome().await.is_some());

        assert!(analyzer.analyze(request("", "", "")).await.is_err());
        assert!(analyzer.outcome().await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_never_pairs_in_flight_state_with_outcome() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(ScriptedClient::well_formed("R", "C").gated(gate.clone()));
        let analyzer = Arc::new(analyzer(client, Some("sk")));

        let run = {
            let analyzer = analyzer.clone();
            tokio::spawn(async move { analyzer.analyze(request("Rust job", "", "")).await })
        };

        while analyzer.snapshot().await.0 != AnalysisState::Requesting {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        loop {
            let (state, outcome) = analyzer.snapshot().await;
            if state.is_in_flight() {
                assert!(outcome.is_none(), "outcome visible while {state:?}");
            } else {
                assert_eq!(state, AnalysisState::Complete);
                assert!(outcome.is_some());
                break;
            }
            tokio::task::yield_now().await;
        }
        run.await.unwrap().unwrap();
    }

    #[test]
    fn test_job_input_trims_and_prefers_text() {
        assert_eq!(request("  text ", "url", "").job_input(), Some("text"));
        assert_eq!(request(" ", " url ", "").job_input(), Some("url"));
        assert_eq!(request("", "", "").job_input(), None);
    }
}
