use serde::Serialize;

use crate::errors::FailureKind;

/// Lifecycle of the single analysis slot.
///
/// ```text
/// Idle ─▶ Validating ─▶ Requesting ─▶ Parsing ─▶ Complete
///              │             │           │
///              └─────────────┴───────────┴──▶ Failed(kind)
/// ```
///
/// `Idle`, `Complete` and `Failed` are resting states: a new analysis may
/// start from any of them. The other three mean a request is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "kind", rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    Validating,
    Requesting,
    Parsing,
    Complete,
    Failed(FailureKind),
}

impl AnalysisState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            AnalysisState::Validating | AnalysisState::Requesting | AnalysisState::Parsing
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: AnalysisState) -> bool {
        use AnalysisState::*;
        match (self, next) {
            (Idle | Complete | Failed(_), Validating) => true,
            (Validating, Requesting) => true,
            (Requesting, Parsing) => true,
            (Parsing, Complete) => true,
            (Validating | Requesting | Parsing, Failed(_)) => true,
            _ => false,
        }
    }
}
