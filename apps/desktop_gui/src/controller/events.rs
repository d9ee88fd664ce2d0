//! Backend events delivered to the UI thread.

use client_core::{PendingQuestion, SubmissionOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The thinking indicator should advance.
    ThinkingTick,
    /// The exchange for `pending` finished.
    AskCompleted {
        pending: PendingQuestion,
        outcome: SubmissionOutcome,
    },
    /// The backend worker could not start; no request will ever complete.
    BackendUnavailable(String),
}
