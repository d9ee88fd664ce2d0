//! Backend commands queued from UI to backend worker.

use client_core::PendingQuestion;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    AskQuestion { pending: PendingQuestion },
}
