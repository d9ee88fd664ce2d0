//! Question form state and its transitions.
//!
//! `QuestionForm` owns everything the form shows: the selected subject and
//! chapter, the draft question, the current response record, the busy flag and
//! the bounded history. Each user action is a method that either applies or is
//! ignored; while a submission is in flight every mutating action is a no-op.

use chrono::Utc;
use shared::{
    domain::{Catalog, History, HistoryEntry, ResponseKind, ResponseRecord},
    protocol::AskQuestionRequest,
};
use thiserror::Error;

use crate::{
    classify::{self, ClassificationTable},
    error::AskError,
    ticker::next_dots,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown subject {0:?}")]
    UnknownSubject(String),
    #[error("chapter {chapter:?} is not part of subject {subject:?}")]
    UnknownChapter { subject: String, chapter: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// Snapshot of the form taken when a submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub question: String,
    pub subject: String,
    pub chapter: String,
}

impl PendingQuestion {
    pub fn to_request(&self) -> AskQuestionRequest {
        AskQuestionRequest {
            question: self.question.clone(),
            subject: self.subject.clone(),
            chapter: self.chapter.clone(),
        }
    }
}

/// How one exchange with the service ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 2xx with the `result` field, if any.
    Answered(Option<String>),
    /// Non-2xx carrying an `error` field.
    Rejected(String),
    /// Transport failure or a response without a usable payload.
    Unreachable,
}

impl From<Result<Option<String>, AskError>> for SubmissionOutcome {
    fn from(value: Result<Option<String>, AskError>) -> Self {
        match value {
            Ok(result) => Self::Answered(result),
            Err(AskError::Rejected { message, .. }) => Self::Rejected(message),
            Err(_) => Self::Unreachable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionForm {
    catalog: Catalog,
    classifier: ClassificationTable,
    subject: String,
    chapter: String,
    question: String,
    response: ResponseRecord,
    busy: bool,
    history: History,
    thinking_dots: u8,
}

impl QuestionForm {
    pub fn new(catalog: Catalog, classifier: ClassificationTable) -> Self {
        let (subject, chapter) = catalog.default_selection();
        let (subject, chapter) = (subject.to_string(), chapter.to_string());
        Self {
            catalog,
            classifier,
            subject,
            chapter,
            question: String::new(),
            response: ResponseRecord::empty(),
            busy: false,
            history: History::default(),
            thinking_dots: 0,
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &ClassificationTable {
        &self.classifier
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// Chapters of the currently selected subject.
    pub fn chapters(&self) -> &[String] {
        self.catalog.chapters(&self.subject).unwrap_or_default()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn response(&self) -> &ResponseRecord {
        &self.response
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> SubmitPhase {
        if self.busy {
            SubmitPhase::Submitting
        } else {
            SubmitPhase::Idle
        }
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.question.trim().is_empty()
    }

    /// Selects a subject and resets the chapter to its first entry.
    /// Returns `Ok(false)` when ignored because a submission is in flight.
    pub fn select_subject(&mut self, name: &str) -> Result<bool, FormError> {
        if self.busy {
            return Ok(false);
        }
        let first = self
            .catalog
            .first_chapter(name)
            .ok_or_else(|| FormError::UnknownSubject(name.to_string()))?
            .to_string();
        self.subject = name.to_string();
        self.chapter = first;
        Ok(true)
    }

    pub fn select_chapter(&mut self, name: &str) -> Result<bool, FormError> {
        if self.busy {
            return Ok(false);
        }
        if !self.catalog.contains(&self.subject, name) {
            return Err(FormError::UnknownChapter {
                subject: self.subject.clone(),
                chapter: name.to_string(),
            });
        }
        self.chapter = name.to_string();
        Ok(true)
    }

    pub fn edit_question(&mut self, text: impl Into<String>) -> bool {
        if self.busy {
            return false;
        }
        self.question = text.into();
        true
    }

    /// Starts a submission. Returns the snapshot to send, or `None` when the
    /// form is busy or the question is blank (the latter sets a local message).
    pub fn begin_submit(&mut self) -> Option<PendingQuestion> {
        if self.busy {
            return None;
        }
        if self.question.trim().is_empty() {
            self.response = classify::missing_question();
            return None;
        }

        let pending = PendingQuestion {
            question: self.question.clone(),
            subject: self.subject.clone(),
            chapter: self.chapter.clone(),
        };
        self.busy = true;
        self.thinking_dots = 0;
        self.response = classify::thinking(self.thinking_dots);
        tracing::info!(
            subject = %pending.subject,
            chapter = %pending.chapter,
            "submitting question"
        );
        Some(pending)
    }

    /// Advances the thinking placeholder; ignored when idle.
    pub fn tick_thinking(&mut self) -> bool {
        if !self.busy {
            return false;
        }
        self.thinking_dots = next_dots(self.thinking_dots);
        self.response = classify::thinking(self.thinking_dots);
        true
    }

    /// Installs the result of the exchange started by `begin_submit` and
    /// releases the busy flag. Returns whether history changed.
    pub fn complete_submit(
        &mut self,
        pending: &PendingQuestion,
        outcome: SubmissionOutcome,
    ) -> bool {
        if !self.busy {
            tracing::warn!("ignoring submission result while idle");
            return false;
        }
        self.busy = false;
        self.thinking_dots = 0;

        let record = match &outcome {
            SubmissionOutcome::Answered(result) => self.classifier.classify(result.as_deref()),
            SubmissionOutcome::Rejected(message) => self.classifier.classify(Some(message)),
            SubmissionOutcome::Unreachable => classify::server_unreachable(),
        };

        let produced_answer =
            !record.is_empty() && record.kind != ResponseKind::ServerUnreachable;
        tracing::info!(kind = ?record.kind, "submission finished");

        if produced_answer {
            self.history.push_front(HistoryEntry {
                question: pending.question.clone(),
                subject: Some(pending.subject.clone()),
                chapter: Some(pending.chapter.clone()),
                answer: record.text.clone(),
                asked_at: Some(Utc::now()),
            });
            self.question.clear();
        }
        self.response = record;
        produced_answer
    }

    /// Loads a past question (and its subject/chapter) back into the form.
    pub fn recall(&mut self, index: usize) -> bool {
        if self.busy {
            return false;
        }
        let Some(entry) = self.history.get(index).cloned() else {
            return false;
        };

        if let Some(subject) = entry.subject.as_deref() {
            if let Some(first) = self.catalog.first_chapter(subject) {
                let chapter = entry
                    .chapter
                    .as_deref()
                    .filter(|chapter| self.catalog.contains(subject, chapter))
                    .unwrap_or(first)
                    .to_string();
                self.subject = subject.to_string();
                self.chapter = chapter;
            }
        }
        self.question = entry.question;
        true
    }

    /// Empties history and shows a confirmation. Returns whether it applied.
    pub fn clear_history(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.history.clear();
        self.response = classify::history_cleared();
        true
    }
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self::new(Catalog::default(), ClassificationTable::default())
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
