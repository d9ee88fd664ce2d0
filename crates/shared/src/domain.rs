use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Most recent interactions kept in local history.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSubject {
    pub name: String,
    pub chapters: Vec<String>,
}

/// Fixed subject -> chapters taxonomy used to scope a question.
///
/// Subjects keep their declaration order so the first subject and the first
/// chapter of each subject are stable defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    subjects: Vec<CatalogSubject>,
}

impl Catalog {
    pub fn new(subjects: Vec<CatalogSubject>) -> Result<Self, CatalogError> {
        if subjects.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (idx, subject) in subjects.iter().enumerate() {
            if subject.chapters.is_empty() {
                return Err(CatalogError::NoChapters(subject.name.clone()));
            }
            if subjects[..idx].iter().any(|s| s.name == subject.name) {
                return Err(CatalogError::DuplicateSubject(subject.name.clone()));
            }
        }
        Ok(Self { subjects })
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|s| s.name.as_str())
    }

    pub fn chapters(&self, subject: &str) -> Option<&[String]> {
        self.subjects
            .iter()
            .find(|s| s.name == subject)
            .map(|s| s.chapters.as_slice())
    }

    pub fn first_chapter(&self, subject: &str) -> Option<&str> {
        self.chapters(subject)
            .and_then(|chapters| chapters.first())
            .map(String::as_str)
    }

    pub fn contains(&self, subject: &str, chapter: &str) -> bool {
        self.chapters(subject)
            .is_some_and(|chapters| chapters.iter().any(|c| c == chapter))
    }

    /// First subject with its first chapter; always present for a valid catalog.
    pub fn default_selection(&self) -> (&str, &str) {
        let subject = &self.subjects[0];
        (subject.name.as_str(), subject.chapters[0].as_str())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let subject = |name: &str, chapters: &[&str]| CatalogSubject {
            name: name.to_string(),
            chapters: chapters.iter().map(|c| c.to_string()).collect(),
        };
        Self {
            subjects: vec![
                subject(
                    "Physics",
                    &["Laws of Motion", "Work Energy Power", "Gravitation"],
                ),
                subject("Biology", &["Cell Structure", "Plant Processes"]),
                subject("Chemistry", &["Atomic Structure", "Chemical Bonding"]),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    Empty,
    System,
    Escalation,
    Ai,
}

/// What a response record means, independent of its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Empty,
    Answer,
    InsufficientSyllabus,
    Duplicate,
    RateLimited,
    QuestionTooLong,
    QuestionTooComplex,
    DailyBudgetExceeded,
    HourlyBudgetExceeded,
    Escalated,
    ServerUnreachable,
    MissingQuestion,
    HistoryCleared,
    Thinking,
}

impl ResponseKind {
    pub fn category(self) -> ResponseCategory {
        match self {
            Self::Empty => ResponseCategory::Empty,
            Self::Answer => ResponseCategory::Ai,
            Self::Escalated => ResponseCategory::Escalation,
            Self::InsufficientSyllabus
            | Self::Duplicate
            | Self::RateLimited
            | Self::QuestionTooLong
            | Self::QuestionTooComplex
            | Self::DailyBudgetExceeded
            | Self::HourlyBudgetExceeded
            | Self::ServerUnreachable
            | Self::MissingQuestion
            | Self::HistoryCleared
            | Self::Thinking => ResponseCategory::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub text: String,
    pub category: ResponseCategory,
    pub kind: ResponseKind,
    /// Extra context carried by the server message, e.g. an escalation reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResponseRecord {
    pub fn new(kind: ResponseKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: kind.category(),
            kind,
            detail: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(ResponseKind::Empty, "")
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category == ResponseCategory::Empty
    }
}

impl Default for ResponseRecord {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asked_at: Option<DateTime<Utc>>,
}

/// Most-recent-first list of past interactions, never longer than [`HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    pub fn push_front(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
