//! Maps raw service text onto display records.
//!
//! The answering service reports triage conditions as phrases embedded in a
//! free-text field, so classification is an ordered substring table: the first
//! rule whose trigger occurs in the text wins, and anything unrecognised is
//! treated as a genuine answer.

use shared::domain::{ResponseKind, ResponseRecord};

/// Bumped whenever a trigger phrase or display text changes.
pub const CLASSIFICATION_TABLE_VERSION: u32 = 2;

pub const INSUFFICIENT_SYLLABUS_TRIGGER: &str =
    "Insufficient information in provided syllabus content";
pub const DEFAULT_DUPLICATE_TRIGGER: &str = "Duplicate question";
pub const RATE_LIMITED_TRIGGER: &str = "Too many rapid requests";
pub const QUESTION_TOO_LONG_TRIGGER: &str = "Question too long";
pub const QUESTION_TOO_COMPLEX_TRIGGER: &str = "Question too complex";
pub const DAILY_BUDGET_TRIGGER: &str = "Daily token budget exceeded";
pub const HOURLY_BUDGET_TRIGGER: &str = "Hourly token budget exceeded";
pub const ESCALATION_TRIGGER: &str = "ESCALATE TO SME";

pub const INSUFFICIENT_SYLLABUS_TEXT: &str = "This question goes beyond the syllabus content for the selected chapter. Try rephrasing it or choose a different chapter.";
pub const DUPLICATE_TEXT: &str =
    "You just asked this question. Check the answer above or ask something new.";
pub const RATE_LIMITED_TEXT: &str =
    "You're asking questions too quickly. Please wait a moment and try again.";
pub const QUESTION_TOO_LONG_TEXT: &str =
    "Your question is too long. Please shorten it and try again.";
pub const QUESTION_TOO_COMPLEX_TEXT: &str =
    "Your question is too complex. Please simplify it or split it into smaller questions.";
pub const DAILY_BUDGET_TEXT: &str =
    "Today's question limit has been reached. Please come back tomorrow.";
pub const HOURLY_BUDGET_TEXT: &str =
    "This hour's question limit has been reached. Please try again later.";
pub const ESCALATION_TEXT: &str =
    "This question has been sent to a teacher for review. You'll get an answer from them soon.";

pub const MISSING_QUESTION_TEXT: &str = "Please enter a question";
pub const SERVER_UNREACHABLE_TEXT: &str = "Server unreachable";
pub const HISTORY_CLEARED_TEXT: &str = "History cleared";
pub const THINKING_TEXT: &str = "Thinking";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    pub kind: ResponseKind,
    pub trigger: String,
    pub text: String,
}

impl ClassificationRule {
    fn new(kind: ResponseKind, trigger: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            trigger: trigger.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    version: u32,
    rules: Vec<ClassificationRule>,
}

impl ClassificationTable {
    /// Builds the standard table with a custom duplicate trigger phrase.
    pub fn with_duplicate_trigger(duplicate_trigger: impl Into<String>) -> Self {
        let rules = vec![
            ClassificationRule::new(
                ResponseKind::InsufficientSyllabus,
                INSUFFICIENT_SYLLABUS_TRIGGER,
                INSUFFICIENT_SYLLABUS_TEXT,
            ),
            ClassificationRule::new(ResponseKind::Duplicate, duplicate_trigger, DUPLICATE_TEXT),
            ClassificationRule::new(
                ResponseKind::RateLimited,
                RATE_LIMITED_TRIGGER,
                RATE_LIMITED_TEXT,
            ),
            ClassificationRule::new(
                ResponseKind::QuestionTooLong,
                QUESTION_TOO_LONG_TRIGGER,
                QUESTION_TOO_LONG_TEXT,
            ),
            ClassificationRule::new(
                ResponseKind::QuestionTooComplex,
                QUESTION_TOO_COMPLEX_TRIGGER,
                QUESTION_TOO_COMPLEX_TEXT,
            ),
            ClassificationRule::new(
                ResponseKind::DailyBudgetExceeded,
                DAILY_BUDGET_TRIGGER,
                DAILY_BUDGET_TEXT,
            ),
            ClassificationRule::new(
                ResponseKind::HourlyBudgetExceeded,
                HOURLY_BUDGET_TRIGGER,
                HOURLY_BUDGET_TEXT,
            ),
            ClassificationRule::new(ResponseKind::Escalated, ESCALATION_TRIGGER, ESCALATION_TEXT),
        ];
        Self {
            version: CLASSIFICATION_TABLE_VERSION,
            rules,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, raw: Option<&str>) -> ResponseRecord {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return ResponseRecord::empty(),
        };

        // An empty trigger would match everything; such a rule is skipped.
        let matched = self
            .rules
            .iter()
            .find(|rule| !rule.trigger.is_empty() && raw.contains(rule.trigger.as_str()));

        match matched {
            Some(rule) if rule.kind == ResponseKind::Escalated => {
                let record = ResponseRecord::new(rule.kind, rule.text.clone());
                match escalation_reason(raw, &rule.trigger) {
                    Some(reason) => record.with_detail(reason),
                    None => record,
                }
            }
            Some(rule) => ResponseRecord::new(rule.kind, rule.text.clone()),
            None => ResponseRecord::new(ResponseKind::Answer, raw),
        }
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::with_duplicate_trigger(DEFAULT_DUPLICATE_TRIGGER)
    }
}

/// Classifies with the default table.
pub fn classify(raw: Option<&str>) -> ResponseRecord {
    ClassificationTable::default().classify(raw)
}

fn escalation_reason(raw: &str, trigger: &str) -> Option<String> {
    let (_, rest) = raw.split_once(trigger)?;
    let reason = rest.trim_start_matches(':').trim();
    (!reason.is_empty()).then(|| reason.to_string())
}

pub fn missing_question() -> ResponseRecord {
    ResponseRecord::new(ResponseKind::MissingQuestion, MISSING_QUESTION_TEXT)
}

pub fn server_unreachable() -> ResponseRecord {
    ResponseRecord::new(ResponseKind::ServerUnreachable, SERVER_UNREACHABLE_TEXT)
}

pub fn history_cleared() -> ResponseRecord {
    ResponseRecord::new(ResponseKind::HistoryCleared, HISTORY_CLEARED_TEXT)
}

pub fn thinking(dots: u8) -> ResponseRecord {
    ResponseRecord::new(
        ResponseKind::Thinking,
        format!("{THINKING_TEXT}{}", ".".repeat(usize::from(dots))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ResponseCategory;

    #[test]
    fn absent_or_empty_text_is_empty_category() {
        for raw in [None, Some("")] {
            let record = classify(raw);
            assert_eq!(record.category, ResponseCategory::Empty);
            assert_eq!(record.text, "");
        }
    }

    #[test]
    fn insufficient_syllabus_maps_to_fixed_guidance() {
        let record = classify(Some(
            "Error: Insufficient information in provided syllabus content for this chapter",
        ));
        assert_eq!(record.category, ResponseCategory::System);
        assert_eq!(record.kind, ResponseKind::InsufficientSyllabus);
        assert_eq!(record.text, INSUFFICIENT_SYLLABUS_TEXT);
    }

    #[test]
    fn each_server_phrase_maps_to_its_kind() {
        let cases = [
            ("Duplicate question detected", ResponseKind::Duplicate),
            ("Too many rapid requests from client", ResponseKind::RateLimited),
            ("Question too long (max 500 chars)", ResponseKind::QuestionTooLong),
            ("Question too complex", ResponseKind::QuestionTooComplex),
            ("Daily token budget exceeded", ResponseKind::DailyBudgetExceeded),
            ("Hourly token budget exceeded", ResponseKind::HourlyBudgetExceeded),
        ];
        for (raw, kind) in cases {
            let record = classify(Some(raw));
            assert_eq!(record.kind, kind, "{raw}");
            assert_eq!(record.category, ResponseCategory::System, "{raw}");
        }
    }

    #[test]
    fn earlier_rules_win_when_several_phrases_match() {
        let record = classify(Some(
            "Duplicate question. ESCALATE TO SME: also Question too long",
        ));
        assert_eq!(record.kind, ResponseKind::Duplicate);
    }

    #[test]
    fn escalation_keeps_reason_as_detail() {
        let record = classify(Some("ESCALATE TO SME: Advanced question requires teacher"));
        assert_eq!(record.category, ResponseCategory::Escalation);
        assert_eq!(record.text, ESCALATION_TEXT);
        assert_eq!(
            record.detail.as_deref(),
            Some("Advanced question requires teacher")
        );

        let bare = classify(Some("ESCALATE TO SME"));
        assert_eq!(bare.category, ResponseCategory::Escalation);
        assert_eq!(bare.detail, None);
    }

    #[test]
    fn unrecognised_text_is_verbatim_ai_answer() {
        let record = classify(Some("The answer is 42"));
        assert_eq!(record.category, ResponseCategory::Ai);
        assert_eq!(record.text, "The answer is 42");
    }

    #[test]
    fn duplicate_trigger_is_configurable() {
        let strict = ClassificationTable::default();
        assert_eq!(
            strict.classify(Some("Duplicate request")).kind,
            ResponseKind::Answer
        );

        let loose = ClassificationTable::with_duplicate_trigger("Duplicate");
        assert_eq!(
            loose.classify(Some("Duplicate request")).kind,
            ResponseKind::Duplicate
        );
    }

    #[test]
    fn thinking_placeholder_appends_dots() {
        assert_eq!(thinking(0).text, "Thinking");
        assert_eq!(thinking(3).text, "Thinking...");
        assert_eq!(thinking(2).category, ResponseCategory::System);
    }
}
