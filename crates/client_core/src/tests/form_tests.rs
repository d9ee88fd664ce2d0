use super::*;
use crate::classify::{
    DUPLICATE_TEXT, ESCALATION_TEXT, HISTORY_CLEARED_TEXT, MISSING_QUESTION_TEXT,
    SERVER_UNREACHABLE_TEXT,
};
use shared::domain::{ResponseCategory, HISTORY_LIMIT};

fn ask(form: &mut QuestionForm, question: &str, outcome: SubmissionOutcome) -> bool {
    assert!(form.edit_question(question));
    let pending = form.begin_submit().expect("submission starts");
    form.complete_submit(&pending, outcome)
}

fn answered(text: &str) -> SubmissionOutcome {
    SubmissionOutcome::Answered(Some(text.to_string()))
}

#[test]
fn selecting_any_subject_resets_to_its_first_chapter() {
    let mut form = QuestionForm::default();
    let subjects: Vec<String> = form.catalog().subjects().map(str::to_string).collect();
    for subject in subjects {
        let last = form.chapters().last().cloned().expect("chapter");
        form.select_chapter(&last)
            .expect("chapter of current subject");
        assert_eq!(form.select_subject(&subject), Ok(true));
        assert_eq!(
            Some(form.chapter()),
            form.catalog().first_chapter(&subject)
        );
        assert!(form.catalog().contains(form.subject(), form.chapter()));
    }
}

#[test]
fn rejects_selection_outside_catalog() {
    let mut form = QuestionForm::default();
    assert_eq!(
        form.select_subject("Geography"),
        Err(FormError::UnknownSubject("Geography".to_string()))
    );
    assert!(matches!(
        form.select_chapter("Cell Structure"),
        Err(FormError::UnknownChapter { .. })
    ));
    assert_eq!(form.subject(), "Physics");
    assert_eq!(form.chapter(), "Laws of Motion");
}

#[test]
fn blank_question_sets_local_message_without_submitting() {
    let mut form = QuestionForm::default();
    form.edit_question("   \n\t ");
    assert!(!form.can_submit());
    assert_eq!(form.begin_submit(), None);
    assert!(!form.is_busy());
    assert_eq!(form.response().text, MISSING_QUESTION_TEXT);
    assert_eq!(form.response().category, ResponseCategory::System);
}

#[test]
fn submission_snapshots_form_and_shows_thinking() {
    let mut form = QuestionForm::default();
    form.select_subject("Physics").expect("subject");
    form.select_chapter("Gravitation").expect("chapter");
    form.edit_question("What is g?");

    let pending = form.begin_submit().expect("pending");
    assert_eq!(
        pending.to_request(),
        AskQuestionRequest {
            question: "What is g?".to_string(),
            subject: "Physics".to_string(),
            chapter: "Gravitation".to_string(),
        }
    );
    assert_eq!(form.phase(), SubmitPhase::Submitting);
    assert_eq!(form.response().text, "Thinking");
    assert!(!form.can_submit());
}

#[test]
fn busy_form_ignores_every_mutating_action() {
    let mut form = QuestionForm::default();
    ask(&mut form, "first", answered("one"));
    form.edit_question("second");
    let _pending = form.begin_submit().expect("pending");
    let before = form.clone();

    assert_eq!(form.select_subject("Biology"), Ok(false));
    assert_eq!(form.select_chapter("Gravitation"), Ok(false));
    assert!(!form.edit_question("changed"));
    assert_eq!(form.begin_submit(), None);
    assert!(!form.recall(0));
    assert!(!form.clear_history());

    assert_eq!(form.subject(), before.subject());
    assert_eq!(form.chapter(), before.chapter());
    assert_eq!(form.question(), "second");
    assert_eq!(form.history(), before.history());
    assert_eq!(form.response(), before.response());
    assert!(form.is_busy());
}

#[test]
fn thinking_ellipsis_cycles_while_busy() {
    let mut form = QuestionForm::default();
    assert!(!form.tick_thinking());
    form.edit_question("q");
    form.begin_submit().expect("pending");

    let mut texts = Vec::new();
    for _ in 0..4 {
        assert!(form.tick_thinking());
        texts.push(form.response().text.clone());
    }
    assert_eq!(texts, vec!["Thinking.", "Thinking..", "Thinking...", "Thinking"]);
}

#[test]
fn successful_answer_is_recorded_newest_first_and_clears_draft() {
    let mut form = QuestionForm::default();
    form.select_subject("Physics").expect("subject");
    form.select_chapter("Gravitation").expect("chapter");

    assert!(ask(&mut form, "What is g?", answered("g is 9.8 m/s²")));
    assert_eq!(form.response().category, ResponseCategory::Ai);
    assert_eq!(form.response().text, "g is 9.8 m/s²");
    assert_eq!(form.question(), "");
    assert!(!form.is_busy());

    let newest = &form.history().entries()[0];
    assert_eq!(newest.question, "What is g?");
    assert_eq!(newest.answer, "g is 9.8 m/s²");
    assert_eq!(newest.subject.as_deref(), Some("Physics"));
    assert_eq!(newest.chapter.as_deref(), Some("Gravitation"));
}

#[test]
fn history_grows_to_limit_then_drops_oldest() {
    let mut form = QuestionForm::default();
    for i in 0..(HISTORY_LIMIT + 2) {
        let before = form.history().len();
        ask(&mut form, &format!("q{i}"), answered(&format!("a{i}")));
        assert_eq!(form.history().len(), (before + 1).min(HISTORY_LIMIT));
    }
    assert_eq!(form.history().entries()[0].question, "q6");
    assert_eq!(form.history().entries()[HISTORY_LIMIT - 1].question, "q2");
}

#[test]
fn server_rejection_is_classified_and_recorded() {
    let mut form = QuestionForm::default();
    assert!(ask(
        &mut form,
        "What is g?",
        SubmissionOutcome::Rejected("Duplicate question".to_string())
    ));
    assert_eq!(form.response().text, DUPLICATE_TEXT);
    assert_eq!(form.response().category, ResponseCategory::System);
    assert_eq!(form.history().entries()[0].answer, DUPLICATE_TEXT);
}

#[test]
fn unreachable_server_keeps_draft_and_history() {
    let mut form = QuestionForm::default();
    assert!(!ask(&mut form, "What is g?", SubmissionOutcome::Unreachable));
    assert_eq!(form.response().text, SERVER_UNREACHABLE_TEXT);
    assert_eq!(form.response().category, ResponseCategory::System);
    assert_eq!(form.question(), "What is g?");
    assert!(form.history().is_empty());
    assert!(!form.is_busy());
}

#[test]
fn missing_result_field_is_empty_and_not_recorded() {
    let mut form = QuestionForm::default();
    assert!(!ask(&mut form, "What is g?", SubmissionOutcome::Answered(None)));
    assert!(form.response().is_empty());
    assert!(form.history().is_empty());
    assert!(!form.is_busy());
}

#[test]
fn escalation_is_distinct_category() {
    let mut form = QuestionForm::default();
    ask(
        &mut form,
        "Prove Newton's third law",
        answered("ESCALATE TO SME: Advanced question requires teacher"),
    );
    assert_eq!(form.response().category, ResponseCategory::Escalation);
    assert_eq!(form.response().text, ESCALATION_TEXT);
}

#[test]
fn recall_restores_question_subject_and_chapter() {
    let mut form = QuestionForm::default();
    form.select_subject("Biology").expect("subject");
    form.select_chapter("Plant Processes").expect("chapter");
    ask(&mut form, "What is photosynthesis?", answered("Light to sugar."));

    form.select_subject("Chemistry").expect("subject");
    assert!(form.recall(0));
    assert_eq!(form.question(), "What is photosynthesis?");
    assert_eq!(form.subject(), "Biology");
    assert_eq!(form.chapter(), "Plant Processes");
    assert!(!form.recall(7));
}

#[test]
fn recall_of_entry_without_subject_only_restores_question() {
    let mut form = QuestionForm::default().with_history(History::from_entries(vec![
        HistoryEntry {
            question: "old question".to_string(),
            subject: None,
            chapter: None,
            answer: "old answer".to_string(),
            asked_at: None,
        },
    ]));
    form.select_subject("Chemistry").expect("subject");
    assert!(form.recall(0));
    assert_eq!(form.question(), "old question");
    assert_eq!(form.subject(), "Chemistry");
    assert_eq!(form.chapter(), "Atomic Structure");
}

#[test]
fn clear_history_empties_list_and_confirms() {
    let mut form = QuestionForm::default();
    ask(&mut form, "q", answered("a"));
    assert!(form.clear_history());
    assert!(form.history().is_empty());
    assert_eq!(form.response().text, HISTORY_CLEARED_TEXT);
    assert_eq!(form.response().category, ResponseCategory::System);
}

#[test]
fn ask_errors_map_to_outcomes() {
    let rejected = SubmissionOutcome::from(Err::<Option<String>, _>(AskError::Rejected {
        status: 429,
        message: "Too many rapid requests".to_string(),
    }));
    assert_eq!(
        rejected,
        SubmissionOutcome::Rejected("Too many rapid requests".to_string())
    );

    let missing =
        SubmissionOutcome::from(Err::<Option<String>, _>(AskError::MissingErrorPayload {
            status: 500,
        }));
    assert_eq!(missing, SubmissionOutcome::Unreachable);

    let ok = SubmissionOutcome::from(Ok::<_, AskError>(Some("42".to_string())));
    assert_eq!(ok, SubmissionOutcome::Answered(Some("42".to_string())));
}
