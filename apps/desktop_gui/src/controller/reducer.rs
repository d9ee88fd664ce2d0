//! Reducer-style transitions from UI actions and backend events to form state.

use client_core::{FormError, PendingQuestion, QuestionForm, SubmissionOutcome};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SelectSubject(String),
    SelectChapter(String),
    EditQuestion(String),
    Submit,
    Recall(usize),
    ClearHistory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryEffect {
    #[default]
    Unchanged,
    Save,
    Remove,
}

/// Side effects the app must carry out after a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub request: Option<PendingQuestion>,
    pub history: HistoryEffect,
    pub status: Option<String>,
}

pub struct FormController {
    form: QuestionForm,
    in_flight: Option<PendingQuestion>,
}

impl FormController {
    pub fn new(form: QuestionForm) -> Self {
        Self {
            form,
            in_flight: None,
        }
    }

    pub fn form(&self) -> &QuestionForm {
        &self.form
    }

    pub fn dispatch(&mut self, action: FormAction) -> Effects {
        let mut effects = Effects::default();
        match action {
            FormAction::SelectSubject(name) => {
                effects.status = selection_status(self.form.select_subject(&name));
            }
            FormAction::SelectChapter(name) => {
                effects.status = selection_status(self.form.select_chapter(&name));
            }
            FormAction::EditQuestion(text) => {
                self.form.edit_question(text);
            }
            FormAction::Submit => {
                if let Some(pending) = self.form.begin_submit() {
                    self.in_flight = Some(pending.clone());
                    effects.request = Some(pending);
                }
            }
            FormAction::Recall(index) => {
                self.form.recall(index);
            }
            FormAction::ClearHistory => {
                if self.form.clear_history() {
                    effects.history = HistoryEffect::Remove;
                }
            }
        }
        effects
    }

    pub fn apply(&mut self, event: UiEvent) -> Effects {
        let mut effects = Effects::default();
        match event {
            UiEvent::ThinkingTick => {
                self.form.tick_thinking();
            }
            UiEvent::AskCompleted { pending, outcome } => {
                self.in_flight = None;
                if self.form.complete_submit(&pending, outcome) {
                    effects.history = HistoryEffect::Save;
                }
            }
            UiEvent::BackendUnavailable(reason) => {
                tracing::error!("backend unavailable: {reason}");
                effects = self.abandon_in_flight();
                effects.status = Some(reason);
            }
        }
        effects
    }

    /// Resolves the outstanding submission as unreachable so the form unlocks.
    pub fn abandon_in_flight(&mut self) -> Effects {
        let mut effects = Effects::default();
        if let Some(pending) = self.in_flight.take() {
            if self
                .form
                .complete_submit(&pending, SubmissionOutcome::Unreachable)
            {
                effects.history = HistoryEffect::Save;
            }
        }
        effects
    }
}

fn selection_status(result: Result<bool, FormError>) -> Option<String> {
    result.err().map(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ResponseCategory;

    fn submitted(controller: &mut FormController, question: &str) -> PendingQuestion {
        controller.dispatch(FormAction::EditQuestion(question.to_string()));
        controller
            .dispatch(FormAction::Submit)
            .request
            .expect("request issued")
    }

    #[test]
    fn submit_issues_one_request_and_locks_inputs() {
        let mut controller = FormController::new(QuestionForm::default());
        let pending = submitted(&mut controller, "What is g?");
        assert_eq!(pending.question, "What is g?");

        assert_eq!(controller.dispatch(FormAction::Submit), Effects::default());
        controller.dispatch(FormAction::SelectSubject("Biology".to_string()));
        assert_eq!(controller.form().subject(), "Physics");
    }

    #[test]
    fn completed_answer_requests_history_save() {
        let mut controller = FormController::new(QuestionForm::default());
        let pending = submitted(&mut controller, "What is g?");
        controller.apply(UiEvent::ThinkingTick);
        assert_eq!(controller.form().response().text, "Thinking.");

        let effects = controller.apply(UiEvent::AskCompleted {
            pending,
            outcome: SubmissionOutcome::Answered(Some("g is 9.8 m/s²".to_string())),
        });
        assert_eq!(effects.history, HistoryEffect::Save);
        assert_eq!(controller.form().response().category, ResponseCategory::Ai);
        assert!(!controller.form().is_busy());
    }

    #[test]
    fn backend_loss_unlocks_form_with_unreachable_message() {
        let mut controller = FormController::new(QuestionForm::default());
        submitted(&mut controller, "What is g?");

        let effects = controller.apply(UiEvent::BackendUnavailable(
            "backend worker startup failure".to_string(),
        ));
        assert_eq!(effects.history, HistoryEffect::Unchanged);
        assert_eq!(
            effects.status.as_deref(),
            Some("backend worker startup failure")
        );
        assert!(!controller.form().is_busy());
        assert_eq!(controller.form().response().text, "Server unreachable");
    }

    #[test]
    fn clear_history_requests_record_removal() {
        let mut controller = FormController::new(QuestionForm::default());
        assert_eq!(
            controller.dispatch(FormAction::ClearHistory).history,
            HistoryEffect::Remove
        );
    }

    #[test]
    fn unknown_chapter_is_reported_as_status() {
        let mut controller = FormController::new(QuestionForm::default());
        let effects = controller.dispatch(FormAction::SelectChapter("Cell Structure".to_string()));
        assert!(effects
            .status
            .as_deref()
            .is_some_and(|status| status.contains("Cell Structure")));
    }
}
