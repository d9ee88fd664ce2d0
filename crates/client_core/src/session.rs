//! Drives a [`QuestionForm`] against a [`QuestionService`], persisting history.

use std::time::Duration;

use anyhow::{Context, Result};
use shared::domain::Catalog;
use storage::{FileRecordStore, HistoryStore};
use tokio::sync::mpsc;

use crate::{
    classify::ClassificationTable,
    config::ClientSettings,
    form::{FormError, QuestionForm, SubmissionOutcome},
    ticker::{ThinkingTicker, DEFAULT_THINKING_TICK},
    QuestionService,
};

/// Opens the durable history record when persistence is enabled.
pub fn open_history_store(settings: &ClientSettings) -> Result<Option<HistoryStore>> {
    if !settings.persist_history {
        return Ok(None);
    }
    let dir = settings
        .resolved_data_dir()
        .context("unable to resolve local data dir for history")?;
    let records = FileRecordStore::open(&dir)?;
    Ok(Some(HistoryStore::new(records)))
}

/// Like [`open_history_store`], but an unusable data dir only disables
/// persistence for this run.
pub fn open_history_store_or_warn(settings: &ClientSettings) -> Option<HistoryStore> {
    match open_history_store(settings) {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!("history persistence disabled: {err:#}");
            None
        }
    }
}

pub struct FormSession<S> {
    form: QuestionForm,
    service: S,
    history_store: Option<HistoryStore>,
    tick: Duration,
}

impl<S: QuestionService> FormSession<S> {
    pub fn new(form: QuestionForm, service: S) -> Self {
        Self {
            form,
            service,
            history_store: None,
            tick: DEFAULT_THINKING_TICK,
        }
    }

    /// Builds a form from settings, loading persisted history once.
    pub fn from_settings(
        settings: &ClientSettings,
        service: S,
        history_store: Option<HistoryStore>,
    ) -> Self {
        let classifier = ClassificationTable::with_duplicate_trigger(&settings.duplicate_marker);
        let form = QuestionForm::new(Catalog::default(), classifier);
        let mut session = Self::new(form, service).with_tick(settings.thinking_tick());
        if let Some(store) = history_store {
            session = session.with_history_store(store);
        }
        session
    }

    pub fn with_history_store(mut self, mut store: HistoryStore) -> Self {
        let history = store.load();
        self.form = self.form.with_history(history);
        self.history_store = Some(store);
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn form(&self) -> &QuestionForm {
        &self.form
    }

    pub fn select_subject(&mut self, name: &str) -> Result<bool, FormError> {
        self.form.select_subject(name)
    }

    pub fn select_chapter(&mut self, name: &str) -> Result<bool, FormError> {
        self.form.select_chapter(name)
    }

    pub fn edit_question(&mut self, text: impl Into<String>) -> bool {
        self.form.edit_question(text)
    }

    /// Runs one full submission. `on_progress` sees the form after the
    /// submission starts, on every thinking tick, and once it finishes.
    /// Returns whether a request was sent.
    pub async fn submit_with<F>(&mut self, mut on_progress: F) -> bool
    where
        F: FnMut(&QuestionForm),
    {
        let Some(pending) = self.form.begin_submit() else {
            on_progress(&self.form);
            return false;
        };
        on_progress(&self.form);

        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        let ticker = ThinkingTicker::spawn(self.tick, move || {
            let _ = tick_tx.send(());
        });

        let request = pending.to_request();
        // The request future borrows the service; it must be gone before
        // history is persisted.
        let result = {
            let ask = self.service.ask(&request);
            tokio::pin!(ask);
            loop {
                tokio::select! {
                    result = &mut ask => break result,
                    Some(()) = tick_rx.recv() => {
                        self.form.tick_thinking();
                        on_progress(&self.form);
                    }
                }
            }
        };
        ticker.stop();

        if self.form.complete_submit(&pending, SubmissionOutcome::from(result)) {
            self.persist_history();
        }
        on_progress(&self.form);
        true
    }

    pub async fn submit(&mut self) -> bool {
        self.submit_with(|_| {}).await
    }

    pub fn recall(&mut self, index: usize) -> bool {
        self.form.recall(index)
    }

    pub fn clear_history(&mut self) -> bool {
        if !self.form.clear_history() {
            return false;
        }
        if let Some(store) = self.history_store.as_mut() {
            if let Err(err) = store.clear() {
                tracing::warn!("failed to remove persisted history: {err:#}");
            }
        }
        true
    }

    fn persist_history(&mut self) {
        if let Some(store) = self.history_store.as_mut() {
            if let Err(err) = store.save(self.form.history()) {
                tracing::warn!("failed to persist history: {err:#}");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
