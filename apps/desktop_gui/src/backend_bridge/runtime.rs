//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{QuestionService, SubmissionOutcome, ThinkingTicker};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the backend worker thread. `repaint` is invoked after every event
/// so the UI wakes up without polling.
pub fn launch<S, R>(
    service: S,
    tick: Duration,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    repaint: R,
) where
    S: QuestionService + 'static,
    R: Fn() + Send + Sync + 'static,
{
    let service = Arc::new(service);
    let repaint = Arc::new(repaint);
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err}"
                )));
                repaint();
                return;
            }
        };

        // Blocking receive on this thread; each command runs as its own task.
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::AskQuestion { pending } => {
                    let service = Arc::clone(&service);
                    let ui_tx = ui_tx.clone();
                    let repaint = Arc::clone(&repaint);
                    runtime.spawn(async move {
                        let tick_tx = ui_tx.clone();
                        let tick_repaint = Arc::clone(&repaint);
                        let ticker = ThinkingTicker::spawn(tick, move || {
                            let _ = tick_tx.try_send(UiEvent::ThinkingTick);
                            tick_repaint();
                        });

                        let outcome =
                            SubmissionOutcome::from(service.ask(&pending.to_request()).await);
                        ticker.stop();

                        let _ = ui_tx.send(UiEvent::AskCompleted { pending, outcome });
                        repaint();
                    });
                }
            }
        }
        tracing::debug!("ui command channel closed; backend worker exiting");
    });
}
