//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker. On failure the command is handed
/// back together with a user-facing reason.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), (BackendCommand, String)> {
    let cmd_name = match &cmd {
        BackendCommand::AskQuestion { .. } => "ask_question",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            Err((cmd, "UI command queue is full; please retry".to_string()))
        }
        Err(TrySendError::Disconnected(cmd)) => Err((
            cmd,
            "Backend worker disconnected (possible startup/runtime failure)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::PendingQuestion;
    use crossbeam_channel::bounded;

    fn ask_command() -> BackendCommand {
        BackendCommand::AskQuestion {
            pending: PendingQuestion {
                question: "What is g?".to_string(),
                subject: "Physics".to_string(),
                chapter: "Gravitation".to_string(),
            },
        }
    }

    #[test]
    fn queues_command_when_worker_listens() {
        let (tx, rx) = bounded(1);
        assert!(dispatch_backend_command(&tx, ask_command()).is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn hands_command_back_when_worker_is_gone() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let (returned, reason) =
            dispatch_backend_command(&tx, ask_command()).expect_err("disconnected");
        assert!(matches!(returned, BackendCommand::AskQuestion { .. }));
        assert!(reason.contains("disconnected"));
    }
}
