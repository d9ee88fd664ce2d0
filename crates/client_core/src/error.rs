use thiserror::Error;

/// Failure modes of one `ask-question` exchange.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("service rejected question ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("service returned {status} without an error payload")]
    MissingErrorPayload { status: u16 },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid ask-question response payload: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}

impl AskError {
    /// Server-supplied text worth showing to the user, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}
