use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{AskQuestionRequest, AskQuestionResponse, ErrorResponse};

pub mod classify;
pub mod config;
pub mod error;
pub mod form;
pub mod session;
pub mod ticker;

pub use classify::{classify, ClassificationTable};
pub use config::{load_settings, ClientSettings};
pub use error::AskError;
pub use form::{FormError, PendingQuestion, QuestionForm, SubmissionOutcome, SubmitPhase};
pub use session::FormSession;
pub use ticker::ThinkingTicker;

const ASK_QUESTION_PATH: &str = "/ask-question";

/// Remote service answering scoped questions.
#[async_trait]
pub trait QuestionService: Send + Sync {
    /// Returns the `result` field of a successful exchange.
    async fn ask(&self, request: &AskQuestionRequest) -> Result<Option<String>, AskError>;
}

#[derive(Debug, Clone)]
pub struct AskClient {
    http: Client,
    base_url: String,
}

impl AskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{ASK_QUESTION_PATH}", self.base_url)
    }
}

#[async_trait]
impl QuestionService for AskClient {
    async fn ask(&self, request: &AskQuestionRequest) -> Result<Option<String>, AskError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(url = %self.endpoint(), "ask-question request failed: {err}");
                AskError::Transport(err)
            })?;

        let status = response.status();
        if status.is_success() {
            let body: AskQuestionResponse =
                response.json().await.map_err(AskError::MalformedResponse)?;
            return Ok(body.result);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty());
        match message {
            Some(message) => {
                tracing::info!(status = status.as_u16(), "service rejected question");
                Err(AskError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
            None => {
                tracing::warn!(status = status.as_u16(), "service error without payload");
                Err(AskError::MissingErrorPayload {
                    status: status.as_u16(),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
