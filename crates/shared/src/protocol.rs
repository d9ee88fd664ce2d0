use serde::{Deserialize, Serialize};

/// Body of `POST /ask-question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
    pub subject: String,
    pub chapter: String,
}

/// 2xx payload. `result` is optional so a missing field classifies as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    #[serde(default)]
    pub result: Option<String>,
}

/// Non-2xx payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}
