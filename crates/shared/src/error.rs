use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one subject")]
    Empty,
    #[error("subject {0:?} has no chapters")]
    NoChapters(String),
    #[error("subject {0:?} is listed more than once")]
    DuplicateSubject(String),
}
