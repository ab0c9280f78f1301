use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocError {
    #[error("Field `{path}` on page {page} is locked")]
    LockedField { page: usize, path: String },

    #[error("Field path not found: {0}")]
    PathNotFound(String),

    #[error("Page {0} does not exist")]
    PageNotFound(usize),

    #[error("Invalid value for `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Failed to load document: {0}")]
    LoadFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocError {
    /// True for refusals the UI should show as a plain rejection toast.
    pub fn is_locked(&self) -> bool {
        matches!(self, DocError::LockedField { .. })
    }
}
