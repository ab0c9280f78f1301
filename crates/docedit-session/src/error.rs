use docedit_core::DocError;
use thiserror::Error;

use crate::state::{SessionAction, SessionState};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Doc(#[from] DocError),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: SessionState,
        action: SessionAction,
    },

    #[error("{0} already in progress")]
    Busy(&'static str),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl SessionError {
    pub fn is_locked(&self) -> bool {
        matches!(self, SessionError::Doc(e) if e.is_locked())
    }
}
