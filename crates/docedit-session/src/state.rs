//! Session state machine
//!
//! ```text
//!   Empty --load--> Viewing --begin_edit--> Editing
//!                      ^                      |
//!                      +--- save / cancel ----+
//! ```
//!
//! `load` is accepted from any state and always lands in `Viewing`. Exporting
//! is not a state: it is a busy flag orthogonal to Viewing/Editing.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Load,
    BeginEdit,
    Edit,
    CancelEdit,
    SaveAll,
    Export,
}

impl SessionState {
    /// State after `action`, or `None` when the action is not allowed here
    pub fn next(self, action: SessionAction) -> Option<SessionState> {
        use SessionAction::*;
        use SessionState::*;

        match (self, action) {
            (_, Load) => Some(Viewing),
            (Viewing, BeginEdit) => Some(Editing),
            (Editing, Edit) => Some(Editing),
            (Editing, CancelEdit) | (Editing, SaveAll) => Some(Viewing),
            (Viewing, Export) | (Editing, Export) => Some(self),
            _ => None,
        }
    }

    pub fn has_document(self) -> bool {
        self != SessionState::Empty
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Empty => "empty",
            SessionState::Viewing => "viewing",
            SessionState::Editing => "editing",
        })
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionAction::Load => "load",
            SessionAction::BeginEdit => "begin editing",
            SessionAction::Edit => "edit",
            SessionAction::CancelEdit => "cancel editing",
            SessionAction::SaveAll => "save",
            SessionAction::Export => "export",
        })
    }
}
