//! Session controller for the locked-region document editor
//!
//! Wraps a `docedit_core::Document` in an explicit state machine
//! (empty, viewing, editing) and handles the upload and download boundary:
//! MIME validation on input, cached `-edited` exports on output.

pub mod error;
pub mod session;
pub mod state;
pub mod upload;

pub use error::SessionError;
pub use session::Session;
pub use state::{SessionAction, SessionState};
pub use upload::{edited_file_name, ExportArtifact, Upload};
