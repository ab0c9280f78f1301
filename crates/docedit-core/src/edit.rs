//! Single-field edit mediation
//!
//! [`EditEngine`] sits between UI edit intents and the [`Document`]. It
//! re-validates locks on commit, reports outcomes to an [`EditorListener`] and
//! performs the all-or-nothing bulk save.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::document::{Document, Snapshot};
use crate::error::DocError;
use crate::field::{FieldPath, FieldValue};
use crate::serializer::DocumentSerializer;

/// Notifications the core sends up to the UI layer. All callbacks default to no-ops.
pub trait EditorListener: Send + Sync {
    fn on_field_updated(&self, _page: usize, _path: &FieldPath, _value: &FieldValue) {}

    fn on_locked_field_rejected(&self, _page: usize, _path: &FieldPath) {}

    fn on_save_completed(&self) {}

    fn on_export_ready(&self, _bytes: &[u8]) {}

    fn on_export_failed(&self, _reason: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl EditorListener for NoopListener {}

pub struct EditEngine {
    listener: Arc<dyn EditorListener>,
    edits_since_save: usize,
}

impl Default for EditEngine {
    fn default() -> Self {
        Self::new(Arc::new(NoopListener))
    }
}

impl EditEngine {
    pub fn new(listener: Arc<dyn EditorListener>) -> Self {
        Self {
            listener,
            edits_since_save: 0,
        }
    }

    pub fn listener(&self) -> &dyn EditorListener {
        self.listener.as_ref()
    }

    /// Edits committed since the last save or discard
    pub fn edits_since_save(&self) -> usize {
        self.edits_since_save
    }

    /// Current value of a field about to be edited
    pub fn request_edit(
        &self,
        document: &Document,
        page: usize,
        path: &FieldPath,
    ) -> Result<FieldValue, DocError> {
        document.page(page)?;
        if !document.is_editable(page, path) {
            self.reject(page, path);
            return Err(DocError::LockedField {
                page,
                path: path.to_string(),
            });
        }
        document.get_field(page, path)
    }

    /// Apply an edit. Locks are checked again since the request may be stale.
    pub fn commit_edit(
        &mut self,
        document: &mut Document,
        page: usize,
        path: &FieldPath,
        value: &str,
    ) -> Result<(), DocError> {
        if let Err(e) = document.set_field(page, path, value) {
            if e.is_locked() {
                self.reject(page, path);
            } else {
                warn!(page, path = %path, error = %e, "Edit failed");
            }
            return Err(e);
        }

        self.edits_since_save += 1;
        let updated = document.get_field(page, path)?;
        debug!(page, path = %path, edits = self.edits_since_save, "Field updated");
        self.listener.on_field_updated(page, path, &updated);
        Ok(())
    }

    /// Serialize the live document, then make it the saved snapshot.
    ///
    /// If serialization fails neither `saved` nor the dirty flag change.
    pub fn commit_all(
        &mut self,
        document: &mut Document,
        saved: &mut Snapshot,
        serializer: &dyn DocumentSerializer,
    ) -> Result<Vec<u8>, DocError> {
        let bytes = serializer.serialize(document).map_err(|e| {
            warn!(error = %e, "Save aborted, document left unchanged");
            e
        })?;

        *saved = document.snapshot();
        document.mark_clean();
        info!(edits = self.edits_since_save, bytes = bytes.len(), "All changes saved");
        self.edits_since_save = 0;
        self.listener.on_save_completed();
        Ok(bytes)
    }

    /// Drop every edit since the last save
    pub fn discard(&mut self, document: &mut Document, saved: &Snapshot) {
        document.restore(saved);
        debug!(discarded = self.edits_since_save, "Edits discarded");
        self.edits_since_save = 0;
    }

    fn reject(&self, page: usize, path: &FieldPath) {
        info!(page, path = %path, "Rejected edit on locked field");
        self.listener.on_locked_field_rejected(page, path);
    }
}
