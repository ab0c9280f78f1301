//! Editing session
//!
//! A [`Session`] owns the one document being edited together with its last
//! saved snapshot and cached export. All methods take `&self` so UI callbacks
//! can overlap; state lives behind a mutex that is never held across an
//! await point. Load and export run their heavy step on a blocking task and
//! share a busy flag, so at most one of them is in flight per session.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docedit_core::{
    CannedContent, ContentExtractor, Document, DocumentSerializer, EditEngine, EditorConfig,
    EditorListener, ExtractorKind, FieldPath, FieldValue, NoopListener, PageView,
    PdfSerializer, PdfTextExtractor, Snapshot,
};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::state::{SessionAction, SessionState};
use crate::upload::{edited_file_name, ExportArtifact, Upload};

const IDLE: u8 = 0;
const LOADING: u8 = 1;
const EXPORTING: u8 = 2;

struct Loaded {
    name: String,
    original: Arc<Vec<u8>>,
    document: Document,
    saved: Snapshot,
    /// Bytes of the saved snapshot, valid while `generation` is unchanged
    export_cache: Option<Arc<Vec<u8>>>,
    current_page: usize,
}

struct SessionInner {
    state: SessionState,
    engine: EditEngine,
    loaded: Option<Loaded>,
    /// Bumped whenever the saved snapshot is replaced
    generation: u64,
}

impl SessionInner {
    fn transition(&self, action: SessionAction) -> Result<SessionState, SessionError> {
        if self.loaded.is_none() && action != SessionAction::Load {
            return Err(SessionError::NoDocument);
        }
        self.state
            .next(action)
            .ok_or(SessionError::InvalidTransition {
                state: self.state,
                action,
            })
    }

    fn loaded(&self) -> Result<&Loaded, SessionError> {
        self.loaded.as_ref().ok_or(SessionError::NoDocument)
    }
}

/// Resets the busy flag when the in-flight operation finishes or is dropped
struct BusyGuard<'a>(&'a AtomicU8);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(IDLE, Ordering::Release);
    }
}

pub struct Session {
    config: EditorConfig,
    extractor: Arc<dyn ContentExtractor>,
    serializer: Arc<dyn DocumentSerializer>,
    listener: Arc<dyn EditorListener>,
    inner: Mutex<SessionInner>,
    busy: AtomicU8,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        let extractor: Arc<dyn ContentExtractor> = match config.document.extractor {
            ExtractorKind::Canned => Arc::new(CannedContent::new(config.document.page_count)),
            ExtractorKind::PdfText => Arc::new(PdfTextExtractor),
        };
        let serializer = Arc::new(PdfSerializer::new(config.layout, &config.export));
        let listener: Arc<dyn EditorListener> = Arc::new(NoopListener);

        Self {
            inner: Mutex::new(SessionInner {
                state: SessionState::Empty,
                engine: EditEngine::new(listener.clone()),
                loaded: None,
                generation: 0,
            }),
            config,
            extractor,
            serializer,
            listener,
            busy: AtomicU8::new(IDLE),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn DocumentSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn EditorListener>) -> Self {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .engine = EditEngine::new(listener.clone());
        self.listener = listener;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, operation: u8) -> Result<BusyGuard<'_>, SessionError> {
        match self
            .busy
            .compare_exchange(IDLE, operation, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(BusyGuard(&self.busy)),
            Err(LOADING) => Err(SessionError::Busy("Load")),
            Err(_) => Err(SessionError::Busy("Export")),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// True while a load or export is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire) != IDLE
    }

    pub fn is_dirty(&self) -> bool {
        self.lock()
            .loaded
            .as_ref()
            .is_some_and(|l| l.document.is_dirty())
    }

    pub fn page_count(&self) -> usize {
        self.lock().loaded.as_ref().map_or(0, |l| l.document.len())
    }

    pub fn edits_since_save(&self) -> usize {
        self.lock().engine.edits_since_save()
    }

    /// Accept an upload and build the document from it.
    ///
    /// Allowed from any state; the previous document and all unsaved edits
    /// are replaced. Unreadable content falls back to the canned pages.
    pub async fn load(&self, upload: Upload) -> Result<usize, SessionError> {
        upload.validate(&self.config.document.accepted_types)?;
        let _busy = self.acquire(LOADING)?;

        let original = Arc::new(upload.bytes);
        let extractor = self.extractor.clone();
        let source = original.clone();
        let policy = self.config.lock_policy();
        let page_count = self.config.document.page_count;

        let document = tokio::task::spawn_blocking(move || {
            Document::load(&source, extractor.as_ref(), policy, page_count)
        })
        .await
        .map_err(|e| SessionError::Task(format!("Load task panicked: {}", e)))?;

        let pages = document.len();
        {
            let mut inner = self.lock();
            inner.state = inner.transition(SessionAction::Load)?;
            inner.engine = EditEngine::new(self.listener.clone());
            inner.generation += 1;
            inner.loaded = Some(Loaded {
                name: upload.name.clone(),
                original,
                saved: document.snapshot(),
                document,
                export_cache: None,
                current_page: 0,
            });
        }

        info!(name = %upload.name, pages, "Document loaded");
        Ok(pages)
    }

    pub fn begin_edit(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.state = inner.transition(SessionAction::BeginEdit)?;
        debug!("Editing started");
        Ok(())
    }

    /// Current value of a field, for display in an edit surface
    pub fn request_edit(&self, page: usize, path: &str) -> Result<FieldValue, SessionError> {
        let path: FieldPath = path.parse()?;
        let inner = self.lock();
        inner.transition(SessionAction::Edit)?;
        let loaded = inner.loaded()?;
        Ok(inner.engine.request_edit(&loaded.document, page, &path)?)
    }

    pub fn commit_edit(&self, page: usize, path: &str, value: &str) -> Result<(), SessionError> {
        let path: FieldPath = path.parse()?;
        let mut guard = self.lock();
        guard.transition(SessionAction::Edit)?;

        let inner = &mut *guard;
        let loaded = inner.loaded.as_mut().ok_or(SessionError::NoDocument)?;
        inner
            .engine
            .commit_edit(&mut loaded.document, page, &path, value)?;
        Ok(())
    }

    /// Read any field, in any state with a document
    pub fn get_field(&self, page: usize, path: &str) -> Result<FieldValue, SessionError> {
        let path: FieldPath = path.parse()?;
        let inner = self.lock();
        Ok(inner.loaded()?.document.get_field(page, &path)?)
    }

    /// Discard every edit since the last save and return to viewing
    pub fn cancel_edit(&self) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let next = guard.transition(SessionAction::CancelEdit)?;

        let inner = &mut *guard;
        let loaded = inner.loaded.as_mut().ok_or(SessionError::NoDocument)?;
        inner.engine.discard(&mut loaded.document, &loaded.saved);
        inner.state = next;
        Ok(())
    }

    /// Make the live document the saved snapshot.
    ///
    /// On failure the session stays in editing with its edits and dirty flag
    /// intact.
    pub fn save_all(&self) -> Result<(), SessionError> {
        let mut guard = self.lock();
        let next = guard.transition(SessionAction::SaveAll)?;

        let inner = &mut *guard;
        let loaded = inner.loaded.as_mut().ok_or(SessionError::NoDocument)?;
        let bytes = inner.engine.commit_all(
            &mut loaded.document,
            &mut loaded.saved,
            self.serializer.as_ref(),
        )?;

        loaded.export_cache = Some(Arc::new(bytes));
        inner.generation += 1;
        inner.state = next;
        Ok(())
    }

    /// Serialize the document for download.
    ///
    /// A dirty document is serialized fresh and never cached. A clean one is
    /// served from the cache, filling it on first use. A second export while
    /// one is in flight is rejected with [`SessionError::Busy`].
    pub async fn export(&self) -> Result<ExportArtifact, SessionError> {
        let _busy = self.acquire(EXPORTING)?;

        let (document, dirty, generation, file_name) = {
            let inner = self.lock();
            inner.transition(SessionAction::Export)?;
            let loaded = inner.loaded()?;
            let file_name = edited_file_name(&loaded.name, &self.config.export.edited_suffix);
            let dirty = loaded.document.is_dirty();

            if !dirty {
                if let Some(cached) = &loaded.export_cache {
                    debug!(bytes = cached.len(), "Serving cached export");
                    let bytes = cached.as_ref().clone();
                    drop(inner);
                    self.listener.on_export_ready(&bytes);
                    return Ok(ExportArtifact {
                        file_name,
                        bytes,
                        from_cache: true,
                    });
                }
            }

            (loaded.document.clone(), dirty, inner.generation, file_name)
        };

        info!(dirty, pages = document.len(), "Export started");
        let serializer = self.serializer.clone();
        let result = tokio::task::spawn_blocking(move || serializer.serialize(&document))
            .await
            .map_err(|e| SessionError::Task(format!("Export task panicked: {}", e)))
            .and_then(|r| r.map_err(SessionError::from));

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.listener.on_export_failed(&e.to_string());
                return Err(e);
            }
        };

        if !dirty {
            let mut inner = self.lock();
            if inner.generation == generation {
                if let Some(loaded) = inner.loaded.as_mut() {
                    loaded.export_cache = Some(Arc::new(bytes.clone()));
                }
            }
        }

        info!(bytes = bytes.len(), file_name = %file_name, "Export finished");
        self.listener.on_export_ready(&bytes);
        Ok(ExportArtifact {
            file_name,
            bytes,
            from_cache: false,
        })
    }

    /// The uploaded bytes, untouched, under their original name
    pub fn download_original(&self) -> Result<ExportArtifact, SessionError> {
        let inner = self.lock();
        let loaded = inner.loaded()?;
        Ok(ExportArtifact {
            file_name: loaded.name.clone(),
            bytes: loaded.original.as_ref().clone(),
            from_cache: false,
        })
    }

    pub fn page_view(&self, page: usize) -> Result<PageView, SessionError> {
        let inner = self.lock();
        Ok(inner.loaded()?.document.page_view(page)?)
    }

    pub fn current_page(&self) -> usize {
        self.lock().loaded.as_ref().map_or(0, |l| l.current_page)
    }

    /// Returns false (and changes nothing) when `page` is out of range
    pub fn go_to_page(&self, page: usize) -> bool {
        let mut inner = self.lock();
        match inner.loaded.as_mut() {
            Some(loaded) if page < loaded.document.len() => {
                loaded.current_page = page;
                true
            }
            _ => false,
        }
    }

    pub fn next_page(&self) -> bool {
        let current = self.current_page();
        self.go_to_page(current + 1)
    }

    pub fn previous_page(&self) -> bool {
        match self.current_page().checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }
}
