//! Locked-region document editing core
//!
//! This crate owns the page model of a fixed-layout document, decides which
//! fields may be edited, applies single-field edits and serializes the result
//! back to PDF using lopdf.
//!
//! Content extraction is pluggable:
//! - `PdfTextExtractor`: real text extraction from uploaded PDF bytes
//! - `CannedContent`: fixed twelve-page demo document, also the fallback when
//!   extraction fails

pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod extract;
pub mod field;
pub mod locks;
pub mod markup;
pub mod schema;
pub mod serializer;

pub use config::{EditorConfig, ExtractorKind};
pub use document::{Document, Page, PageView, Snapshot};
pub use edit::{EditEngine, EditorListener, NoopListener};
pub use error::DocError;
pub use extract::{CannedContent, ContentExtractor, FixtureContent, PdfTextExtractor};
pub use field::{FieldPath, FieldValue};
pub use locks::{LockPolicy, LockedAreaSet};
pub use schema::{Content, ContentKind};
pub use serializer::{DocumentSerializer, PdfSerializer};
