//! Editable document model
//!
//! A [`Document`] owns the ordered page sequence and is the only place page
//! content is mutated. Writes go through [`Document::set_field`], which
//! enforces the lock policy before touching the content.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DocError;
use crate::extract::{CannedContent, ContentExtractor};
use crate::field::{AssignError, FieldPath, FieldValue};
use crate::locks::{LockPolicy, LockedAreaSet};
use crate::schema::{Content, ContentKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based, stable for the lifetime of the document
    pub id: usize,
    pub content: Content,
    pub locked_areas: LockedAreaSet,
}

/// Last explicitly saved page sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pages: Vec<Page>,
}

impl Snapshot {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
    policy: LockPolicy,
    dirty: bool,
}

/// Read-only view of one page for the UI layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub index: usize,
    pub id: usize,
    pub kind: ContentKind,
    pub content: Content,
    pub locked_areas: LockedAreaSet,
    /// Derived from the lock policy, never stored
    pub content_locked: bool,
    pub editable_fields: Vec<FieldPath>,
}

impl Document {
    /// Build a document from page contents, numbering pages from 1
    pub fn from_contents(contents: Vec<Content>, policy: LockPolicy) -> Self {
        let pages = contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Page {
                id: index + 1,
                content,
                locked_areas: LockedAreaSet::default(),
            })
            .collect();

        Self {
            pages,
            policy,
            dirty: false,
        }
    }

    /// Build a document from raw source bytes.
    ///
    /// Never fails: when the extractor cannot interpret the source (or finds
    /// no pages) the canned `page_count`-page document is used instead.
    pub fn load(
        source: &[u8],
        extractor: &dyn ContentExtractor,
        policy: LockPolicy,
        page_count: usize,
    ) -> Self {
        let contents = match extractor.extract(source) {
            Ok(contents) if !contents.is_empty() => contents,
            Ok(_) => {
                warn!("Extractor produced no pages, using canned content");
                CannedContent::new(page_count).pages()
            }
            Err(e) => {
                warn!(error = %e, "Falling back to canned content");
                CannedContent::new(page_count).pages()
            }
        };

        debug!(pages = contents.len(), "Document loaded");
        Self::from_contents(contents, policy)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Result<&Page, DocError> {
        self.pages.get(index).ok_or(DocError::PageNotFound(index))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn policy(&self) -> &LockPolicy {
        &self.policy
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn is_editable(&self, index: usize, path: &FieldPath) -> bool {
        self.policy.is_editable(index, path)
    }

    pub fn get_field(&self, index: usize, path: &FieldPath) -> Result<FieldValue, DocError> {
        self.page(index)?
            .content
            .get(path)
            .ok_or_else(|| DocError::PathNotFound(path.to_string()))
    }

    /// Replace one leaf. Checks run in order: page exists, lock, path, value.
    pub fn set_field(&mut self, index: usize, path: &FieldPath, value: &str) -> Result<(), DocError> {
        if index >= self.pages.len() {
            return Err(DocError::PageNotFound(index));
        }
        if !self.policy.is_editable(index, path) {
            return Err(DocError::LockedField {
                page: index,
                path: path.to_string(),
            });
        }

        self.pages[index]
            .content
            .assign(path, value)
            .map_err(|e| match e {
                AssignError::Unresolved => DocError::PathNotFound(path.to_string()),
                AssignError::Invalid(reason) => DocError::InvalidValue {
                    path: path.to_string(),
                    reason,
                },
            })?;

        self.dirty = true;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pages: self.pages.clone(),
        }
    }

    /// Revert to a saved snapshot, leaving the document clean
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.pages = snapshot.pages.clone();
        self.dirty = false;
    }

    /// True when the live pages differ from `snapshot` in any field
    pub fn differs_from(&self, snapshot: &Snapshot) -> bool {
        self.pages != snapshot.pages
    }

    pub fn page_view(&self, index: usize) -> Result<PageView, DocError> {
        let page = self.page(index)?;
        let content_locked = self.policy.is_content_locked(index);
        let editable_fields = if content_locked {
            Vec::new()
        } else {
            page.content.field_paths()
        };

        Ok(PageView {
            index,
            id: page.id,
            kind: page.content.kind(),
            content: page.content.clone(),
            locked_areas: page.locked_areas,
            content_locked,
            editable_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TextField;
    use crate::schema::StandardContent;
    use pretty_assertions::assert_eq;

    fn canned() -> Document {
        Document::load(b"%PDF-1.7", &CannedContent::new(12), LockPolicy::default(), 12)
    }

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_load_builds_twelve_pages() {
        let doc = canned();
        assert_eq!(doc.len(), 12);
        assert!(!doc.is_dirty());
        let ids: Vec<usize> = doc.pages().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_falls_back_on_failure() {
        struct Failing;
        impl ContentExtractor for Failing {
            fn extract(&self, _source: &[u8]) -> Result<Vec<Content>, DocError> {
                Err(DocError::LoadFailure("unreadable".into()))
            }
        }

        let doc = Document::load(b"garbage", &Failing, LockPolicy::default(), 12);
        assert_eq!(doc.len(), 12);
        assert_eq!(
            doc.get_field(0, &path("date")).unwrap(),
            FieldValue::Text("July 30, 2025".to_string())
        );
    }

    #[test]
    fn test_set_field_on_locked_page_fails() {
        let mut doc = canned();
        let err = doc.set_field(1, &path("title"), "X").unwrap_err();
        assert_eq!(
            err,
            DocError::LockedField {
                page: 1,
                path: "title".to_string()
            }
        );
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_set_field_then_get() {
        let mut doc = canned();
        doc.set_field(3, &path("modificationBody"), "New text").unwrap();
        assert_eq!(
            doc.get_field(3, &path("modificationBody")).unwrap(),
            FieldValue::Text("New text".to_string())
        );
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_lock_checked_before_path() {
        let mut doc = canned();
        // Page 2 is a standard page, a modules path does not resolve there
        let err = doc.set_field(2, &path("modules.0.topic"), "X").unwrap_err();
        assert!(err.is_locked());
    }

    #[test]
    fn test_unresolved_path_on_editable_page() {
        let mut doc = canned();
        let err = doc.set_field(0, &path("modules.0.topic"), "X").unwrap_err();
        assert_eq!(err, DocError::PathNotFound("modules.0.topic".to_string()));
    }

    #[test]
    fn test_page_out_of_range() {
        let mut doc = canned();
        assert_eq!(
            doc.set_field(12, &path("title"), "X"),
            Err(DocError::PageNotFound(12))
        );
        assert_eq!(
            doc.get_field(40, &path("title")),
            Err(DocError::PageNotFound(40))
        );
    }

    #[test]
    fn test_get_absent_optional_field() {
        let doc = canned();
        assert_eq!(
            doc.get_field(0, &path("title")),
            Err(DocError::PathNotFound("title".to_string()))
        );
    }

    #[test]
    fn test_invalid_module_value() {
        let mut doc = canned();
        let err = doc
            .set_field(9, &path("modules.0.duration"), "soon")
            .unwrap_err();
        assert!(matches!(err, DocError::InvalidValue { .. }));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut doc = canned();
        let saved = doc.snapshot();
        doc.set_field(0, &path("greeting"), "Hello!").unwrap();
        assert!(doc.differs_from(&saved));

        doc.restore(&saved);
        assert!(!doc.is_dirty());
        assert!(!doc.differs_from(&saved));
        assert_eq!(
            doc.get_field(0, &path("greeting")).unwrap(),
            FieldValue::Text("Greetings!".to_string())
        );
    }

    #[test]
    fn test_page_view_derives_content_lock() {
        let doc = canned();
        let locked = doc.page_view(1).unwrap();
        assert!(locked.content_locked);
        assert!(locked.editable_fields.is_empty());

        let open = doc.page_view(0).unwrap();
        assert!(!open.content_locked);
        assert_eq!(
            open.editable_fields,
            vec![
                FieldPath::Text(TextField::Recipient),
                FieldPath::Text(TextField::Date),
                FieldPath::Text(TextField::Greeting),
                FieldPath::Text(TextField::Body),
            ]
        );
    }

    #[test]
    fn test_page_view_offers_every_writable_module_leaf() {
        let mut doc = canned();
        let view = doc.page_view(9).unwrap();
        let number = path("modules.1.number");
        assert!(view.editable_fields.contains(&number));

        doc.set_field(9, &number, "7").unwrap();
        assert_eq!(doc.get_field(9, &number).unwrap(), FieldValue::Integer(7));
        for field in &view.editable_fields {
            assert!(doc.get_field(9, field).is_ok(), "{} should resolve", field);
        }
    }

    #[test]
    fn test_from_contents_custom_policy() {
        let mut doc = Document::from_contents(
            vec![Content::Standard(StandardContent::default()); 3],
            LockPolicy::unlocked(),
        );
        doc.set_field(1, &path("title"), "Open").unwrap();
        assert_eq!(
            doc.get_field(1, &path("title")).unwrap().to_string(),
            "Open"
        );
    }
}
