//! Document to PDF serialization
//!
//! Each model page becomes one fixed-size output page. Laying out a page is a
//! pure step ([`layout_page`]) producing ordered text runs; [`PdfSerializer`]
//! then positions the runs top-down with a moving cursor and writes them with
//! lopdf. Output carries no timestamps or IDs, so the same document always
//! produces the same bytes.

use lopdf::content::{Content as PdfContent, Operation};
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, StringFormat, Stream};
use tracing::debug;

use crate::config::{ExportConfig, LayoutConfig};
use crate::document::Document;
use crate::error::DocError;
use crate::field::TextField;
use crate::markup::{strip_bold, visible_lines};
use crate::schema::Content;

pub trait DocumentSerializer: Send + Sync {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, DocError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Heading,
    Body,
    Label,
}

/// One line of output text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub role: TextRole,
    pub text: String,
}

fn push_text(runs: &mut Vec<TextRun>, role: TextRole, text: &str) {
    let plain = strip_bold(text);
    runs.extend(visible_lines(&plain).map(|line| TextRun {
        role,
        text: line.to_string(),
    }));
}

/// Ordered text runs for one page
pub fn layout_page(content: &Content) -> Vec<TextRun> {
    let mut runs = Vec::new();

    match content {
        Content::Standard(c) => {
            for field in TextField::STANDARD {
                let Some(text) = c.text(field) else {
                    continue;
                };
                let role = match field {
                    TextField::Title => TextRole::Title,
                    f if f.is_heading() => TextRole::Heading,
                    _ => TextRole::Body,
                };
                push_text(&mut runs, role, text);
            }
            if let Some(signatories) = &c.signatories {
                push_text(&mut runs, TextRole::Label, &signatories.swipegen);
                push_text(&mut runs, TextRole::Label, &signatories.dscasc);
            }
        }
        Content::Modules(c) => {
            push_text(&mut runs, TextRole::Title, &c.title);
            push_text(&mut runs, TextRole::Label, "Module Details");
            for module in &c.modules {
                let line = format!("Module {}: {}", module.number, module.topic);
                push_text(&mut runs, TextRole::Body, &line);
            }
        }
        Content::Details(c) => {
            push_text(&mut runs, TextRole::Title, &c.title);
            push_text(&mut runs, TextRole::Label, "Details");
            for detail in &c.details {
                let line = format!("{}: {}", detail.attribute, detail.value);
                push_text(&mut runs, TextRole::Body, &line);
            }
            if let Some(note) = &c.note {
                push_text(&mut runs, TextRole::Body, note);
            }
        }
    }

    runs
}

/// Encode text for a WinAnsi simple font.
///
/// Latin-1 maps directly, a few typographic characters map into the
/// 0x80-0x9F block, anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PdfSerializer {
    layout: LayoutConfig,
    producer: String,
    title: String,
}

impl Default for PdfSerializer {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), &ExportConfig::default())
    }
}

impl PdfSerializer {
    pub fn new(layout: LayoutConfig, export: &ExportConfig) -> Self {
        Self {
            layout,
            producer: export.producer.clone(),
            title: export.title.clone(),
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    fn style(&self, role: TextRole) -> (&'static str, f32) {
        match role {
            TextRole::Title => ("F2", self.layout.title_size),
            TextRole::Heading => ("F2", self.layout.heading_size),
            TextRole::Label => ("F2", self.layout.label_size),
            TextRole::Body => ("F1", self.layout.body_size),
        }
    }

    fn page_operations(&self, runs: &[TextRun]) -> Vec<Operation> {
        let mut operations = Vec::with_capacity(runs.len() * 5);
        let mut cursor = self.layout.page_height - self.layout.margin_top;

        for run in runs {
            let (font, size) = self.style(run.role);
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(self.layout.margin_left), Object::Real(cursor)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
            cursor -= size * self.layout.line_spacing;
        }

        operations
    }
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

impl DocumentSerializer for PdfSerializer {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, DocError> {
        if document.is_empty() {
            return Err(DocError::Serialization("Document has no pages".into()));
        }

        let mut pdf = PdfDocument::with_version("1.7");
        let pages_id = pdf.new_object_id();

        let regular_id = pdf.add_object(font("Helvetica"));
        let bold_id = pdf.add_object(font("Helvetica-Bold"));
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.layout.page_width),
            Object::Real(self.layout.page_height),
        ];

        let mut kids = Vec::with_capacity(document.len());
        for page in document.pages() {
            let runs = layout_page(&page.content);
            let content = PdfContent {
                operations: self.page_operations(&runs),
            };
            let encoded = content.encode().map_err(|e| {
                DocError::Serialization(format!("Page {}: {}", page.id, e))
            })?;
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), encoded));

            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = pdf.add_object(dictionary! {
            "Producer" => Object::string_literal(self.producer.as_str()),
            "Title" => Object::string_literal(self.title.as_str()),
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        pdf.save_to(&mut buffer)
            .map_err(|e| DocError::Serialization(format!("Save failed: {}", e)))?;

        debug!(pages = document.len(), bytes = buffer.len(), "Serialized document");
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CannedContent;
    use crate::locks::LockPolicy;
    use crate::schema::{Detail, DetailsContent, Signatories, StandardContent};
    use pretty_assertions::assert_eq;

    fn canned() -> Document {
        Document::from_contents(CannedContent::default().pages(), LockPolicy::default())
    }

    fn texts(runs: &[TextRun]) -> Vec<&str> {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_layout_standard_order() {
        let content = Content::Standard(StandardContent {
            body: Some("Body line".to_string()),
            greeting: Some("Hi".to_string()),
            date: Some("Today".to_string()),
            title: Some("TITLE".to_string()),
            signatories: Some(Signatories {
                swipegen: "A".to_string(),
                dscasc: "B".to_string(),
            }),
            ..Default::default()
        });
        let runs = layout_page(&content);
        assert_eq!(texts(&runs), vec!["TITLE", "Today", "Hi", "Body line", "A", "B"]);
        assert_eq!(runs[0].role, TextRole::Title);
        assert_eq!(runs[4].role, TextRole::Label);
    }

    #[test]
    fn test_layout_strips_bold_and_blank_lines() {
        let content = Content::Standard(StandardContent {
            body: Some("pay **INR 100**\n\nthen **more**".to_string()),
            ..Default::default()
        });
        assert_eq!(texts(&layout_page(&content)), vec!["pay INR 100", "then more"]);
    }

    #[test]
    fn test_layout_headings() {
        let content = Content::Standard(StandardContent {
            law_title: Some("APPLICABLE LAW".to_string()),
            law_body: Some("Karnataka".to_string()),
            ..Default::default()
        });
        let runs = layout_page(&content);
        assert_eq!(runs[0].role, TextRole::Heading);
        assert_eq!(runs[1].role, TextRole::Body);
    }

    #[test]
    fn test_layout_modules() {
        let doc = canned();
        let runs = layout_page(&doc.pages()[9].content);
        assert_eq!(
            texts(&runs),
            vec![
                "EXHIBIT A - Web Development + Cloud DevOps",
                "Module Details",
                "Module 1: Introduction to Web Development, SDLC & Client-Server Architecture",
                "Module 2: APIs - REST vs SOAP (Simplified Overview)",
            ]
        );
    }

    #[test]
    fn test_layout_details_with_note() {
        let content = Content::Details(DetailsContent {
            title: "EXHIBIT B".to_string(),
            details: vec![Detail {
                attribute: "Fee".to_string(),
                value: "INR 100".to_string(),
            }],
            note: Some("**Note:** paid upfront".to_string()),
        });
        assert_eq!(
            texts(&layout_page(&content)),
            vec!["EXHIBIT B", "Details", "Fee: INR 100", "Note: paid upfront"]
        );
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(encode_win_ansi("\u{201c}x\u{201d}"), vec![0x93, b'x', 0x94]);
        assert_eq!(encode_win_ansi("\u{2192}"), b"?".to_vec());
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let doc = canned();
        let serializer = PdfSerializer::default();
        let first = serializer.serialize(&doc).unwrap();
        let second = serializer.serialize(&doc).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn test_serialize_contains_field_text() {
        let bytes = PdfSerializer::default().serialize(&canned()).unwrap();
        assert!(contains(&bytes, b"(July 30, 2025)"));
        assert!(contains(&bytes, b"(Module Details)"));
        assert!(contains(&bytes, b"INR 100 per student."));
        assert!(!contains(&bytes, b"**INR"));
    }

    #[test]
    fn test_serialized_pdf_reloads() {
        let doc = canned();
        let bytes = PdfSerializer::default().serialize(&doc).unwrap();
        let reloaded = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), doc.len());
    }

    #[test]
    fn test_serialize_empty_document_fails() {
        let doc = Document::from_contents(Vec::new(), LockPolicy::default());
        let err = PdfSerializer::default().serialize(&doc).unwrap_err();
        assert!(matches!(err, DocError::Serialization(_)));
    }

    #[test]
    fn test_info_dictionary_uses_export_config() {
        let export = ExportConfig {
            producer: "proposal-editor".to_string(),
            ..Default::default()
        };
        let serializer = PdfSerializer::new(LayoutConfig::default(), &export);
        let bytes = serializer.serialize(&canned()).unwrap();
        assert!(contains(&bytes, b"(proposal-editor)"));
    }
}
