//! Content extraction strategies
//!
//! Turning uploaded bytes into page contents is pluggable:
//! - [`PdfTextExtractor`]: parses the PDF with lopdf and maps each page's text
//!   onto a standard page
//! - [`CannedContent`]: ignores the input and returns the fixed training
//!   proposal used for demos
//! - [`FixtureContent`]: pages supplied as JSON, for tests

use lopdf::Document as PdfDocument;
use tracing::debug;

use crate::error::DocError;
use crate::schema::{Content, Module, ModuleType, ModulesContent, Signatories, StandardContent};

pub trait ContentExtractor: Send + Sync {
    fn extract(&self, source: &[u8]) -> Result<Vec<Content>, DocError>;
}

/// Pages read from a real PDF.
///
/// Each page becomes a standard page titled `Page N` whose body is the text
/// lopdf extracts from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl ContentExtractor for PdfTextExtractor {
    fn extract(&self, source: &[u8]) -> Result<Vec<Content>, DocError> {
        if !source.starts_with(b"%PDF-") {
            return Err(DocError::LoadFailure(
                "Not a valid PDF file (missing %PDF- header)".to_string(),
            ));
        }

        let document =
            PdfDocument::load_mem(source).map_err(|e| DocError::LoadFailure(e.to_string()))?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(DocError::LoadFailure("PDF has no pages".to_string()));
        }

        let mut contents = Vec::with_capacity(page_numbers.len());
        for number in page_numbers {
            let text = document
                .extract_text(&[number])
                .map_err(|e| DocError::LoadFailure(format!("Page {}: {}", number, e)))?;
            let text = text.trim();

            contents.push(Content::Standard(StandardContent {
                title: Some(format!("Page {}", number)),
                body: (!text.is_empty()).then(|| text.to_string()),
                ..Default::default()
            }));
        }

        debug!(pages = contents.len(), "Extracted PDF text");
        Ok(contents)
    }
}

/// Pages given up front as JSON (an array of content objects)
#[derive(Debug, Clone)]
pub struct FixtureContent {
    pages: Vec<Content>,
}

impl FixtureContent {
    pub fn new(pages: Vec<Content>) -> Self {
        Self { pages }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            pages: serde_json::from_str(json)?,
        })
    }
}

impl ContentExtractor for FixtureContent {
    fn extract(&self, _source: &[u8]) -> Result<Vec<Content>, DocError> {
        Ok(self.pages.clone())
    }
}

/// Deterministic stand-in content keyed only by page number
#[derive(Debug, Clone, Copy)]
pub struct CannedContent {
    page_count: usize,
}

impl Default for CannedContent {
    fn default() -> Self {
        Self { page_count: 12 }
    }
}

impl CannedContent {
    /// At least one page is always produced
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count: page_count.max(1),
        }
    }

    pub fn pages(&self) -> Vec<Content> {
        (1..=self.page_count).map(canned_page).collect()
    }
}

impl ContentExtractor for CannedContent {
    fn extract(&self, _source: &[u8]) -> Result<Vec<Content>, DocError> {
        Ok(self.pages())
    }
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn module(number: u32, topic: &str, duration: f64, kind: ModuleType, description: &str) -> Module {
    Module {
        number,
        topic: topic.to_string(),
        duration,
        kind,
        description: description.to_string(),
    }
}

/// Canned content for one page (1-based)
pub fn canned_page(number: usize) -> Content {
    match number {
        1 => Content::Standard(StandardContent {
            recipient: text("THE PRINCIPAL\nDepartment of Computer Applications\nDayananda Sagar College of Arts,\nScience and Commerce"),
            greeting: text("Greetings!"),
            date: text("July 30, 2025"),
            body: text("Thank you for considering partnering with SwipeGen to support your institution's training needs. We have developed this training course proposal to detail the training services that have been discussed in our previous conversations.\n\nIf you have any questions, don't hesitate to contact us directly at mail.swipegen@gmail.com"),
            ..Default::default()
        }),
        2 => Content::Standard(StandardContent {
            title: text("ABOUT US"),
            body: text("SwipeGen is primarily based out of Bengaluru and is happy to offer its expertise in IT. Our tried and true system is based on couple of years of cumulative experience shared between our trainers. We take great pride in preparing our clients for success through IT training, and we are confident that after attending our sessions, students will be better equipped than ever to engage in work related to subjects like Full Stack Development, DevOps, Data Engineering, Programming, Object oriented concepts, Data Science, Cyber Security, Cloud computing, and many others.\n\nTRAINING SESSIONS\n\nOur training sessions are meticulously planned by our trainers and are designed to maneuver towards the maximization of efficiency. Your time is valuable, and so is ours, so our goal is to best prepare you while taking up the least amount of your time possible."),
            ..Default::default()
        }),
        3 => Content::Standard(StandardContent {
            title: text("TRAINING CONTRACT"),
            contract_intro: text("This Training Contract (the \"Contract\") states the terms and conditions that govern the contractual agreement between **SwipeGen** (the \"Trainer\"), and **Department of CA (Computer Application), Dayananda Sagar College of Arts Science and Commerce, Bengaluru** (the \"Client\") who agrees to be bound by this Contract."),
            whereas: text("WHEREAS, the Trainer holds significant expertise in subject matter and offers training services in subject matter for which the Client would like to engage the Trainer according to the terms and conditions herein."),
            therefore: text("NOW, THEREFORE, In consideration of the mutual covenants and promises made by the parties within this Contract, the Trainer and the Client (individually, each a \"Party\" and collectively, the \"Parties\") agree as follows:"),
            training_title: text("TRAINING"),
            training_body: text("The Trainer shall conduct training in the subject matter by the schedule attached here to as **Exhibit A**."),
            ..Default::default()
        }),
        4 => Content::Standard(StandardContent {
            compensation_title: text("COMPENSATION"),
            compensation_body: text("The total cost to be paid to the Trainer by the Client for the services here under shall be **INR 100 per student.**\n\nAt least **50%** of the payment needs to be completed **before the commencement of the training** and remaining amount to be paid **after completion of 70% of the training.** Refer **Exhibit B** for more details."),
            cancelling_title: text("CANCELLING THE TRAINING SESSIONS"),
            cancelling_body: text("The Client agrees and acknowledges that a change in the schedule may be a significant burden for the Trainer and thus the Client shall forfeit **50%** of the amount already paid to the Trainer if the Client must cancel the training services within 5 days of the date on which the training services are to be scheduled."),
            publicity_title: text("PUBLICITY AND MARKETING"),
            publicity_body: text("The Client authorizes the Trainer to utilize the Client's logo and associated trademarks as well as any media, photos, or footage from any training session solely for marketing the Trainer's services."),
            ..Default::default()
        }),
        5 => Content::Standard(StandardContent {
            modification_title: text("NO MODIFICATION UNLESS IN WRITING"),
            modification_body: text("No modification of this Contract shall be valid unless in writing and agreed upon by both Parties."),
            law_title: text("APPLICABLE LAW"),
            law_body: text("This Contract and the interpretation of its terms shall be governed by and construed in accordance with the laws of the State of Karnataka and subject to the exclusive jurisdiction of the federal and state courts located in the country, India."),
            witness_title: text("IN WITNESS WHEREOF"),
            witness_body: text("IN WITNESS WHEREOF, each of the Parties have executed this Contract, both Parties by its duly authorized officer, as of the day and year set forth below."),
            signatories: Some(Signatories {
                swipegen: "SwipeGen".to_string(),
                dscasc: "DSCASC".to_string(),
            }),
            ..Default::default()
        }),
        6 => Content::Standard(StandardContent {
            title: text("PUBLICITY AND MARKETING"),
            body: text("The Client authorizes the Trainer to utilize the Client's logo and associated trademarks as well as any media, photos, or footage from any training session solely for marketing the Trainer's services.\n\nThe Trainer shall use such materials in a professional and respectful manner.\n\nThe Client shall have the right to review and approve any marketing materials before publication.\n\nThe Trainer shall not use any confidential or proprietary information in marketing materials.\n\nBoth parties shall benefit from positive publicity generated through the training partnership.\n\nThe Client may also use the Trainer's branding in their own marketing materials with prior approval."),
            ..Default::default()
        }),
        7 => Content::Standard(StandardContent {
            title: text("NO MODIFICATION UNLESS IN WRITING"),
            body: text("No modification of this Contract shall be valid unless in writing and agreed upon by both Parties.\n\nAny changes to the scope of work must be documented and signed by both parties.\n\nPrice adjustments must be agreed upon in writing before implementation.\n\nSchedule changes must be communicated in writing with reasonable notice.\n\nBoth parties shall maintain written records of all modifications.\n\nThis clause ensures clarity and prevents misunderstandings."),
            ..Default::default()
        }),
        8 => Content::Standard(StandardContent {
            title: text("APPLICABLE LAW"),
            body: text("This Contract and the interpretation of its terms shall be governed by and construed in accordance with the laws of the State of Karnataka and subject to the exclusive jurisdiction of the federal and state courts located in the country, India.\n\nAny disputes arising from this contract shall be resolved through arbitration in Bengaluru.\n\nThe prevailing party shall be entitled to recover reasonable attorney fees.\n\nThis contract is enforceable in all jurisdictions where the services are provided.\n\nBoth parties agree to submit to the jurisdiction of the courts in Karnataka.\n\nThis clause ensures legal clarity and dispute resolution procedures."),
            ..Default::default()
        }),
        9 => Content::Standard(StandardContent {
            title: text("IN WITNESS WHEREOF"),
            body: text("IN WITNESS WHEREOF, each of the Parties have executed this Contract, both Parties by its duly authorized officer, as of the day and year set forth below.\n\nThis contract shall be effective from the date of signing by both parties.\n\nBoth parties acknowledge that they have read and understood all terms and conditions.\n\nThe contract shall remain in effect until all obligations are fulfilled.\n\nAny amendments must be made in writing and signed by both parties.\n\nThis document represents the complete agreement between the parties."),
            ..Default::default()
        }),
        10 => Content::Modules(ModulesContent {
            title: "EXHIBIT A - Web Development + Cloud DevOps".to_string(),
            modules: vec![
                module(1, "Introduction to Web Development, SDLC & Client-Server Architecture", 2.0, ModuleType::Theory, "Introduces key concepts of modern web development, Software Development Life Cycle (SDLC), and the client-server model."),
                module(2, "APIs - REST vs SOAP (Simplified Overview)", 1.5, ModuleType::Theory, "Explains the basics of Application Programming Interfaces (APIs), REST vs SOAP protocols, and how frontend and backend communicate."),
            ],
        }),
        11 => Content::Modules(ModulesContent {
            title: "EXHIBIT A - Web Development + Cloud DevOps Contd...".to_string(),
            modules: vec![
                module(3, "Source Control using Git and GitHub", 1.5, ModuleType::HandsOn, "Teaches students to use Git for version control and GitHub for collaborative code management."),
                module(4, "Creating Web Pages with HTML", 3.0, ModuleType::HandsOn, "Guides students through building static webpages using HTML5 including headings, images, links, forms, and semantic elements."),
            ],
        }),
        12 => Content::Modules(ModulesContent {
            title: "EXHIBIT A - Web Development + Cloud DevOps Contd...".to_string(),
            modules: vec![
                module(5, "Styling with CSS", 3.0, ModuleType::HandsOn, "Introduces CSS for styling web pages. Covers colors, fonts, layout techniques using Flexbox and Grid, and making websites responsive with media queries."),
                module(6, "JavaScript Fundamentals for Web Interactivity", 3.5, ModuleType::HandsOn, "Covers essential JavaScript programming for the web: variables, functions, events, conditions, loops, and DOM manipulation."),
            ],
        }),
        n => Content::Standard(StandardContent {
            title: Some(format!("Page {}", n)),
            body: text("Content for this page..."),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContentKind;
    use lopdf::content::{Content as PdfContent, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn create_test_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for line in lines {
            let content = PdfContent {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), Object::Integer(12)]),
                    Operation::new("Td", vec![Object::Integer(72), Object::Integer(700)]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                lopdf::Dictionary::new(),
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_canned_content_has_twelve_pages() {
        let pages = CannedContent::default().pages();
        assert_eq!(pages.len(), 12);
        assert_eq!(pages[1].title(), Some("ABOUT US"));
        assert_eq!(pages[9].kind(), ContentKind::Modules);
        assert_eq!(pages[11].kind(), ContentKind::Modules);
    }

    #[test]
    fn test_canned_content_ignores_input() {
        let a = CannedContent::default().extract(b"anything").unwrap();
        let b = CannedContent::default().extract(&[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_canned_page_fallback_for_unknown_numbers() {
        match canned_page(13) {
            Content::Standard(c) => {
                assert_eq!(c.title.as_deref(), Some("Page 13"));
                assert_eq!(c.body.as_deref(), Some("Content for this page..."));
            }
            other => panic!("Expected standard content, got {:?}", other),
        }
    }

    #[test]
    fn test_canned_content_never_empty() {
        let pages = CannedContent::new(0).pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title(), None);
    }

    #[test]
    fn test_fixture_content_rejects_broken_table() {
        let result = FixtureContent::from_json(
            r#"[{"title": "EXHIBIT A", "modules": [{"number": 1, "topic": "t"}]}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fixture_content_from_json() {
        let fixture = FixtureContent::from_json(
            r#"[
                {"title": "Cover", "body": "Hello"},
                {"title": "EXHIBIT B", "details": [{"attribute": "Fee", "value": "INR 100"}]}
            ]"#,
        )
        .unwrap();
        let pages = fixture.extract(&[]).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].kind(), ContentKind::Details);
    }

    #[test]
    fn test_pdf_extractor_rejects_non_pdf() {
        let err = PdfTextExtractor.extract(b"hello world").unwrap_err();
        assert!(matches!(err, DocError::LoadFailure(_)));
    }

    #[test]
    fn test_pdf_extractor_rejects_truncated_pdf() {
        let err = PdfTextExtractor.extract(b"%PDF-1.7\n%broken").unwrap_err();
        assert!(matches!(err, DocError::LoadFailure(_)));
    }

    #[test]
    fn test_pdf_extractor_maps_pages() {
        let pdf = create_test_pdf(&["First page", "Second page"]);
        let pages = PdfTextExtractor.extract(&pdf).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].title(), Some("Page 1"));
        assert_eq!(pages[1].title(), Some("Page 2"));
        assert!(pages.iter().all(|p| p.kind() == ContentKind::Standard));
    }
}
