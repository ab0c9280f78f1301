//! Input and output boundary types

use crate::error::SessionError;

/// A file handed over by the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Only the type tag is checked; the bytes are not inspected here.
    pub fn validate(&self, accepted: &[String]) -> Result<(), SessionError> {
        // Ignore parameters such as `; charset=binary`
        let essence = self.mime_type.split(';').next().unwrap_or_default().trim();
        if accepted.iter().any(|t| t.eq_ignore_ascii_case(essence)) {
            Ok(())
        } else {
            Err(SessionError::UnsupportedType(self.mime_type.clone()))
        }
    }
}

/// Bytes offered to the UI for download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// True when served from the export cache rather than freshly serialized
    pub from_cache: bool,
}

/// `proposal.pdf` with suffix `-edited` becomes `proposal-edited.pdf`
pub fn edited_file_name(original: &str, suffix: &str) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case("pdf") => stem,
        _ => original,
    };
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("{}{}.pdf", stem, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Vec<String> {
        vec!["application/pdf".to_string()]
    }

    #[test]
    fn test_accepts_pdf_mime() {
        let upload = Upload::new("a.pdf", "application/pdf", vec![]);
        assert!(upload.validate(&accepted()).is_ok());
    }

    #[test]
    fn test_accepts_mime_with_parameters() {
        let upload = Upload::new("a.pdf", "Application/PDF; charset=binary", vec![]);
        assert!(upload.validate(&accepted()).is_ok());
    }

    #[test]
    fn test_rejects_other_mime() {
        let upload = Upload::new("a.png", "image/png", b"%PDF-1.7".to_vec());
        assert_eq!(
            upload.validate(&accepted()),
            Err(SessionError::UnsupportedType("image/png".to_string()))
        );
    }

    #[test]
    fn test_edited_file_name() {
        assert_eq!(edited_file_name("proposal.pdf", "-edited"), "proposal-edited.pdf");
        assert_eq!(edited_file_name("Proposal.PDF", "-edited"), "Proposal-edited.pdf");
        assert_eq!(edited_file_name("v1.2.pdf", "-edited"), "v1.2-edited.pdf");
        assert_eq!(edited_file_name("scan", "-edited"), "scan-edited.pdf");
        assert_eq!(edited_file_name("", "-edited"), "document-edited.pdf");
    }
}
