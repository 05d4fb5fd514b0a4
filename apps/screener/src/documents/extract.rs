use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Resume formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Accepts `pdf`, `.pdf`, `PDF`, etc.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Looks at the extension of a file name or archive path.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Turns resume bytes into plain text. Unsupported extensions yield an empty string.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractError>;
}

/// Default extractor: `pdf-extract` for PDFs, `docx-rs` for Word documents.
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractError> {
        match DocumentKind::from_extension(extension) {
            Some(DocumentKind::Pdf) => extract_pdf(bytes),
            Some(DocumentKind::Docx) => extract_docx(bytes),
            None => Ok(String::new()),
        }
    }
}

/// `pdf-extract` panics on some malformed inputs; those become errors too.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }))
    .map_err(|_| ExtractError::Pdf("parser panicked on malformed input".to_string()))?
    .map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// One output line per paragraph, runs concatenated.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension_variants() {
        assert_eq!(DocumentKind::from_extension(".pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension(".DocX"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension(".doc"), None);
        assert_eq!(DocumentKind::from_extension(""), None);
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            DocumentKind::from_file_name("batch/jane_doe.pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_file_name("John Smith.DOCX"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_file_name("notes.txt"), None);
        assert_eq!(DocumentKind::from_file_name("pdf"), None);
    }

    #[test]
    fn test_unsupported_extension_yields_empty_text() {
        let text = DocumentExtractor.extract(b"plain words", ".txt").unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let result = DocumentExtractor.extract(b"definitely not a pdf", ".pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_corrupt_docx_is_an_error() {
        let result = DocumentExtractor.extract(b"definitely not a docx", ".docx");
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }
}
