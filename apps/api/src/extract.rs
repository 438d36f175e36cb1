//! PDF validation and per-page text extraction.
//!
//! Parsing itself is delegated to `pdf-extract`; this module only adds the
//! magic-byte check that runs before the upload ever reaches the parser.

use std::path::Path;

use thiserror::Error;

const PDF_MAGIC: &[u8; 5] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file does not start with %PDF-")]
    NotAPdf,

    #[error("PDF parse error: {0}")]
    Parse(#[from] pdf_extract::OutputError),
}

/// Checks that the upload starts with the `%PDF-` magic bytes.
pub fn validate_pdf_magic(bytes: &[u8]) -> Result<(), ExtractError> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(ExtractError::NotAPdf);
    }
    Ok(())
}

/// Extracts plain text from the PDF at `path`, one string per page.
///
/// CPU-bound; callers on the async runtime run this under `spawn_blocking`.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractError> {
    Ok(pdf_extract::extract_text_by_pages(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_magic() {
        assert!(validate_pdf_magic(b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn rejects_missing_magic() {
        assert!(matches!(
            validate_pdf_magic(b"<html></html>"),
            Err(ExtractError::NotAPdf)
        ));
    }

    #[test]
    fn rejects_short_input() {
        assert!(matches!(validate_pdf_magic(b"%PD"), Err(ExtractError::NotAPdf)));
    }
}
