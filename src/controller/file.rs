//! Dropped file and its acceptance check

use crate::error::{Error, Result};

/// The only MIME type a drop accepts
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file handed over by a drop event
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFile {
    /// Display name of the file
    pub name: String,
    /// MIME type reported by the drop surface
    pub mime_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Accept a drop only when a file is present and typed exactly as a PDF
pub fn accept_drop(file: Option<DroppedFile>) -> Result<DroppedFile> {
    let file = file.ok_or(Error::MissingFile)?;
    if file.mime_type != PDF_MIME_TYPE {
        return Err(Error::InvalidFileType {
            mime_type: file.mime_type,
        });
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_pdf() {
        let file = DroppedFile::new("form.pdf", PDF_MIME_TYPE, b"%PDF-1.7".to_vec());
        assert_eq!(accept_drop(Some(file.clone())).unwrap(), file);
    }

    #[test]
    fn test_reject_missing() {
        assert!(matches!(accept_drop(None), Err(Error::MissingFile)));
    }

    #[test]
    fn test_reject_other_types() {
        for mime in ["text/plain", "application/x-pdf", "APPLICATION/PDF", ""] {
            let file = DroppedFile::new("notes", mime, Vec::new());
            assert!(
                matches!(accept_drop(Some(file)), Err(Error::InvalidFileType { .. })),
                "{mime} should be rejected"
            );
        }
    }
}
