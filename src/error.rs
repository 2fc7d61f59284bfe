//! Error types for the PDF form extractor

use thiserror::Error;

/// Result type alias for the PDF form extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the PDF form extractor
#[derive(Error, Debug)]
pub enum Error {
    /// Drop event carried no file
    #[error("No file was dropped")]
    MissingFile,

    /// Dropped file is not a PDF
    #[error("Unsupported file type: {mime_type}")]
    InvalidFileType { mime_type: String },

    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDF is password protected
    #[error("PDF is password protected")]
    PasswordRequired,

    /// PDF is encrypted, even if it opens without a password
    #[error("PDF is encrypted")]
    Encrypted,

    /// PDF has no interactive form
    #[error("PDF does not contain an interactive form")]
    NoForm,

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },

    /// Dropped file too large
    #[error("Dropped file too large: {size} bytes (max: {max_size} bytes)")]
    DropTooLarge { size: u64, max_size: u64 },

    /// Base64 decode error
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blocking task failed to complete
    #[error("Task failed: {reason}")]
    Task { reason: String },
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors, file sizes) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::MissingFile => "No file was dropped".to_string(),
            Error::InvalidFileType { mime_type } => {
                format!("Unsupported file type: {}", mime_type)
            }
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::PasswordRequired => "PDF is password protected".to_string(),
            Error::Encrypted => "PDF is encrypted".to_string(),
            Error::NoForm => "PDF does not contain an interactive form".to_string(),
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
            Error::DropTooLarge { max_size, .. } => {
                format!("Dropped file exceeds maximum size of {} bytes", max_size)
            }
            Error::Base64Decode(_) => "Invalid base64 data".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
            Error::Task { .. } => "Internal processing error".to_string(),
        }
    }
}
