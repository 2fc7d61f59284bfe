//! PDF form layer
//!
//! Field normalization is pure; loading goes through PDFium.

mod fields;
mod loader;

pub use fields::{
    extract, ExtractedValue, ExtractionResult, FieldKind, FormField, UNSUPPORTED_FIELD_TYPE,
};
pub use loader::{pdfium_available, FormLoader, PdfiumFormLoader};
