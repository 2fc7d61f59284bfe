//! Turning drop sources into dropped files

use crate::controller::{DroppedFile, PDF_MIME_TYPE};
use crate::error::{Error, Result};
use base64::Engine;
use std::path::Path;

/// Guess a MIME type from a file extension, the way a drop surface reports it
pub fn mime_type_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF_MIME_TYPE,
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn check_size(size: u64, max_drop_bytes: u64) -> Result<()> {
    if size > max_drop_bytes {
        return Err(Error::DropTooLarge {
            size,
            max_size: max_drop_bytes,
        });
    }
    Ok(())
}

/// Read a file from disk as a drop.
///
/// The MIME type comes from `mime_type` when given, else from the extension.
/// Contents are not inspected here.
pub fn resolve_path<P: AsRef<Path>>(
    path: P,
    mime_type: Option<&str>,
    max_drop_bytes: u64,
) -> Result<DroppedFile> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::PdfNotFound {
            path: path.display().to_string(),
        });
    }

    check_size(std::fs::metadata(path)?.len(), max_drop_bytes)?;
    let bytes = std::fs::read(path).map_err(Error::Io)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_type.unwrap_or_else(|| mime_type_for_path(path));

    Ok(DroppedFile::new(name, mime_type, bytes))
}

/// Decode base64 data as a drop.
///
/// Without an explicit MIME type the drop is typed as
/// `application/octet-stream` and will be rejected by the controller.
pub fn resolve_base64(
    base64_data: &str,
    mime_type: Option<&str>,
    max_drop_bytes: u64,
) -> Result<DroppedFile> {
    // Decoded size is at most 3/4 of the encoded length
    check_size(base64_data.len() as u64 / 4 * 3, max_drop_bytes)?;

    let engine = base64::engine::general_purpose::STANDARD;
    let bytes = engine.decode(base64_data)?;
    check_size(bytes.len() as u64, max_drop_bytes)?;

    Ok(DroppedFile::new(
        "<base64>",
        mime_type.unwrap_or("application/octet-stream"),
        bytes,
    ))
}
