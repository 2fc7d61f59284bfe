//! PDF Form Extractor Library
//!
//! Extracts interactive form field values from a dropped PDF:
//! - `pdf`: form field model, normalization (`extract`) and PDFium loading
//! - `controller`: drop/reset state machine holding the `ExtractedData` output
//! - `source`: turning paths and base64 payloads into dropped files
//! - `server`: MCP host adapter exposing `drop_file`, `signal_reset` and `get_output`

pub mod controller;
pub mod error;
pub mod pdf;
pub mod server;
pub mod source;

pub use controller::{
    Alert, ControlHost, ControllerState, DropController, DropOutcome, DropZone, DroppedFile,
    EventLog,
};
pub use error::{Error, Result};
pub use pdf::{extract, ExtractedValue, ExtractionResult, FieldKind, FormField, FormLoader};
pub use server::{
    run_server, run_server_with_config, DropFileParams, DropSource, PdfFormServer, ServerConfig,
    SignalResetParams,
};
