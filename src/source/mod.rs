//! Drop source resolution

pub mod resolver;

pub use resolver::{mime_type_for_path, resolve_base64, resolve_path};
