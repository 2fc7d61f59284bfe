//! Form field loading through PDFium

use crate::error::{Error, Result};
use crate::pdf::fields::{FieldKind, FormField};
use pdfium_render::prelude::*;
use std::collections::HashMap;

/// Source of the ordered form field list for a PDF document
pub trait FormLoader {
    /// Parse `data` and return its form fields in document order.
    ///
    /// For [`PdfiumFormLoader`], "document order" means widget order: pages
    /// first to last, and annotations in each page's `/Annots` order. This can
    /// differ from the order of the AcroForm `/Fields` array, and a field with
    /// no widget on any page is not reported at all.
    fn load_fields(&self, data: &[u8]) -> Result<Vec<FormField>>;
}

impl<L: FormLoader + ?Sized> FormLoader for Box<L> {
    fn load_fields(&self, data: &[u8]) -> Result<Vec<FormField>> {
        (**self).load_fields(data)
    }
}

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Whether the PDFium library can be bound on this machine
pub fn pdfium_available() -> bool {
    create_pdfium().is_ok()
}

/// Loads AcroForm fields with PDFium
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumFormLoader;

impl PdfiumFormLoader {
    pub fn new() -> Self {
        Self
    }
}

impl FormLoader for PdfiumFormLoader {
    fn load_fields(&self, data: &[u8]) -> Result<Vec<FormField>> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let pdfium = create_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| match e {
                PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                    Error::PasswordRequired
                }
                _ => Error::Pdfium {
                    reason: format!("{}", e),
                },
            })?;

        ensure_unprotected(document.permissions().security_handler_revision())?;

        if document.form().is_none() {
            return Err(Error::NoForm);
        }

        let mut collector = FieldCollector::default();
        let pages = document.pages();

        for page_index in 0..pages.len() {
            let page = pages.get(page_index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", page_index + 1, e),
            })?;

            for annotation in page.annotations().iter() {
                if let Some(field) = annotation.as_form_field() {
                    let field = FormField {
                        name: field.name().unwrap_or_default(),
                        kind: field_kind(field),
                    };
                    tracing::trace!(
                        page = page_index + 1,
                        name = %field.name,
                        kind = field.kind.label(),
                        "Form widget"
                    );
                    collector.push(field);
                }
            }
        }

        let fields = collector.finish();
        tracing::debug!(fields = fields.len(), "Loaded form fields");

        Ok(fields)
    }
}

/// Any security handler, even one opened with an empty user password, is refused
fn ensure_unprotected(
    revision: std::result::Result<PdfSecurityHandlerRevision, PdfiumError>,
) -> Result<()> {
    match revision {
        Ok(PdfSecurityHandlerRevision::Unprotected) => Ok(()),
        Ok(revision) => {
            tracing::debug!(?revision, "Refusing encrypted PDF");
            Err(Error::Encrypted)
        }
        Err(e) => Err(Error::Pdfium {
            reason: format!("Failed to read security handler: {}", e),
        }),
    }
}

fn field_kind(field: &PdfFormField) -> FieldKind {
    if let Some(text_field) = field.as_text_field() {
        FieldKind::Text {
            text: text_field.value(),
        }
    } else if let Some(checkbox) = field.as_checkbox_field() {
        FieldKind::Checkbox {
            checked: checkbox.is_checked().unwrap_or(false),
        }
    } else if let Some(radio) = field.as_radio_button_field() {
        FieldKind::RadioGroup {
            selected: radio.group_value().filter(|v| !v.is_empty() && v != "Off"),
        }
    } else if let Some(combo) = field.as_combo_box_field() {
        let selected = set_option_labels(combo.options()).into_iter().next();
        FieldKind::Dropdown { selected }
    } else if let Some(list) = field.as_list_box_field() {
        FieldKind::MultiSelect {
            selected: set_option_labels(list.options()),
        }
    } else if field.as_push_button_field().is_some() {
        FieldKind::Other {
            kind: "push_button".to_string(),
        }
    } else if field.as_signature_field().is_some() {
        FieldKind::Other {
            kind: "signature".to_string(),
        }
    } else {
        FieldKind::Other {
            kind: "unknown".to_string(),
        }
    }
}

/// Labels of the currently selected options, in list order
fn set_option_labels(options: &PdfFormFieldOptions) -> Vec<String> {
    let mut labels = Vec::new();
    for i in 0..options.len() {
        if let Ok(opt) = options.get(i) {
            if opt.is_set() {
                if let Some(label) = opt.label() {
                    labels.push(label.clone());
                }
            }
        }
    }
    labels
}

/// Folds the widgets of one field into a single entry.
///
/// PDFium reports one annotation per widget, so a radio group with three
/// buttons shows up three times. Widgets sharing a name and kind are the
/// same field; fields with the same name but a different kind stay separate.
#[derive(Default)]
struct FieldCollector {
    fields: Vec<FormField>,
    seen: HashMap<(String, &'static str), usize>,
}

impl FieldCollector {
    fn push(&mut self, field: FormField) {
        let key = (field.name.clone(), widget_kind(&field.kind));
        match self.seen.get(&key) {
            Some(&index) => {
                if let (
                    FieldKind::RadioGroup { selected: existing },
                    FieldKind::RadioGroup { selected: incoming },
                ) = (&mut self.fields[index].kind, field.kind)
                {
                    if existing.is_none() {
                        *existing = incoming;
                    }
                }
            }
            None => {
                self.seen.insert(key, self.fields.len());
                self.fields.push(field);
            }
        }
    }

    fn finish(self) -> Vec<FormField> {
        self.fields
    }
}

fn widget_kind(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text { .. } => "text",
        FieldKind::Checkbox { .. } => "checkbox",
        FieldKind::RadioGroup { .. } => "radio_group",
        FieldKind::Dropdown { .. } => "dropdown",
        FieldKind::MultiSelect { .. } => "multi_select",
        FieldKind::Other { .. } => "other",
    }
}
