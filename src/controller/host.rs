//! Side effects the controller asks of its host

use serde::Serialize;

/// Blocking, user-facing error notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    /// Dropped item was missing or not a PDF
    InvalidFile,
    /// The PDF could not be loaded or its form read
    ExtractionFailed,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::InvalidFile => "Please drop a valid PDF file.",
            Alert::ExtractionFailed => "Error extracting PDF data. Ensure it's a valid form PDF.",
        }
    }
}

/// Host hooks invoked during controller transitions
pub trait ControlHost {
    /// The `ExtractedData` output has a new value
    fn output_changed(&mut self);

    /// Show a blocking alert to the user
    fn alert(&mut self, alert: Alert);

    /// The drop zone label changed
    fn status_changed(&mut self, _label: &str) {}
}

/// Host that records every callback, for adapters that report them afterwards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub output_changes: u32,
    pub alerts: Vec<Alert>,
    pub status: Option<String>,
}

impl ControlHost for EventLog {
    fn output_changed(&mut self) {
        self.output_changes += 1;
    }

    fn alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    fn status_changed(&mut self, label: &str) {
        self.status = Some(label.to_string());
    }
}
