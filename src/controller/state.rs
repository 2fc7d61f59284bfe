//! Controller and drop zone state

use serde::{Deserialize, Serialize};

/// Drop zone prompt shown before any extraction and after a reset
pub const INITIAL_PROMPT: &str = "Drag and drop the PDF here";

/// Drop zone label after a successful extraction
pub const PROCESSED_LABEL: &str = "PDF processed. Data extracted.";

/// The single mutable state owned by the controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Serialized `ExtractionResult`, or empty when idle
    pub last_extracted_data: String,
    /// Last-seen reset trigger value
    pub reset_trigger: f64,
}

impl ControllerState {
    /// State at component start; an absent trigger reads as 0
    pub fn new(reset_trigger: Option<f64>) -> Self {
        Self {
            last_extracted_data: String::new(),
            reset_trigger: reset_trigger.unwrap_or(0.0),
        }
    }

    pub fn is_populated(&self) -> bool {
        !self.last_extracted_data.is_empty()
    }
}

/// What the drop surface currently shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropZone {
    pub label: String,
    /// A drag is hovering over the zone
    pub drag_over: bool,
}

impl Default for DropZone {
    fn default() -> Self {
        Self {
            label: INITIAL_PROMPT.to_string(),
            drag_over: false,
        }
    }
}
