//! Drop/reset controller
//!
//! Owns the extracted output and reacts to drop, drag and reset signals.
//! Host side effects are delivered through [`ControlHost`].

mod file;
mod host;
mod state;

pub use file::{accept_drop, DroppedFile, PDF_MIME_TYPE};
pub use host::{Alert, ControlHost, EventLog};
pub use state::{ControllerState, DropZone, INITIAL_PROMPT, PROCESSED_LABEL};

use crate::error::Result;
use crate::pdf::{extract, FormLoader};
use serde::Serialize;

/// Result of handling a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropOutcome {
    /// Missing file or wrong MIME type; nothing changed
    Rejected,
    /// The PDF could not be processed; previous output kept
    Failed,
    /// New output stored
    Extracted,
}

/// Controller state machine over a form loader
pub struct DropController<L> {
    state: ControllerState,
    drop_zone: DropZone,
    loader: L,
}

impl<L: FormLoader> DropController<L> {
    /// Create a controller in the idle state
    pub fn new(loader: L, reset_trigger: Option<f64>) -> Self {
        Self {
            state: ControllerState::new(reset_trigger),
            drop_zone: DropZone::default(),
            loader,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    /// Current `ExtractedData` output
    pub fn output(&self) -> &str {
        &self.state.last_extracted_data
    }

    pub fn on_drag_over(&mut self) {
        self.drop_zone.drag_over = true;
    }

    pub fn on_drag_leave(&mut self) {
        self.drop_zone.drag_over = false;
    }

    /// Handle a drop event.
    ///
    /// Failures never reach the caller as errors: they are logged and
    /// surfaced to the user as an alert, and the previous output stays.
    pub fn on_drop<H: ControlHost + ?Sized>(
        &mut self,
        host: &mut H,
        file: Option<DroppedFile>,
    ) -> DropOutcome {
        self.drop_zone.drag_over = false;

        let file = match accept_drop(file) {
            Ok(file) => file,
            Err(e) => {
                tracing::info!(error = %e, "Rejected drop");
                host.alert(Alert::InvalidFile);
                return DropOutcome::Rejected;
            }
        };

        match self.process(&file) {
            Ok(json) => {
                self.state.last_extracted_data = json;
                host.output_changed();
                self.set_label(host, PROCESSED_LABEL);
                DropOutcome::Extracted
            }
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "PDF processing error");
                host.alert(Alert::ExtractionFailed);
                DropOutcome::Failed
            }
        }
    }

    fn process(&self, file: &DroppedFile) -> Result<String> {
        let fields = self.loader.load_fields(&file.bytes)?;
        let result = extract(&fields);
        tracing::info!(
            file = %file.name,
            fields = result.fields.len(),
            "Extracted form data"
        );
        result.to_json()
    }

    /// Handle a new reset trigger reading. Returns whether a reset happened.
    ///
    /// Only a change of value resets; repeating the last value does nothing.
    pub fn on_reset_signal<H: ControlHost + ?Sized>(
        &mut self,
        host: &mut H,
        reset_trigger: Option<f64>,
    ) -> bool {
        let reset_trigger = reset_trigger.unwrap_or(0.0);
        if reset_trigger == self.state.reset_trigger {
            return false;
        }

        tracing::debug!(
            from = self.state.reset_trigger,
            to = reset_trigger,
            "Reset trigger changed"
        );

        self.state.last_extracted_data.clear();
        host.output_changed();
        self.set_label(host, INITIAL_PROMPT);
        self.state.reset_trigger = reset_trigger;
        true
    }

    fn set_label<H: ControlHost + ?Sized>(&mut self, host: &mut H, label: &str) {
        self.drop_zone.label = label.to_string();
        host.status_changed(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pdf::{FieldKind, FormField};
    use pretty_assertions::assert_eq;

    /// Loader that returns canned fields, or fails for bytes starting with "BAD"
    struct StubLoader {
        fields: Vec<FormField>,
    }

    impl FormLoader for StubLoader {
        fn load_fields(&self, data: &[u8]) -> Result<Vec<FormField>> {
            if data.starts_with(b"BAD") {
                return Err(Error::PasswordRequired);
            }
            Ok(self.fields.clone())
        }
    }

    fn controller(fields: Vec<FormField>, trigger: Option<f64>) -> DropController<StubLoader> {
        DropController::new(StubLoader { fields }, trigger)
    }

    fn pdf(bytes: &[u8]) -> Option<DroppedFile> {
        Some(DroppedFile::new("form.pdf", PDF_MIME_TYPE, bytes.to_vec()))
    }

    fn first_name() -> Vec<FormField> {
        vec![FormField::new(
            "FirstName",
            FieldKind::Text {
                text: Some("Ada".to_string()),
            },
        )]
    }

    #[test]
    fn test_initial_state() {
        let ctl = controller(vec![], None);
        assert_eq!(ctl.output(), "");
        assert_eq!(ctl.state().reset_trigger, 0.0);
        assert_eq!(ctl.drop_zone().label, INITIAL_PROMPT);
        assert!(!ctl.state().is_populated());
    }

    #[test]
    fn test_drop_extracts_and_notifies() {
        let mut ctl = controller(first_name(), None);
        let mut host = EventLog::default();

        let outcome = ctl.on_drop(&mut host, pdf(b"%PDF"));

        assert_eq!(outcome, DropOutcome::Extracted);
        assert_eq!(
            ctl.output(),
            r#"{"data":{"FirstName":"Ada"},"fields":["FirstName"]}"#
        );
        assert_eq!(host.output_changes, 1);
        assert!(host.alerts.is_empty());
        assert_eq!(host.status.as_deref(), Some(PROCESSED_LABEL));
        assert_eq!(ctl.drop_zone().label, PROCESSED_LABEL);
    }

    #[test]
    fn test_drop_wrong_type_is_rejected() {
        let mut ctl = controller(first_name(), None);
        let mut host = EventLog::default();

        let file = DroppedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let outcome = ctl.on_drop(&mut host, Some(file));

        assert_eq!(outcome, DropOutcome::Rejected);
        assert_eq!(ctl.output(), "");
        assert_eq!(host.alerts, vec![Alert::InvalidFile]);
        assert_eq!(host.output_changes, 0);
        assert_eq!(host.status, None);
    }

    #[test]
    fn test_drop_without_file_is_rejected() {
        let mut ctl = controller(first_name(), None);
        let mut host = EventLog::default();

        assert_eq!(ctl.on_drop(&mut host, None), DropOutcome::Rejected);
        assert_eq!(host.alerts, vec![Alert::InvalidFile]);
    }

    #[test]
    fn test_failed_drop_keeps_previous_output() {
        let mut ctl = controller(first_name(), None);
        let mut host = EventLog::default();

        ctl.on_drop(&mut host, pdf(b"%PDF"));
        let before = ctl.output().to_string();

        let outcome = ctl.on_drop(&mut host, pdf(b"BAD"));

        assert_eq!(outcome, DropOutcome::Failed);
        assert_eq!(ctl.output(), before);
        assert_eq!(host.output_changes, 1);
        assert_eq!(host.alerts, vec![Alert::ExtractionFailed]);
    }

    #[test]
    fn test_reset_is_edge_triggered() {
        let mut ctl = controller(vec![], Some(0.0));
        let mut host = EventLog::default();

        let resets = [0.0, 0.0, 1.0, 1.0, 2.0]
            .into_iter()
            .filter(|&v| ctl.on_reset_signal(&mut host, Some(v)))
            .count();

        assert_eq!(resets, 2);
        assert_eq!(host.output_changes, 2);
        assert_eq!(ctl.state().reset_trigger, 2.0);
    }

    #[test]
    fn test_reset_after_extraction_clears_output() {
        let mut ctl = controller(first_name(), Some(3.0));
        let mut host = EventLog::default();

        ctl.on_drop(&mut host, pdf(b"%PDF"));
        assert!(ctl.state().is_populated());

        assert!(ctl.on_reset_signal(&mut host, Some(4.0)));

        assert_eq!(ctl.output(), "");
        assert_eq!(ctl.drop_zone().label, INITIAL_PROMPT);
        assert_eq!(host.status.as_deref(), Some(INITIAL_PROMPT));
        assert_eq!(host.output_changes, 2);
    }

    #[test]
    fn test_absent_trigger_reads_as_zero() {
        let mut ctl = controller(vec![], None);
        let mut host = EventLog::default();

        assert!(!ctl.on_reset_signal(&mut host, None));
        assert!(!ctl.on_reset_signal(&mut host, Some(0.0)));
        assert!(ctl.on_reset_signal(&mut host, Some(7.0)));
        assert!(ctl.on_reset_signal(&mut host, None));
        assert_eq!(ctl.state().reset_trigger, 0.0);
    }

    #[test]
    fn test_drag_highlight_cleared_by_drop() {
        let mut ctl = controller(first_name(), None);
        let mut host = EventLog::default();

        ctl.on_drag_over();
        assert!(ctl.drop_zone().drag_over);
        ctl.on_drag_leave();
        assert!(!ctl.drop_zone().drag_over);

        ctl.on_drag_over();
        ctl.on_drop(&mut host, None);
        assert!(!ctl.drop_zone().drag_over);
    }

    #[test]
    fn test_state_serializes() {
        let ctl = controller(vec![], Some(5.0));
        let json = serde_json::to_value(ctl.state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "last_extracted_data": "", "reset_trigger": 5.0 })
        );
    }
}
