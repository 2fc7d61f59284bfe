//! MCP host adapter using rmcp
//!
//! Plays the role of the hosting UI framework: file drops, reset trigger
//! updates and output reads arrive as tool calls.

use crate::controller::{Alert, DropController, DropOutcome, DroppedFile, EventLog};
use crate::pdf::{FormLoader, PdfiumFormLoader};
use crate::source::{resolve_base64, resolve_path};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Loader type held by the server's controller
pub type SharedLoader = Box<dyn FormLoader + Send>;

/// Where the dropped file comes from
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DropSource {
    /// File path (absolute or relative)
    Path {
        /// Path to the dropped file
        path: String,
    },
    /// Base64 encoded file contents
    Base64 {
        /// Base64 encoded content
        base64: String,
    },
}

/// Configuration for the PDF form extractor server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directories path drops may come from (empty allows any path)
    pub resource_dirs: Vec<String>,
    /// Maximum size in bytes of a dropped file (default: 100MB)
    pub max_drop_bytes: u64,
    /// Reset trigger value at component start (absent reads as 0)
    pub initial_reset_trigger: Option<f64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            resource_dirs: Vec::new(),
            max_drop_bytes: 100 * 1024 * 1024, // 100MB
            initial_reset_trigger: None,
        }
    }
}

/// PDF form extractor MCP server
#[derive(Clone)]
pub struct PdfFormServer {
    controller: Arc<Mutex<DropController<SharedLoader>>>,
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request/Response types for drop_file
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DropFileParams {
    /// The dropped file
    pub source: DropSource,
    /// MIME type of the file. Inferred from the extension for path sources.
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AlertInfo {
    /// Alert kind ("invalid_file" or "extraction_failed")
    pub kind: String,
    /// Message shown to the user
    pub message: String,
}

impl From<Alert> for AlertInfo {
    fn from(alert: Alert) -> Self {
        let kind = match alert {
            Alert::InvalidFile => "invalid_file",
            Alert::ExtractionFailed => "extraction_failed",
        };
        Self {
            kind: kind.to_string(),
            message: alert.message().to_string(),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DropFileResult {
    /// Correlation id for this drop in the server logs
    pub drop_id: String,
    /// "rejected", "failed" or "extracted"
    pub outcome: String,
    /// Whether ExtractedData changed
    pub output_changed: bool,
    /// Alerts raised while handling the drop
    pub alerts: Vec<AlertInfo>,
    /// Drop zone label after the drop
    pub status: String,
    /// Current output (empty string or JSON with "data" and "fields")
    #[serde(rename = "ExtractedData")]
    pub extracted_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for signal_reset
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SignalResetParams {
    /// Current reset trigger value; a change from the last value clears the output
    #[serde(default)]
    pub reset_trigger: Option<f64>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SignalResetResult {
    /// Whether the value changed and the output was cleared
    pub reset: bool,
    /// Last-seen reset trigger value
    pub reset_trigger: f64,
    /// Drop zone label
    pub status: String,
    #[serde(rename = "ExtractedData")]
    pub extracted_data: String,
}

// ============================================================================
// Response type for get_output
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct GetOutputResult {
    #[serde(rename = "ExtractedData")]
    pub extracted_data: String,
    /// Drop zone label
    pub status: String,
}

fn outcome_name(outcome: DropOutcome) -> &'static str {
    match outcome {
        DropOutcome::Rejected => "rejected",
        DropOutcome::Failed => "failed",
        DropOutcome::Extracted => "extracted",
    }
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfFormServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new PdfFormServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_loader(config, Box::new(PdfiumFormLoader::new()))
    }

    /// Create a new PdfFormServer with a custom form loader
    pub fn with_loader(config: ServerConfig, loader: SharedLoader) -> Self {
        let controller = DropController::new(loader, config.initial_reset_trigger);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        }
    }

    /// Drop a file onto the extractor
    #[tool(
        description = "Drop a file onto the PDF form extractor. Only files typed application/pdf are accepted. On success the form fields are extracted and ExtractedData becomes {\"data\": {<field>: <value>}, \"fields\": [<field>, ...]}.

Values: text, radio and dropdown fields give strings (empty when unset), checkboxes give booleans, list boxes give arrays of selected options, other field types give \"Unsupported field type\".

A failed extraction raises an alert and keeps the previous ExtractedData.

Source format: {\"path\": \"/absolute/path.pdf\"} or {\"base64\": \"...\"}. Base64 sources need mime_type set to \"application/pdf\"."
    )]
    async fn drop_file(&self, Parameters(params): Parameters<DropFileParams>) -> String {
        let result = match self.process_drop(&params).await {
            Ok(result) => result,
            Err(e) => self.failed_drop_result(e).await,
        };

        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Update the reset trigger input
    #[tool(
        description = "Report the current value of the resetTrigger input. When it differs from the last value seen, ExtractedData is cleared and the drop zone returns to its initial prompt. Sending the same value again has no effect. A missing value counts as 0."
    )]
    async fn signal_reset(&self, Parameters(params): Parameters<SignalResetParams>) -> String {
        let result = self.process_signal_reset(&params).await;
        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Read the current output
    #[tool(description = "Read the current ExtractedData output and drop zone status.")]
    async fn get_output(&self) -> String {
        let result = self.process_get_output().await;
        serde_json::to_string_pretty(&result).unwrap_or_default()
    }
}

impl PdfFormServer {
    /// Resolve a drop source. Failures are logged and read as "no file".
    fn resolve_drop(&self, params: &DropFileParams, drop_id: &str) -> Option<DroppedFile> {
        let mime_type = params.mime_type.as_deref();
        let resolved = match &params.source {
            DropSource::Path { path } => self
                .validate_path_access(path)
                .and_then(|path| resolve_path(path, mime_type, self.config.max_drop_bytes)),
            DropSource::Base64 { base64 } => {
                resolve_base64(base64, mime_type, self.config.max_drop_bytes)
            }
        };

        match resolved {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(drop_id, error = %e, "Failed to resolve dropped file");
                None
            }
        }
    }

    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<std::path::PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(std::path::PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| {
            crate::error::Error::PathAccessDenied {
                path: path.to_string(),
            }
        })?;

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical.starts_with(&canonical_dir) {
                    return Ok(canonical);
                }
            }
        }

        Err(crate::error::Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Handle a drop. Drops are serialized: the controller lock is held
    /// until extraction finishes.
    pub async fn process_drop(
        &self,
        params: &DropFileParams,
    ) -> crate::error::Result<DropFileResult> {
        let drop_id = uuid::Uuid::new_v4().to_string();
        let file = self.resolve_drop(params, &drop_id);

        if let Some(ref file) = file {
            tracing::info!(
                drop_id = %drop_id,
                file = %file.name,
                mime_type = %file.mime_type,
                bytes = file.bytes.len(),
                "Processing drop"
            );
        }

        let mut controller = self.controller.clone().lock_owned().await;

        let (outcome, events, status, extracted_data) = tokio::task::spawn_blocking(move || {
            let mut events = EventLog::default();
            let outcome = controller.on_drop(&mut events, file);
            let status = controller.drop_zone().label.clone();
            let extracted_data = controller.output().to_string();
            (outcome, events, status, extracted_data)
        })
        .await
        .map_err(|e| crate::error::Error::Task {
            reason: format!("Task join error: {}", e),
        })?;

        if events.output_changes > 0 {
            tracing::info!(drop_id = %drop_id, "ExtractedData changed");
        }

        Ok(DropFileResult {
            drop_id,
            outcome: outcome_name(outcome).to_string(),
            output_changed: events.output_changes > 0,
            alerts: events.alerts.into_iter().map(AlertInfo::from).collect(),
            status,
            extracted_data,
            error: None,
        })
    }

    /// Result for a drop that never reached the controller. The reported
    /// output and status are the controller's current ones, which the drop
    /// left untouched.
    async fn failed_drop_result(&self, error: crate::error::Error) -> DropFileResult {
        tracing::warn!(error = %error, "drop_file failed");
        let current = self.process_get_output().await;
        DropFileResult {
            drop_id: String::new(),
            outcome: outcome_name(DropOutcome::Failed).to_string(),
            output_changed: false,
            alerts: vec![],
            status: current.status,
            extracted_data: current.extracted_data,
            error: Some(error.client_message()),
        }
    }

    pub async fn process_signal_reset(&self, params: &SignalResetParams) -> SignalResetResult {
        let mut controller = self.controller.lock().await;
        let mut events = EventLog::default();
        let reset = controller.on_reset_signal(&mut events, params.reset_trigger);

        if reset {
            tracing::info!(
                reset_trigger = controller.state().reset_trigger,
                "ExtractedData cleared"
            );
        }

        SignalResetResult {
            reset,
            reset_trigger: controller.state().reset_trigger,
            status: controller.drop_zone().label.clone(),
            extracted_data: controller.output().to_string(),
        }
    }

    pub async fn process_get_output(&self) -> GetOutputResult {
        let controller = self.controller.lock().await;
        GetOutputResult {
            extracted_data: controller.output().to_string(),
            status: controller.drop_zone().label.clone(),
        }
    }
}

impl Default for PdfFormServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for PdfFormServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF form extractor: drop a PDF form with drop_file, read the extracted \
                 field values with get_output, and clear them by changing the value sent \
                 to signal_reset."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with default configuration
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = PdfFormServer::with_config(config);

    tracing::info!("PDF form extractor ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
