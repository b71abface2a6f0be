//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::content::ContentSummary;
use crate::error::SnipError;
use crate::store::{RecordFailure, SavedRecord};

use super::{
    ConfigView, Output, RestoreResult, RobotFormat, SnippetDetail, SnippetListing, VersionInfo,
};

/// JSON output implementation for AI agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> Option<String> {
        let json = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match json {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                Some(json)
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize output");
                None
            }
        }
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data) {
            println!("{json}");
        }
    }

    /// Output JSON to stderr.
    fn output_json_stderr<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data) {
            eprintln!("{json}");
        }
    }
}

/// Error payload written to stderr.
pub fn error_json(error: &SnipError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &SnipError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&error_json(error));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        self.output_json_stderr(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip(self, summary, record))]
    fn snippet_saved(&self, name: &str, summary: &ContentSummary, record: &SavedRecord) {
        debug!("Robot: snippet_saved");
        self.output_json(&serde_json::json!({
            "saved": name,
            "ok": true,
            "path": record.path.display().to_string(),
            "bytes": record.bytes,
            "snippet": summary,
        }));
    }

    #[instrument(skip(self, listings), fields(count = listings.len()))]
    fn snippet_list(&self, listings: &[SnippetListing], _filter: Option<&str>) {
        debug!("Robot: snippet_list");
        self.output_json(listings);
    }

    #[instrument(skip(self, detail), fields(name = %detail.name))]
    fn snippet_detail(&self, detail: &SnippetDetail) {
        debug!("Robot: snippet_detail");
        self.output_json(detail);
    }

    #[instrument(skip(self, result), fields(name = %result.name, kind = %result.kind))]
    fn restored(&self, result: &RestoreResult) {
        debug!("Robot: restored");
        self.output_json(result);
    }

    #[instrument(skip(self, file))]
    fn snippet_removed(&self, name: &str, file: Option<&Path>) {
        debug!("Robot: snippet_removed");
        self.output_json(&serde_json::json!({
            "removed": name,
            "ok": true,
            "file": file.map(|p| p.display().to_string()),
        }));
    }

    #[instrument(skip(self, failures), fields(count = failures.len()))]
    fn record_failures(&self, failures: &[RecordFailure]) {
        if failures.is_empty() {
            return;
        }
        self.output_json_stderr(&serde_json::json!({
            "warning": true,
            "message": format!("{} snippet record(s) could not be processed", failures.len()),
            "failures": failures,
        }));
    }

    #[instrument(skip(self, view))]
    fn config_info(&self, view: &ConfigView) {
        self.output_json(view);
    }

    #[instrument(skip(self))]
    fn config_path(&self, path: &Path, exists: bool) {
        self.output_json(&serde_json::json!({
            "config_file": path.display().to_string(),
            "exists": exists,
        }));
    }

    #[instrument(skip(self))]
    fn config_written(&self, path: &Path) {
        self.output_json(&serde_json::json!({
            "config_file": path.display().to_string(),
            "written": true,
        }));
    }

    #[instrument(skip(self, info))]
    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
