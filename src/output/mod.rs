//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;

use crate::cli::Cli;
use crate::content::{ContentSummary, FormatKind};
use crate::error::SnipError;
use crate::store::{RecordFailure, SavedRecord};
use crate::theme::SnipTheme;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

// === Result Types ===

/// One row of a snippet listing.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetListing {
    pub name: String,
    #[serde(flatten)]
    pub summary: ContentSummary,
}

/// Full description of one snippet.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetDetail {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub summary: ContentSummary,
    /// Multi-line description, as printed for humans.
    pub description: String,
}

/// What a restore produced.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub name: String,
    pub kind: FormatKind,
    pub format_label: String,
    /// Text content, when printed rather than written to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// File list, when printed rather than written to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// File the content was written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub bytes: usize,
}

/// Effective configuration, for `snip config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub snippets_dir: String,
    pub preview_chars: usize,
}

/// Build metadata for `snip version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(SnipTheme),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            if cli.no_color {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            Self::Human(SnipTheme::default())
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(theme) => Box::new(HumanOutput::new(theme)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &SnipError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Snippet operations
    fn snippet_saved(&self, name: &str, summary: &ContentSummary, record: &SavedRecord);
    fn snippet_list(&self, listings: &[SnippetListing], filter: Option<&str>);
    fn snippet_detail(&self, detail: &SnippetDetail);
    fn restored(&self, result: &RestoreResult);
    fn snippet_removed(&self, name: &str, file: Option<&Path>);

    /// Records that failed during a bulk load or save.
    fn record_failures(&self, failures: &[RecordFailure]);

    // Configuration
    fn config_info(&self, view: &ConfigView);
    fn config_path(&self, path: &Path, exists: bool);
    fn config_written(&self, path: &Path);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
