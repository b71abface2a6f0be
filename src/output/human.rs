//! Human-friendly terminal output.

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::content::{ContentSummary, FormatKind};
use crate::error::SnipError;
use crate::store::{RecordFailure, SavedRecord};
use crate::theme::SnipTheme;

use super::{ConfigView, Output, RestoreResult, SnippetDetail, SnippetListing, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: SnipTheme,
}

impl HumanOutput {
    #[instrument(skip(theme))]
    pub fn new(theme: SnipTheme) -> Self {
        debug!("Creating HumanOutput");
        Self { theme }
    }

    fn size_text(summary: &ContentSummary) -> String {
        match (summary.kind, summary.width, summary.height) {
            (FormatKind::Image, Some(w), Some(h)) => format!("{w}x{h}"),
            _ => format_bytes(summary.size_bytes),
        }
    }

    fn label(&self, name: &str) -> String {
        self.theme.label.apply_to(format!("  {name:<10}")).to_string()
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        println!("{}{message}", self.theme.success.apply_to("[OK] "));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &SnipError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!(
            "{} {}",
            self.theme.error.apply_to("Error:").for_stderr(),
            error
        );
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!(
                "{} {}",
                self.theme.warning.apply_to("Hint:").for_stderr(),
                suggestion
            );
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        eprintln!("{}{message}", self.theme.warning.apply_to("[WARN] ").for_stderr());
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        println!("{}{message}", self.theme.accent.apply_to("[INFO] "));
    }

    #[instrument(skip(self, summary, record))]
    fn snippet_saved(&self, name: &str, summary: &ContentSummary, record: &SavedRecord) {
        self.success(&format!(
            "Saved {} as {} ({})",
            self.theme.kind(summary.kind).apply_to(summary.kind),
            self.theme.name.apply_to(name),
            format_bytes(record.bytes as u64)
        ));
    }

    #[instrument(skip(self, listings), fields(count = listings.len()))]
    fn snippet_list(&self, listings: &[SnippetListing], filter: Option<&str>) {
        if listings.is_empty() {
            match filter {
                Some(query) => self.warning(&format!("No snippets match '{query}'")),
                None => self.info("No snippets saved yet. Try: snip save <NAME> --text <TEXT>"),
            }
            return;
        }

        let name_width = listings.iter().map(|l| l.name.chars().count()).max().unwrap_or(0);
        for listing in listings {
            let summary = &listing.summary;
            let preview = summary.preview.as_deref().unwrap_or("");
            println!(
                "  {}  {}  {}  {}",
                self.theme.name.apply_to(format!("{:<name_width$}", listing.name)),
                self.theme.kind(summary.kind).apply_to(format!("{:<8}", summary.kind)),
                self.theme.muted.apply_to(format!("{:>9}", Self::size_text(summary))),
                preview
            );
        }
    }

    #[instrument(skip(self, detail), fields(name = %detail.name))]
    fn snippet_detail(&self, detail: &SnippetDetail) {
        let summary = &detail.summary;
        println!("{}", self.theme.header.apply_to(&detail.name));
        println!("{}{}", self.label("Kind"), self.theme.kind(summary.kind).apply_to(summary.kind));
        println!("{}{}", self.label("Format"), self.theme.value.apply_to(&summary.format_label));
        if let Some(sub_kind) = summary.text_sub_kind {
            println!("{}{sub_kind}", self.label("Text"));
        }
        println!("{}{}", self.label("Size"), Self::size_text(summary));
        println!("{}{}", self.label("File"), self.theme.muted.apply_to(&detail.path));
        println!();
        println!("{}", detail.description);
    }

    #[instrument(skip(self, result), fields(name = %result.name, kind = %result.kind))]
    fn restored(&self, result: &RestoreResult) {
        if let Some(path) = &result.output {
            self.success(&format!(
                "Restored {} to {path} ({})",
                self.theme.name.apply_to(&result.name),
                format_bytes(result.bytes as u64)
            ));
            return;
        }
        // Text is written byte-exact, without a trailing newline of our own.
        if let Some(text) = &result.text {
            print!("{text}");
            let _ = io::stdout().flush();
        }
        if let Some(files) = &result.files {
            for file in files {
                println!("{file}");
            }
        }
    }

    #[instrument(skip(self, file))]
    fn snippet_removed(&self, name: &str, file: Option<&Path>) {
        let mut message = format!("Removed {}", self.theme.name.apply_to(name));
        if let Some(path) = file {
            message.push_str(&format!(" (deleted {})", path.display()));
        }
        self.success(&message);
    }

    #[instrument(skip(self, failures), fields(count = failures.len()))]
    fn record_failures(&self, failures: &[RecordFailure]) {
        for failure in failures {
            self.warning(&format!(
                "{}: {}",
                failure.path.display(),
                failure.error
            ));
        }
    }

    #[instrument(skip(self, view))]
    fn config_info(&self, view: &ConfigView) {
        println!("{}", self.theme.header.apply_to("Configuration"));
        let file = match &view.config_file {
            Some(path) if view.config_file_exists => path.clone(),
            Some(path) => format!("{path} (not created)"),
            None => "(none)".to_string(),
        };
        println!("{}{}", self.label("File"), self.theme.muted.apply_to(file));
        println!("{}{}", self.label("Snippets"), self.theme.value.apply_to(&view.snippets_dir));
        println!("{}{}", self.label("Preview"), view.preview_chars);
    }

    #[instrument(skip(self))]
    fn config_path(&self, path: &Path, _exists: bool) {
        println!("{}", path.display());
    }

    #[instrument(skip(self))]
    fn config_written(&self, path: &Path) {
        self.success(&format!("Wrote {}", path.display()));
    }

    #[instrument(skip(self, info))]
    fn version_info(&self, info: &VersionInfo) {
        println!(
            "{} {}",
            self.theme.name.apply_to("snip"),
            self.theme.value.apply_to(info.version)
        );
        let dirty = if info.git_dirty {
            self.theme.warning.apply_to(" (dirty)").to_string()
        } else {
            String::new()
        };
        println!("{}{}{dirty}", self.label("Git SHA"), info.git_sha);
        println!("{}{}", self.label("Built"), self.theme.muted.apply_to(info.build_timestamp));
        println!("{}{}", self.label("Rust"), self.theme.muted.apply_to(info.rustc_version));
        println!("{}{}", self.label("Target"), self.theme.muted.apply_to(info.target));
    }
}
