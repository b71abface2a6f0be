//! CLI argument definitions and command dispatch.

mod source;

use clap::{ArgAction, ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::content::TextSubKind;

pub use source::{CaptureInput, CliSource};

/// snip - save text, file lists, images and audio under a name and restore
/// them later.
///
/// Robot Mode: Use --robot or --format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "snip", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "SNIP_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR accepts any non-empty value)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Snippets directory (overrides the config file)
    #[arg(long, global = true, env = "SNIP_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "SNIP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Snippets ===
    /// Capture content and save it under a name
    Save(SaveArgs),

    /// List saved snippets
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Describe a saved snippet
    Show(ShowArgs),

    /// Put a saved snippet's content back out
    Restore(RestoreArgs),

    /// Delete a saved snippet
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    // === Configuration ===
    /// Show current configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

/// Arguments for capturing a snippet.
///
/// # Examples
///
/// ```bash
/// snip save greeting --text "hello"
/// git diff | snip save patch --stdin
/// snip save page --text "<b>hi</b>" --text-kind html
/// snip save docs --files a.txt b.txt
/// snip save logo --image logo.png
/// ```
#[derive(Parser, Debug)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["text", "stdin", "files", "image", "audio"])
))]
pub struct SaveArgs {
    /// Snippet name
    pub name: String,

    /// Text content
    #[arg(long, short = 't', value_name = "TEXT")]
    pub text: Option<String>,

    /// Read text content from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Save a list of file paths
    #[arg(long, num_args = 1.., value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Save an image (any format the image decoder reads)
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Save raw audio bytes from a file
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Flavor of the text content
    #[arg(long, value_enum)]
    pub text_kind: Option<TextSubKind>,

    /// Format label to record instead of the default for the content kind
    #[arg(long, value_name = "FORMAT")]
    pub label: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show snippets whose name contains this text (case-insensitive)
    pub filter: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Snippet name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Snippet name
    pub name: String,

    /// Write the content to this file (required for images and audio)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Snippet name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path
    #[arg(long)]
    pub path: bool,

    /// Write a config file with the effective settings
    #[arg(long, conflicts_with = "path")]
    pub init: bool,

    /// Overwrite an existing config file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
