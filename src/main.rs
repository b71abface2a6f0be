//! snip - save clipboard-style content under a name and restore it later.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use snip::cli::{self, Cli, CliSource, Commands};
use snip::config::{self as snip_config, SnipConfig};
use snip::content::{ContentVariant, Payload};
use snip::error::{Result, SnipError};
use snip::image_ops;
use snip::logging::init_logging;
use snip::output::{
    ConfigView, Output, OutputMode, RestoreResult, SnippetDetail, SnippetListing, VersionInfo,
};
use snip::store::SnippetStore;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> bool {
        matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"))
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();

    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Save(args)) => cmd_save(cli, out, args),
        Some(Commands::List(args)) => cmd_list(cli, out, args),
        Some(Commands::Show(args)) => cmd_show(cli, out, args),
        Some(Commands::Restore(args)) => cmd_restore(cli, out, args),
        Some(Commands::Remove(args)) => cmd_remove(cli, out, args),
        Some(Commands::Config(args)) => cmd_config(cli, out, args),
        Some(Commands::Version) => cmd_version(out),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    commands: QuickStartCommands,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct QuickStartCommands {
    save_text: &'static str,
    save_stdin: &'static str,
    save_files: &'static str,
    save_image: &'static str,
    list: &'static str,
    show: &'static str,
    restore: &'static str,
    remove: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "snip",
            version: build_info::VERSION,
            description: "Save text, file lists, images and audio by name and restore them later",
            commands: QuickStartCommands {
                save_text: "snip save <NAME> --text <TEXT> [--text-kind plain|unicode|rtf|html]",
                save_stdin: "snip save <NAME> --stdin",
                save_files: "snip save <NAME> --files <PATH>...",
                save_image: "snip save <NAME> --image <PATH>",
                list: "snip list [FILTER] --robot",
                show: "snip show <NAME> --robot",
                restore: "snip restore <NAME> [--output <PATH>]",
                remove: "snip remove <NAME>",
            },
            output_modes: OutputModes {
                human: "--format=text (default)",
                robot: "--robot or --format=json",
                compact: "--format=json-compact",
            },
        };
        output_json(cli, &help);
        return Ok(());
    }

    println!(
        "{} {} - named clipboard snippets\n",
        style("snip").bold().cyan(),
        build_info::VERSION
    );
    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  Save text", style("snip save greeting --text hello").green());
    println!("  {}  Save piped text", style("git diff | snip save patch --stdin").green());
    println!("  {}  Save an image", style("snip save logo --image logo.png").green());
    println!("  {}  List snippets", style("snip list").green());
    println!("  {}  Print text back", style("snip restore greeting").green());
    println!();
    println!("{}", style("ROBOT MODE").bold().underlined());
    println!();
    println!("  {}  JSON output", style("snip --robot <command>").cyan());
    println!();
    println!("Run {} for full help", style("snip --help").yellow());
    Ok(())
}

// === Store Helpers ===

fn effective_config(cli: &Cli) -> Result<SnipConfig> {
    let config = SnipConfig::load(cli.config.as_deref())?;
    match &cli.dir {
        Some(dir) => Ok(config.with_snippets_dir(std::path::absolute(dir)?)),
        None => Ok(config),
    }
}

/// Open the configured store and load it, reporting unreadable records.
fn open_store(config: &SnipConfig, out: &dyn Output) -> Result<SnippetStore> {
    let mut store = SnippetStore::open(config)?;
    let report = store.load()?;
    out.record_failures(&report.failures);
    debug!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        "Store ready"
    );
    Ok(store)
}

fn find<'a>(store: &'a SnippetStore, name: &str) -> Result<(&'a str, &'a ContentVariant)> {
    store.entry(name).ok_or_else(|| SnipError::SnippetNotFound {
        name: name.to_string(),
    })
}

fn required_output<'a>(output: Option<&'a Path>, kind: &str) -> Result<&'a Path> {
    output.ok_or_else(|| SnipError::OutputRequired {
        kind: kind.to_string(),
    })
}

// === Commands ===

fn cmd_save(cli: &Cli, out: &dyn Output, args: &cli::SaveArgs) -> Result<()> {
    let config = effective_config(cli)?;
    let mut store = open_store(&config, out)?;

    let mut source = CliSource::from_args(args)?;
    store.create_from_source(&args.name, &mut source)?;

    let mut report = store.save()?;
    let key = args.name.trim().to_lowercase();
    if let Some(i) = report
        .failures
        .iter()
        .position(|f| f.name.to_lowercase() == key)
    {
        let failure = report.failures.swap_remove(i);
        out.record_failures(&report.failures);
        return Err(failure.error);
    }
    out.record_failures(&report.failures);

    let (name, variant) = find(&store, &args.name)?;
    let record = report
        .written
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| SnipError::Other(format!("'{name}' was not written")))?;
    info!(name, bytes = record.bytes, "Snippet saved");
    out.snippet_saved(name, &variant.summary(config.preview_chars), record);
    Ok(())
}

fn cmd_list(cli: &Cli, out: &dyn Output, args: &cli::ListArgs) -> Result<()> {
    let config = effective_config(cli)?;
    let store = open_store(&config, out)?;

    let entries = match &args.filter {
        Some(query) => store.filter(query),
        None => store.iter().collect(),
    };
    let listings: Vec<SnippetListing> = entries
        .into_iter()
        .map(|(name, variant)| SnippetListing {
            name: name.to_string(),
            summary: variant.summary(config.preview_chars),
        })
        .collect();

    out.snippet_list(&listings, args.filter.as_deref());
    Ok(())
}

fn cmd_show(cli: &Cli, out: &dyn Output, args: &cli::ShowArgs) -> Result<()> {
    let config = effective_config(cli)?;
    let store = open_store(&config, out)?;
    let (name, variant) = find(&store, &args.name)?;

    let detail = SnippetDetail {
        name: name.to_string(),
        path: store.file_path(name).display().to_string(),
        summary: variant.summary(config.preview_chars),
        description: variant.to_string(),
    };
    out.snippet_detail(&detail);
    Ok(())
}

fn cmd_restore(cli: &Cli, out: &dyn Output, args: &cli::RestoreArgs) -> Result<()> {
    let config = effective_config(cli)?;
    let store = open_store(&config, out)?;
    let (name, variant) = find(&store, &args.name)?;
    let content = variant.materialize()?;

    let mut result = RestoreResult {
        name: name.to_string(),
        kind: content.kind(),
        format_label: content.format_label.to_string(),
        text: None,
        files: None,
        output: args.output.as_ref().map(|p| p.display().to_string()),
        bytes: 0,
    };

    match content.payload {
        Payload::Text { text, .. } => {
            result.bytes = text.len();
            match &args.output {
                Some(path) => fs::write(path, text)?,
                None => result.text = Some(text.clone()),
            }
        }
        Payload::FileList(paths) => {
            let listing = paths.join("\n") + "\n";
            result.bytes = listing.len();
            match &args.output {
                Some(path) => fs::write(path, listing)?,
                None => result.files = Some(paths.clone()),
            }
        }
        Payload::Image(image) => {
            let path = required_output(args.output.as_deref(), "image")?;
            image_ops::save_png(image.bitmap(), path)?;
            result.bytes = usize::try_from(fs::metadata(path)?.len()).unwrap_or(usize::MAX);
        }
        Payload::Audio(clip) => {
            let path = required_output(args.output.as_deref(), "audio")?;
            fs::write(path, clip.bytes())?;
            result.bytes = clip.len();
        }
    }

    out.restored(&result);
    Ok(())
}

fn cmd_remove(cli: &Cli, out: &dyn Output, args: &cli::RemoveArgs) -> Result<()> {
    let config = effective_config(cli)?;
    let mut store = open_store(&config, out)?;

    if !store.remove(&args.name) {
        return Err(SnipError::SnippetNotFound {
            name: args.name.clone(),
        });
    }
    let report = store.save()?;
    out.record_failures(&report.failures);
    out.snippet_removed(&args.name, report.removed.first().map(PathBuf::as_path));
    Ok(())
}

fn cmd_config(cli: &Cli, out: &dyn Output, args: &cli::ConfigArgs) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => snip_config::default_config_path()?,
    };
    let exists = path.exists();

    if args.path {
        out.config_path(&path, exists);
        return Ok(());
    }

    if args.init {
        if exists && !args.force {
            return Err(SnipError::Other(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }
        let config = match &cli.dir {
            Some(dir) => SnipConfig::default().with_snippets_dir(std::path::absolute(dir)?),
            None => SnipConfig::default(),
        };
        snip_config::save_config(&config, &path)?;
        out.config_written(&path);
        return Ok(());
    }

    let config = effective_config(cli)?;
    let view = ConfigView {
        config_file: Some(path.display().to_string()),
        config_file_exists: exists,
        snippets_dir: config.snippets_dir()?.display().to_string(),
        preview_chars: config.preview_chars,
    };
    out.config_info(&view);
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(out: &dyn Output) -> Result<()> {
    out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "snip", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
