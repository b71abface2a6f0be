//! Tracing setup for the snip CLI.
//!
//! Logs always go to stderr: stdout carries restored snippet content and
//! robot-mode JSON.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// JSON lines, for robot mode.
    Json,
    /// Colored output on an interactive terminal.
    Pretty,
    /// Compact uncolored output when stderr is piped or redirected.
    Plain,
}

impl LogStyle {
    pub fn detect(robot_mode: bool) -> Self {
        if robot_mode {
            Self::Json
        } else if io::stderr().is_terminal() {
            Self::Pretty
        } else {
            Self::Plain
        }
    }
}

/// Default filter directive for the given verbosity flags.
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "snip=error";
    }
    match verbose {
        0 => "snip=warn",
        1 => "snip=info",
        2 => "snip=debug",
        _ => "snip=trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the directive derived from `-v`/`-q`. Calling this
/// more than once keeps the first subscriber.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let base = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match LogStyle::detect(robot_mode) {
        LogStyle::Json => base.json().with_target(true).boxed(),
        LogStyle::Pretty => base.with_target(false).boxed(),
        LogStyle::Plain => base.with_ansi(false).with_target(false).compact().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
}
