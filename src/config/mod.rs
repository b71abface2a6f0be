//! Configuration for the snippet store.
//!
//! Settings come from a TOML file (default `~/.config/snip/config.toml`).
//! Command-line flags and environment variables override the file.

mod path;
mod settings;

pub use path::{default_config_path, default_snippets_dir, home_dir, resolve_path};
pub use settings::{
    DEFAULT_PREVIEW_CHARS, SnipConfig, load_config, load_config_from_str, save_config,
};
