//! User settings file.
//!
//! ```toml
//! # ~/.config/snip/config.toml
//! snippets_dir = "~/Documents/snippets"
//! preview_chars = 80
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::path::{default_config_path, default_snippets_dir, resolve_path};
use crate::error::{Result, SnipError};

/// Default width of one-line previews in listings.
pub const DEFAULT_PREVIEW_CHARS: usize = 60;

const fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnipConfig {
    /// Directory holding snippet records. Relative paths are resolved against
    /// the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets_dir: Option<PathBuf>,

    /// Characters shown in one-line previews.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// File this configuration was read from.
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Default for SnipConfig {
    fn default() -> Self {
        Self {
            snippets_dir: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            source: None,
        }
    }
}

impl SnipConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present and built-in defaults otherwise.
    #[instrument(skip_all, fields(explicit = explicit.is_some()))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return load_config(path);
        }
        let path = default_config_path()?;
        if path.exists() {
            load_config(&path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Override the snippets directory, e.g. from a command-line flag.
    #[must_use]
    pub fn with_snippets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snippets_dir = Some(dir.into());
        self
    }

    /// File this configuration came from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Resolved snippets directory.
    pub fn snippets_dir(&self) -> Result<PathBuf> {
        let Some(dir) = &self.snippets_dir else {
            return default_snippets_dir();
        };
        let base = match self.source.as_deref().and_then(Path::parent) {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        resolve_path(dir, &base)
    }

    fn validate(&self) -> Result<()> {
        if self.preview_chars == 0 {
            return Err(SnipError::ConfigParse(
                "preview_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a configuration file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<SnipConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SnipError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            SnipError::Io(e)
        }
    })?;
    trace!(bytes = content.len(), "Read config file");

    let mut config = load_config_from_str(&content)?;
    config.source = Some(path.to_path_buf());
    info!(snippets_dir = ?config.snippets_dir, "Configuration loaded");
    Ok(config)
}

/// Parse a configuration from TOML text.
pub fn load_config_from_str(content: &str) -> Result<SnipConfig> {
    let config: SnipConfig =
        toml::from_str(content).map_err(|e| SnipError::ConfigParse(format!("TOML: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Write a configuration file, creating parent directories.
#[instrument(skip(config), fields(path = %path.display()))]
pub fn save_config(config: &SnipConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| SnipError::ConfigParse(format!("TOML: {e}")))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    info!("Configuration saved");
    Ok(())
}
