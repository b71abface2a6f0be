//! Path resolution helpers for configured directories.
//!
//! Supports absolute paths, paths relative to the config file, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, SnipError};

/// Resolve a path from a config file.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved against `base_dir`
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        base_dir = %base_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let resolved = match path_str.strip_prefix("~/") {
            Some(rest) if !rest.is_empty() => home.join(rest),
            _ => home,
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let resolved = base_dir.join(path);
    debug!(
        original = %path.display(),
        resolved = %resolved.display(),
        "Resolved relative path"
    );
    Ok(resolved)
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| SnipError::Other("Could not determine home directory".to_string()))
}

/// Default config file location.
///
/// Location: `~/.config/snip/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| SnipError::Other("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("snip").join("config.toml"))
}

/// Default snippets directory.
///
/// Location: `~/.local/share/snip/snippets/`
pub fn default_snippets_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        SnipError::Other("Could not determine local data directory".to_string())
    })?;
    Ok(data_dir.join("snip").join("snippets"))
}
