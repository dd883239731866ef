//! Config file resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `explicit` is `Some`, returns it unchanged.
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/tvhgate/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when both
/// `explicit` and `dir` are `None`).
pub fn resolve_config_path(explicit: Option<&Path>, dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("tvhgate")
        .join("config.toml"))
}
