//! Locations of config, input and output files
//!
//! User-supplied paths may use `~` and `$VARS`; relative paths are taken from
//! the current directory. The config file lives under the XDG config home.

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};
use std::path::PathBuf;

const APP_DIR: &str = "openchj";
const CONFIG_FILE: &str = "config.toml";

/// Expand `~` and environment variables
pub fn expand_home(path: &str) -> Result<PathBuf> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| anyhow!("Cannot expand '{}': {}", path, e))
}

/// Expand `path` and anchor it at the current directory when relative
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(&expanded))
        .map_err(|e| anyhow!("Cannot resolve '{}' against the current directory: {}", path, e))
}

/// `$XDG_CONFIG_HOME/openchj`, else `~/.config/openchj`
pub fn get_config_dir() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join(APP_DIR)
}

pub fn get_default_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

/// Where results go when no output directory is configured
///
/// The Downloads directory if it exists, else home, else the current directory.
pub fn get_default_output_dir() -> PathBuf {
    let Some(dirs) = UserDirs::new() else {
        return PathBuf::from(".");
    };
    dirs.download_dir()
        .filter(|d| d.is_dir())
        .unwrap_or_else(|| dirs.home_dir())
        .to_path_buf()
}
