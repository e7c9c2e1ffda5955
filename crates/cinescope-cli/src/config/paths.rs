//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory name under the config home.
const APP_DIR: &str = "cinescope";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// Lookup order:
/// 1. `{dir}/config.toml` when `--dir` is given
/// 2. `$XDG_CONFIG_HOME/cinescope/config.toml`
/// 3. `~/.config/cinescope/config.toml`
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

fn config_path_from(
    dir: Option<&Path>,
    xdg: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    // An empty XDG_CONFIG_HOME counts as unset.
    if let Some(x) = xdg.filter(|x| !x.as_os_str().is_empty()) {
        return Ok(x.join(APP_DIR).join(CONFIG_FILE));
    }
    match home {
        Some(h) => Ok(h.join(".config").join(APP_DIR).join(CONFIG_FILE)),
        None => bail!("cannot locate config directory: HOME is not set (use --dir)"),
    }
}
