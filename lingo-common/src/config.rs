//! Configuration loading and root folder resolution
//!
//! The root folder holds everything the trainer persists: the SQLite
//! database and the classifier snapshot.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "LINGO_ROOT";

/// Environment variable overriding the trainer HTTP port
pub const PORT_ENV_VAR: &str = "LINGO_TR_PORT";

/// Compiled default port for lingo-tr
pub const DEFAULT_TR_PORT: u16 = 6230;

/// Resolve the root folder in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `LINGO_ROOT` environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the trainer listen port from `LINGO_TR_PORT`, falling back
/// to the compiled default
pub fn resolve_port() -> u16 {
    std::env::var(PORT_ENV_VAR)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TR_PORT)
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
    }
    Ok(())
}

/// Path of the shared SQLite database inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("lingo.db")
}

/// Path of the classifier snapshot inside the root folder
pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join("classifier.json")
}

/// Locate the platform config file (`<config dir>/lingo/config.toml`)
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("lingo").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    if user_config.exists() {
        return Ok(user_config);
    }

    // System-wide fallback on Linux
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/lingo/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!(
        "Config file not found: {:?}",
        user_config
    )))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("lingo"))
        .unwrap_or_else(|| PathBuf::from("./lingo_data"))
}
