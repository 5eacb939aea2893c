//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional TOML configuration file contents
///
/// All fields are optional; absent fields fall back to the next
/// resolution tier (environment variable or compiled default).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database and media store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<String>,
    /// Gemini API key (lowest-priority source; database wins)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    /// HTTP listen port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Load the TOML config file if one exists, otherwise return defaults
    pub fn load() -> Self {
        match config_file_path() {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<TomlConfig>(&content) {
                    Ok(config) => {
                        tracing::debug!("Loaded config file: {}", path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                        TomlConfig::default()
                    }
                },
                Err(_) => TomlConfig::default(),
            },
            Err(_) => TomlConfig::default(),
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Ensure the root folder exists and return the database path inside it
pub fn prepare_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Failed to create root folder {}: {}", root.display(), e)))?;
    Ok(root.join("bagtag.db"))
}

/// Path of the media directory inside the root folder
pub fn media_folder(root: &Path) -> PathBuf {
    root.join("media")
}

/// Get default configuration file path for the platform
pub fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("bagtag").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/bagtag/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("bagtag"))
        .unwrap_or_else(|| PathBuf::from("./bagtag_data"))
}
