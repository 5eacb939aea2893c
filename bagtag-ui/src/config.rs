//! Gemini API key resolution
//!
//! Multi-tier resolution with Database → ENV → TOML priority. The
//! database is authoritative (settable from the API); the environment
//! variable and TOML file are fallbacks for first-run setup.

use bagtag_common::config::TomlConfig;
use bagtag_common::{db, Error, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable consulted as the second resolution tier
pub const GEMINI_KEY_ENV_VAR: &str = "BAGTAG_GEMINI_API_KEY";

/// Resolve the Gemini API key from 3-tier configuration
///
/// Priority: Database → ENV → TOML
pub async fn resolve_gemini_api_key(db: &SqlitePool, toml_config: &TomlConfig) -> Result<String> {
    let db_key = db::settings::get_gemini_api_key(db).await?;
    let env_key = std::env::var(GEMINI_KEY_ENV_VAR).ok();
    let toml_key = toml_config.gemini_api_key.clone();

    let sources: Vec<&str> = [
        db_key.as_deref().map(|_| "database"),
        env_key.as_deref().map(|_| "environment"),
        toml_key.as_deref().map(|_| "TOML"),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using database (highest priority).",
            sources.join(", ")
        );
    }

    for (key, source) in [
        (db_key, "database"),
        (env_key, "environment variable"),
        (toml_key, "TOML config"),
    ] {
        if let Some(key) = key {
            if is_valid_key(&key) {
                info!("Gemini API key loaded from {}", source);
                return Ok(key);
            }
        }
    }

    Err(Error::Config(format!(
        "Gemini API key not configured. Configure using one of:\n\
         1. API: POST /api/settings/gemini_api_key\n\
         2. Environment: {}=your-key-here\n\
         3. TOML config: ~/.config/bagtag/config.toml (gemini_api_key = \"your-key\")",
        GEMINI_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Default TOML path used for best-effort write-back
///
/// Must be the same file [`bagtag_common::config::config_file_path`]
/// reads, so a synced key is picked up on the next start.
pub fn toml_write_back_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("bagtag").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("bagtag.toml"))
}

/// Sync the Gemini key to the TOML file (best-effort backup)
///
/// The database write has already succeeded by the time this runs;
/// failures here degrade gracefully to a warning.
pub fn sync_key_to_toml(key: &str, toml_path: &Path) {
    let result = (|| -> Result<()> {
        let mut config: TomlConfig = if toml_path.exists() {
            let content = std::fs::read_to_string(toml_path)
                .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?
        } else {
            TomlConfig::default()
        };

        config.gemini_api_key = Some(key.to_string());

        if let Some(parent) = toml_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Create config dir failed: {}", e)))?;
        }
        let serialized = toml::to_string(&config)
            .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
        std::fs::write(toml_path, serialized)
            .map_err(|e| Error::Config(format!("Write TOML failed: {}", e)))?;
        Ok(())
    })();

    match result {
        Ok(()) => info!("Settings synced to TOML: {}", toml_path.display()),
        Err(e) => warn!("TOML sync failed (database write succeeded): {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_back_path_matches_the_loader() {
        // The loader reads dirs::config_dir()/bagtag/config.toml; the
        // write-back must target the same file on every platform.
        if let Some(config_dir) = dirs::config_dir() {
            assert_eq!(
                toml_write_back_path(),
                config_dir.join("bagtag").join("config.toml")
            );
        }
    }

    #[test]
    fn key_validation() {
        assert!(is_valid_key("AIza-something"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn toml_sync_writes_and_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "root_folder = \"/data/bagtag\"\nport = 9000\n").unwrap();

        sync_key_to_toml("my-key", &path);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: TomlConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.gemini_api_key.as_deref(), Some("my-key"));
        assert_eq!(parsed.root_folder.as_deref(), Some("/data/bagtag"));
        assert_eq!(parsed.port, Some(9000));
    }
}
