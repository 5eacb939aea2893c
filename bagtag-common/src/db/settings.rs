//! Settings database operations
//!
//! Key-value accessors over the settings table. The database is the
//! authoritative store for runtime-configurable values such as the
//! Gemini API key.

use crate::{Error, Result};
use sqlx::SqlitePool;

/// Get Gemini API key from database
///
/// Returns Some(key) if configured, None if not set
pub async fn get_gemini_api_key(db: &SqlitePool) -> Result<Option<String>> {
    get_setting::<String>(db, "gemini_api_key").await
}

/// Set Gemini API key in database
pub async fn set_gemini_api_key(db: &SqlitePool, key: String) -> Result<()> {
    set_setting(db, "gemini_api_key", key).await
}

/// Generic setting getter
pub async fn get_setting<T>(db: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (UPSERT)
pub async fn set_setting<T>(db: &SqlitePool, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
