//! Session token database operations
//!
//! Bearer tokens issued at login and deleted at logout. Tokens are random
//! 48-character alphanumeric strings; the token itself is the primary key.

use crate::{Error, Result};
use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Token length in characters
const TOKEN_LEN: usize = 48;

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Create a session for a user, returning the bearer token
pub async fn create_session(db: &SqlitePool, user_id: Uuid) -> Result<String> {
    let token = generate_token();

    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(db)
        .await?;

    Ok(token)
}

/// Resolve a bearer token to its user id
pub async fn user_for_token(db: &SqlitePool, token: &str) -> Result<Uuid> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT user_id FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(db)
            .await?;

    match row {
        Some((user_id,)) => user_id
            .parse::<Uuid>()
            .map_err(|e| Error::Internal(format!("Corrupt user_id in sessions table: {}", e))),
        None => Err(Error::Unauthorized("Invalid or expired session".to_string())),
    }
}

/// Invalidate a session token (logout); unknown tokens are a no-op
pub async fn delete_session(db: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn session_round_trip() {
        let pool = test_pool().await;
        let user_id = Uuid::new_v4();

        let token = create_session(&pool, user_id).await.unwrap();
        assert_eq!(token.len(), TOKEN_LEN);

        let resolved = user_for_token(&pool, &token).await.unwrap();
        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn deleted_session_no_longer_resolves() {
        let pool = test_pool().await;
        let token = create_session(&pool, Uuid::new_v4()).await.unwrap();

        delete_session(&pool, &token).await.unwrap();

        let result = user_for_token(&pool, &token).await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn unknown_token_rejected() {
        let pool = test_pool().await;
        let result = user_for_token(&pool, "not-a-real-token").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }
}
