//! User account database operations
//!
//! Credentials are stored as salted SHA-256 digests. The returned
//! `user_id` is the partition key for everything else in the database.

use crate::{Error, Result};
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

/// A registered account (no credential material)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserAccount {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// Hash a password with the given salt
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a random alphanumeric salt
fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create a new account
///
/// Emails are stored lowercased and must be unique.
pub async fn create_user(
    db: &SqlitePool,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<UserAccount> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::InvalidInput("A valid email is required".to_string()));
    }
    if password.len() < 6 {
        return Err(Error::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(Error::InvalidInput("Display name is required".to_string()));
    }

    let user_id = Uuid::new_v4();
    let salt = generate_salt();
    let password_hash = hash_password(&salt, password);

    let result = sqlx::query(
        "INSERT INTO users (user_id, email, display_name, password_hash, salt, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id.to_string())
    .bind(&email)
    .bind(display_name)
    .bind(&password_hash)
    .bind(&salt)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await;

    match result {
        Ok(_) => Ok(UserAccount {
            user_id,
            email,
            display_name: display_name.to_string(),
        }),
        Err(e) => {
            let unique_violation = e
                .as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false);
            if unique_violation {
                Err(Error::InvalidInput(
                    "An account with this email already exists".to_string(),
                ))
            } else {
                Err(Error::Database(e))
            }
        }
    }
}

/// Verify credentials, returning the account on success
pub async fn verify_login(db: &SqlitePool, email: &str, password: &str) -> Result<UserAccount> {
    let email = email.trim().to_lowercase();

    let row: Option<(String, String, String, String)> = sqlx::query_as(
        "SELECT user_id, display_name, password_hash, salt FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(db)
    .await?;

    let (user_id, display_name, password_hash, salt) = row.ok_or_else(|| {
        Error::Unauthorized("Invalid email or password".to_string())
    })?;

    if hash_password(&salt, password) != password_hash {
        return Err(Error::Unauthorized("Invalid email or password".to_string()));
    }

    let user_id = user_id
        .parse::<Uuid>()
        .map_err(|e| Error::Internal(format!("Corrupt user_id in users table: {}", e)))?;

    Ok(UserAccount {
        user_id,
        email,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn signup_and_login_round_trip() {
        let pool = test_pool().await;

        let created = create_user(&pool, "Golfer@Example.com", "secret123", "Golfer")
            .await
            .unwrap();
        assert_eq!(created.email, "golfer@example.com");

        let logged_in = verify_login(&pool, "golfer@example.com", "secret123")
            .await
            .unwrap();
        assert_eq!(logged_in.user_id, created.user_id);
        assert_eq!(logged_in.display_name, "Golfer");
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let pool = test_pool().await;
        create_user(&pool, "a@b.com", "secret123", "A").await.unwrap();

        let result = verify_login(&pool, "a@b.com", "wrong-password").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn unknown_email_rejected() {
        let pool = test_pool().await;
        let result = verify_login(&pool, "nobody@b.com", "secret123").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let pool = test_pool().await;
        create_user(&pool, "a@b.com", "secret123", "A").await.unwrap();

        let result = create_user(&pool, "A@B.com", "other-secret", "B").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn weak_password_rejected() {
        let pool = test_pool().await;
        let result = create_user(&pool, "a@b.com", "short", "A").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
