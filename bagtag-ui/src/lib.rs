//! bagtag-ui library interface
//!
//! Exposes the application state and router so integration tests can
//! drive the HTTP API against an in-memory database.

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use bagtag_common::config::TomlConfig;
use bagtag_common::confirm::ConfirmState;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Media store root directory (photos and receipts)
    pub media_root: PathBuf,
    /// TOML config (lowest-priority tier for the Gemini key)
    pub toml_config: TomlConfig,
    /// Shared HTTP client for Gemini calls
    pub http: reqwest::Client,
    /// Delete-confirmation windows, keyed by (user, club)
    pub confirm: Arc<Mutex<HashMap<(Uuid, Uuid), ConfirmState>>>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, media_root: PathBuf, toml_config: TomlConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("BagTag/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            db,
            media_root,
            toml_config,
            http,
            confirm: Arc::new(Mutex::new(HashMap::new())),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let media_dir = ServeDir::new(&state.media_root);

    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::auth_routes())
        .merge(api::club_routes())
        .merge(api::scan_routes())
        .merge(api::report_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes())
        // Uploaded photos and receipts
        .nest_service("/media", media_dir)
        .with_state(state)
}
