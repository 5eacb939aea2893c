//! bagtag-ui - Golf equipment inventory web service
//!
//! Single self-hosted binary: serves the web UI, the record CRUD API,
//! the media store, AI-assisted scanning and the PDF inventory report.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bagtag_ui::AppState;

const DEFAULT_PORT: u16 = 5740;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bagtag-ui (equipment inventory) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder: CLI arg, env var, TOML, OS default
    let toml_config = bagtag_common::config::TomlConfig::load();
    let cli_root = std::env::args().nth(1);
    let root_folder = bagtag_common::config::resolve_root_folder(
        cli_root.as_deref(),
        "BAGTAG_ROOT",
        &toml_config,
    );
    info!("Root folder: {}", root_folder.display());

    // Create root folder if missing, open or create database
    let db_path = bagtag_common::config::prepare_root_folder(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db_pool = bagtag_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Media store lives next to the database
    let media_root = bagtag_common::config::media_folder(&root_folder);
    std::fs::create_dir_all(&media_root)?;

    let port = toml_config.port.unwrap_or(DEFAULT_PORT);

    // Create application state and router
    let state = AppState::new(db_pool, media_root, toml_config);
    let app = bagtag_ui::build_router(state.clone());

    // Sweep expired delete-confirmation windows in the background
    tokio::spawn(bagtag_ui::api::clubs::confirm_sweeper(state));

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/api/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
