//! HTTP API handlers for bagtag-ui

pub mod auth;
pub mod clubs;
pub mod health;
pub mod report;
pub mod scan;
pub mod settings;
pub mod ui;

pub use auth::{auth_routes, AuthUser};
pub use clubs::club_routes;
pub use health::health_routes;
pub use report::report_routes;
pub use scan::scan_routes;
pub use settings::settings_routes;
pub use ui::ui_routes;
