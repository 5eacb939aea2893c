//! # BagTag Common Library
//!
//! Shared code for the BagTag golf equipment tracker:
//! - Equipment data model and record normalization rules
//! - Derived display values (counts, totals, set labels, dates)
//! - Delete-confirmation state machine
//! - SQLite persistence layer (users, sessions, clubs, settings)
//! - Configuration loading and root folder resolution

pub mod config;
pub mod confirm;
pub mod db;
pub mod error;
pub mod model;
pub mod normalize;

pub use error::{Error, Result};
pub use model::{Category, EquipmentRecord, LaunchData, Location, ScanSuggestion, TradeInEstimate};
