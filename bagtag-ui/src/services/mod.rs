//! Service-layer clients and helpers

pub mod blob_store;
pub mod gemini;
pub mod report;
