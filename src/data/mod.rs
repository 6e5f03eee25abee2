//! Data ingestion and generation layer.

pub mod intervals;
pub mod measurements;
pub mod synthetic;
