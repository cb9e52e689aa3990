//! Reports module - JSON export payloads.
//!
//! Shapes the performance history and the latest ranked list into the
//! structures the batch app serializes to disk.

mod reports_model;
mod reports_service;


pub use reports_model::{PerformancePoint, PerformanceReport};
pub use reports_service::ReportService;
