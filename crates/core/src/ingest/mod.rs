//! Ingest module - market data ETL.
//!
//! Pulls provider data into the store ahead of projection and ranking.
//! Everything here is newer-than-latest diffing; the store never sees a
//! row older than what it already holds for a symbol.

mod ingest_service;

#[cfg(test)]
mod ingest_service_tests;

pub use ingest_service::IngestService;
