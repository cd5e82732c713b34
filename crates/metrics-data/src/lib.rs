//! Data ingestion layer for the LinkedIn analytics dashboard.
//!
//! Reads an exported analytics workbook, extracts the typed series from each
//! sheet, buckets series into daily/weekly/monthly aggregates and derives the
//! summary cards, chart series and top-post rows shown to clients.

pub mod aggregator;
pub mod extractors;
pub mod ingest;
pub mod summary;
pub mod workbook;

pub use metrics_core as core;
