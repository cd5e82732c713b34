//! Runtime layer for the ghost-metrics dashboard.
//!
//! Owns persistence of client records, the upload flow that turns a workbook
//! file into a stored record, and the dashboard session threaded through
//! every card and chart request.

pub mod session;
pub mod store;
pub mod upload;

pub use metrics_core as core;
pub use metrics_data as data;
