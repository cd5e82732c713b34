//! Core domain types for the LinkedIn analytics dashboard.
//!
//! Holds the client record and its time series, the shared error type, date
//! coercion helpers, number formatting, the static metric insight table and
//! the CLI settings.

pub mod error;
pub mod formatting;
pub mod insights;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{MetricsError, Result};
