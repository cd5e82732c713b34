use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the metrics crates.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook bytes could not be opened or a sheet could not be read.
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// One or more required sheets are absent from the uploaded workbook.
    #[error("Missing required sheets: {}", .0.join(", "))]
    MissingSheets(Vec<String>),

    /// A user-supplied date string could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// No stored record exists for the requested client.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// A client name is empty or cannot be used as a store key.
    #[error("Invalid client name: {0:?}")]
    InvalidClientName(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MetricsError {
    /// Names of the missing sheets when this is a [`MetricsError::MissingSheets`].
    pub fn missing_sheets(&self) -> Option<&[String]> {
        match self {
            MetricsError::MissingSheets(names) => Some(names),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the metrics crates.
pub type Result<T> = std::result::Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MetricsError::FileRead {
            path: PathBuf::from("/uploads/acme.xlsx"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/uploads/acme.xlsx"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_sheets_single() {
        let err = MetricsError::MissingSheets(vec!["ENGAGEMENT".to_string()]);
        assert_eq!(err.to_string(), "Missing required sheets: ENGAGEMENT");
    }

    #[test]
    fn test_error_display_missing_sheets_both() {
        let err =
            MetricsError::MissingSheets(vec!["DISCOVERY".to_string(), "ENGAGEMENT".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required sheets: DISCOVERY, ENGAGEMENT"
        );
    }

    #[test]
    fn test_missing_sheets_accessor() {
        let err = MetricsError::MissingSheets(vec!["DISCOVERY".to_string()]);
        assert_eq!(err.missing_sheets(), Some(&["DISCOVERY".to_string()][..]));

        let other = MetricsError::InvalidDate("soon".to_string());
        assert!(other.missing_sheets().is_none());
    }

    #[test]
    fn test_error_display_client_not_found() {
        let err = MetricsError::ClientNotFound("Acme".to_string());
        assert_eq!(err.to_string(), "Client not found: Acme");
    }

    #[test]
    fn test_error_display_invalid_client_name() {
        let err = MetricsError::InvalidClientName("  ".to_string());
        assert_eq!(err.to_string(), "Invalid client name: \"  \"");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MetricsError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: MetricsError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
