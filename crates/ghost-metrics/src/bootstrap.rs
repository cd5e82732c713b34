use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use metrics_core::settings::APP_DIR_NAME;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.ghost-metrics/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.ghost-metrics/`
/// - `~/.ghost-metrics/clients/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("clients"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unknown names pass through unchanged so `RUST_LOG`-style directives work.
pub fn filter_directive(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so report output on stdout stays clean. Falls back to
/// `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let app_dir = tmp.path().join(".ghost-metrics");
        assert!(app_dir.is_dir(), ".ghost-metrics dir must exist");
        assert!(app_dir.join("clients").is_dir(), "clients subdir must exist");
    }

    #[test]
    fn test_filter_directive_maps_level_names() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
    }

    #[test]
    fn test_filter_directive_passes_through_directives() {
        assert_eq!(
            filter_directive("metrics_data=debug"),
            "metrics_data=debug"
        );
    }
}
