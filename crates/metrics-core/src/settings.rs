use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{client_slug, Metric, Period};

/// Directory under the home directory holding config, logs and client data.
pub const APP_DIR_NAME: &str = ".ghost-metrics";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// LinkedIn analytics for ghostwriting clients
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ghost-metrics",
    about = "LinkedIn analytics for ghostwriting clients",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding stored client records
    #[arg(long, global = true, env = "GHOST_METRICS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Chart period (remembered between runs)
    #[arg(long, global = true, value_enum)]
    pub period: Option<Period>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear: bool,
}

/// Actions available from the command line.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Parse a LinkedIn analytics workbook and store it under a client name
    Upload {
        /// Path to the exported .xlsx workbook
        file: PathBuf,
        /// Client name the data belongs to
        #[arg(long)]
        client: String,
    },
    /// List stored clients
    List,
    /// Show summary cards, demographics and top posts for a client
    Show {
        /// Client name (defaults to the last one shown)
        client: Option<String>,
    },
    /// Print the bucketed series behind one chart
    Chart {
        /// Client name (defaults to the last one shown)
        client: Option<String>,
        /// Metric to chart
        #[arg(long, value_enum, default_value = "impressions")]
        metric: Metric,
    },
    /// Set or clear the campaign start date for a client
    SetStartDate {
        client: String,
        /// Date such as 2024-03-01; omit to clear
        date: Option<String>,
    },
    /// Delete a stored client
    Delete { client: String },
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.ghost-metrics/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset values from last-used params, and
    /// persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let mut settings = Settings::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return settings;
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; only fill what was left unset.
        if settings.period.is_none() {
            settings.period = last.period;
        }
        match &mut settings.command {
            Command::Show { client } | Command::Chart { client, .. } if client.is_none() => {
                *client = last.client.clone();
            }
            _ => {}
        }

        let mut params = LastUsedParams::from(&settings);
        if params.client.is_none() {
            params.client = last.client;
        }
        if let Command::Delete { client } = &settings.command {
            if params
                .client
                .as_deref()
                .is_some_and(|remembered| client_slug(remembered) == client_slug(client))
            {
                params.client = None;
            }
        }
        let _ = params.save_to(config_path);

        settings
    }

    /// Chart period, defaulting to weekly.
    pub fn period(&self) -> Period {
        self.period.unwrap_or_default()
    }

    /// Store directory: `--data-dir` when given, else `~/.ghost-metrics/clients`.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(APP_DIR_NAME).join("clients"))
    }

    /// Client the command operates on, if any.
    pub fn selected_client(&self) -> Option<&str> {
        match &self.command {
            Command::Upload { client, .. }
            | Command::SetStartDate { client, .. } => Some(client.as_str()),
            Command::Show { client } | Command::Chart { client, .. } => client.as_deref(),
            Command::List | Command::Delete { .. } => None,
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            period: s.period,
            client: s.selected_client().map(str::to_string),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        list.iter().map(|s| s.into()).collect()
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            period: Some(Period::Monthly),
            client: Some("Acme".to_string()),
        };
        params.save_to(&path).expect("save");

        assert_eq!(LastUsedParams::load_from(&path), params);
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert_eq!(loaded, LastUsedParams::default());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["ghost-metrics", "list"]);
        assert_eq!(settings.command, Command::List);
        assert!(settings.data_dir.is_none());
        assert!(settings.period.is_none());
        assert_eq!(settings.period(), Period::Weekly);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_upload_command() {
        let settings =
            Settings::parse_from(["ghost-metrics", "upload", "data.xlsx", "--client", "Acme"]);
        assert_eq!(
            settings.command,
            Command::Upload {
                file: PathBuf::from("data.xlsx"),
                client: "Acme".to_string(),
            }
        );
    }

    #[test]
    fn test_settings_chart_command_with_global_period() {
        let settings = Settings::parse_from([
            "ghost-metrics",
            "chart",
            "Acme",
            "--metric",
            "new-followers",
            "--period",
            "daily",
        ]);
        assert_eq!(settings.period, Some(Period::Daily));
        assert_eq!(
            settings.command,
            Command::Chart {
                client: Some("Acme".to_string()),
                metric: Metric::NewFollowers,
            }
        );
    }

    #[test]
    fn test_settings_data_dir_override() {
        let settings =
            Settings::parse_from(["ghost-metrics", "--data-dir", "/tmp/clients", "list"]);
        assert_eq!(settings.store_dir(), PathBuf::from("/tmp/clients"));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_fills_client_and_period() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            period: Some(Period::Monthly),
            client: Some("Acme".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(args(&["ghost-metrics", "show"]), &config_path);
        assert_eq!(settings.period, Some(Period::Monthly));
        assert_eq!(
            settings.command,
            Command::Show {
                client: Some("Acme".to_string())
            }
        );
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            period: Some(Period::Monthly),
            client: Some("Acme".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "chart", "Globex", "--period", "daily"]),
            &config_path,
        );
        assert_eq!(settings.period, Some(Period::Daily));
        assert_eq!(settings.selected_client(), Some("Globex"));

        let saved = LastUsedParams::load_from(&config_path);
        assert_eq!(saved.client.as_deref(), Some("Globex"));
        assert_eq!(saved.period, Some(Period::Daily));
    }

    #[test]
    fn test_load_with_last_used_delete_forgets_client() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            period: None,
            client: Some("Acme".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "delete", "Acme"]),
            &config_path,
        );

        assert!(LastUsedParams::load_from(&config_path).client.is_none());
    }

    #[test]
    fn test_load_with_last_used_delete_matches_client_key() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            period: Some(Period::Daily),
            client: Some("Acme Co".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "delete", "acme co."]),
            &config_path,
        );

        let saved = LastUsedParams::load_from(&config_path);
        assert!(saved.client.is_none());
        assert_eq!(saved.period, Some(Period::Daily));
    }

    #[test]
    fn test_load_with_last_used_delete_keeps_other_client() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            period: None,
            client: Some("Acme Co".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "delete", "Globex"]),
            &config_path,
        );

        assert_eq!(
            LastUsedParams::load_from(&config_path).client.as_deref(),
            Some("Acme Co")
        );
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&config_path).expect("save");

        Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "list", "--clear"]),
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            args(&["ghost-metrics", "list", "--debug"]),
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }
}
