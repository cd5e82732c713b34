//! Client record persistence.
//!
//! [`ClientStore`] is the narrow interface the rest of the runtime talks to.
//! [`JsonFileStore`] keeps one pretty-printed JSON document per client under
//! a directory; [`MemoryStore`] backs tests and dry runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use metrics_core::error::{MetricsError, Result};
use metrics_core::models::ClientRecord;
pub use metrics_core::models::client_slug;

// ── Client names ──────────────────────────────────────────────────────────────

/// Trim a client name and reject names that cannot key a record.
pub fn validate_client_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || client_slug(trimmed).is_empty() {
        return Err(MetricsError::InvalidClientName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

// ── ClientStore ───────────────────────────────────────────────────────────────

/// Persistence collaborator for client records.
///
/// Names are matched by [`client_slug`], so lookups ignore case and
/// punctuation.
pub trait ClientStore {
    /// The stored record for `name`, or `None` when there is none.
    fn load_client(&self, name: &str) -> Result<Option<ClientRecord>>;

    /// Insert or fully replace the record keyed by `record.name`.
    fn save_client(&mut self, record: &ClientRecord) -> Result<()>;

    /// Display names of every stored client, sorted case-insensitively.
    fn list_clients(&self) -> Result<Vec<String>>;

    /// Remove a client; `false` when it did not exist.
    fn delete_client(&mut self, name: &str) -> Result<bool>;

    /// Every stored record, in [`list_clients`](Self::list_clients) order.
    fn list_records(&self) -> Result<Vec<ClientRecord>> {
        let mut records = Vec::new();
        for name in self.list_clients()? {
            if let Some(record) = self.load_client(&name)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn sort_names(names: &mut [String]) {
    names.sort_by_key(|n| n.to_lowercase());
}

// ── JsonFileStore ─────────────────────────────────────────────────────────────

/// One `<slug>.json` file per client under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `name`'s record.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let slug = client_slug(name);
        if slug.is_empty() {
            return Err(MetricsError::InvalidClientName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", slug)))
    }

    fn read_record(path: &Path) -> Result<ClientRecord> {
        let content = fs::read_to_string(path).map_err(|source| MetricsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ClientStore for JsonFileStore {
    fn load_client(&self, name: &str) -> Result<Option<ClientRecord>> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path).map(Some)
    }

    fn save_client(&mut self, record: &ClientRecord) -> Result<()> {
        let path = self.path_for(&record.name)?;
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(record)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        tracing::info!(client = %record.name, path = %path.display(), "client record saved");
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = walkdir::WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .map(|ext| ext == "json")
                        .unwrap_or(false)
            })
            .filter_map(|entry| match Self::read_record(entry.path()) {
                Ok(record) => Some(record.name),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable client file");
                    None
                }
            })
            .collect();

        sort_names(&mut names);
        Ok(names)
    }

    fn delete_client(&mut self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        tracing::info!(client = %name, "client record deleted");
        Ok(true)
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// Records held in memory, keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, ClientRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ClientStore for MemoryStore {
    fn load_client(&self, name: &str) -> Result<Option<ClientRecord>> {
        Ok(self.records.get(&client_slug(name)).cloned())
    }

    fn save_client(&mut self, record: &ClientRecord) -> Result<()> {
        let slug = client_slug(&record.name);
        if slug.is_empty() {
            return Err(MetricsError::InvalidClientName(record.name.clone()));
        }
        self.records.insert(slug, record.clone());
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.records.values().map(|r| r.name.clone()).collect();
        sort_names(&mut names);
        Ok(names)
    }

    fn delete_client(&mut self, name: &str) -> Result<bool> {
        Ok(self.records.remove(&client_slug(name)).is_some())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
