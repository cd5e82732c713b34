//! Upload flow: workbook file → parsed data → stored client record.
//!
//! Reading the file is the only suspend point. Parsing and the store write
//! run synchronously once the bytes are in memory.

use std::path::Path;

use chrono::{DateTime, Utc};
use metrics_core::error::{MetricsError, Result};
use metrics_core::models::{ClientRecord, WorkbookData};
use metrics_data::ingest::parse_workbook;

use crate::store::{validate_client_name, ClientStore};

/// Read a workbook file into memory.
pub async fn read_workbook_bytes(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| MetricsError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Read, parse and store the workbook at `path` under `client_name`.
///
/// The client's previous record is fully replaced; only its start date is
/// carried over.
pub async fn ingest_upload<S>(store: &mut S, path: &Path, client_name: &str) -> Result<ClientRecord>
where
    S: ClientStore + ?Sized,
{
    let name = validate_client_name(client_name)?;
    let bytes = read_workbook_bytes(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "workbook read");

    let data = parse_workbook(&bytes)?;
    apply_upload(store, &name, data, Utc::now())
}

/// Replace `client_name`'s record with freshly parsed `data`.
pub fn apply_upload<S>(
    store: &mut S,
    client_name: &str,
    data: WorkbookData,
    uploaded_at: DateTime<Utc>,
) -> Result<ClientRecord>
where
    S: ClientStore + ?Sized,
{
    let name = validate_client_name(client_name)?;
    let previous_start = store
        .load_client(&name)?
        .and_then(|existing| existing.start_date);

    let mut record = ClientRecord::new(name, data);
    record.start_date = previous_start;
    record.uploaded_at = Some(uploaded_at);

    store.save_client(&record)?;
    tracing::info!(
        client = %record.name,
        engagement_days = record.data.engagement.len(),
        top_posts = record.data.top_posts.len(),
        "upload stored"
    );
    Ok(record)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
