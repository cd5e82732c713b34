//! Workbook → [`WorkbookData`] ingestion.
//!
//! Parsing is synchronous and pure; reading the bytes is the caller's job.

use metrics_core::error::Result;
use metrics_core::models::WorkbookData;
use tracing::{debug, info};

use crate::extractors::{
    extract_demographics, extract_discovery, extract_engagement, extract_followers,
    extract_top_posts, followers::FollowersExtract, DEMOGRAPHICS_SHEET, DISCOVERY_SHEET,
    ENGAGEMENT_SHEET, FOLLOWERS_SHEET, REQUIRED_SHEETS, TOP_POSTS_SHEET,
};
use crate::workbook::Workbook;

/// Parse raw workbook bytes into the typed client data.
///
/// Fails when the bytes are not a readable workbook or when a required sheet
/// is absent; every other defect is absorbed row by row.
pub fn parse_workbook(bytes: &[u8]) -> Result<WorkbookData> {
    let workbook = Workbook::from_bytes(bytes)?;
    extract_all(&workbook)
}

/// Run every extractor over an opened workbook.
///
/// Optional sheets that are missing contribute empty results.
pub fn extract_all(workbook: &Workbook) -> Result<WorkbookData> {
    workbook.require_sheets(&REQUIRED_SHEETS)?;

    let discovery = workbook
        .sheet(DISCOVERY_SHEET)
        .map(extract_discovery)
        .unwrap_or_default();
    let engagement = workbook
        .sheet(ENGAGEMENT_SHEET)
        .map(extract_engagement)
        .unwrap_or_default();

    let FollowersExtract {
        total_followers,
        series: followers,
    } = match workbook.sheet(FOLLOWERS_SHEET) {
        Some(sheet) => extract_followers(sheet),
        None => {
            debug!("optional sheet {} absent", FOLLOWERS_SHEET);
            FollowersExtract::default()
        }
    };

    let top_posts = workbook
        .sheet(TOP_POSTS_SHEET)
        .map(extract_top_posts)
        .unwrap_or_default();
    let demographics = workbook
        .sheet(DEMOGRAPHICS_SHEET)
        .map(extract_demographics)
        .unwrap_or_default();

    info!(
        "parsed workbook: {} discovery entries, {} engagement days, {} follower days, {} top posts, {} demographics",
        discovery.len(),
        engagement.len(),
        followers.len(),
        top_posts.len(),
        demographics.len()
    );

    Ok(WorkbookData {
        discovery,
        engagement,
        followers,
        total_followers,
        top_posts,
        demographics,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
