use metrics_core::models::{TopPost, MAX_TOP_POSTS};
use tracing::{debug, warn};

use crate::workbook::Sheet;

/// First cell of the TOP POSTS header row.
pub const HEADER_CELL: &str = "Post URL";

/// Row the data is assumed to start at when no header row is found.
pub const FALLBACK_START_ROW: usize = 2;

const URL_COL: usize = 0;
const DATE_COL: usize = 1;
const ENGAGEMENTS_COL: usize = 2;
const IMPRESSIONS_COL: usize = 6;

/// Read the positional TOP POSTS layout.
///
/// Scanning starts below the `Post URL` header row (or at
/// [`FALLBACK_START_ROW`] when the sheet has none). Rows whose first cell
/// mentions `linkedin.com` are kept, up to [`MAX_TOP_POSTS`] in row order.
/// The result is sorted by engagements descending; ties keep row order.
pub fn extract_top_posts(sheet: &Sheet) -> Vec<TopPost> {
    let rows = sheet.rows();

    let start = match rows
        .iter()
        .position(|row| row.first().is_some_and(|c| c.is_text(HEADER_CELL)))
    {
        Some(idx) => idx + 1,
        None => {
            warn!(
                "TOP POSTS: no \"{}\" header row, assuming data starts at row {}",
                HEADER_CELL,
                FALLBACK_START_ROW + 1
            );
            FALLBACK_START_ROW
        }
    };

    let mut posts: Vec<TopPost> = Vec::new();
    for row_idx in start..rows.len() {
        if posts.len() >= MAX_TOP_POSTS {
            break;
        }
        let Some(url) = sheet.cell(row_idx, URL_COL).as_text() else {
            continue;
        };
        if !url.contains("linkedin.com") {
            continue;
        }
        posts.push(TopPost {
            url,
            date: sheet.cell(row_idx, DATE_COL).as_date(),
            engagements: sheet.cell(row_idx, ENGAGEMENTS_COL).as_int_prefix(),
            impressions: sheet.cell(row_idx, IMPRESSIONS_COL).as_int_prefix(),
        });
    }

    // `sort_by` is stable, so equal engagement counts keep scan order.
    posts.sort_by(|a, b| b.engagements.cmp(&a.engagements));

    debug!("TOP POSTS: {} posts kept", posts.len());
    posts
}
