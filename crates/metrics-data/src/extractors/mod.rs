//! Per-sheet extractors.
//!
//! Each extractor is a pure function from a sheet to typed records. Rows that
//! cannot be interpreted are skipped, never reported as errors.

pub mod demographics;
pub mod discovery;
pub mod engagement;
pub mod followers;
pub mod top_posts;

pub use demographics::extract_demographics;
pub use discovery::extract_discovery;
pub use engagement::extract_engagement;
pub use followers::extract_followers;
pub use top_posts::extract_top_posts;

pub const DISCOVERY_SHEET: &str = "DISCOVERY";
pub const ENGAGEMENT_SHEET: &str = "ENGAGEMENT";
pub const FOLLOWERS_SHEET: &str = "FOLLOWERS";
pub const TOP_POSTS_SHEET: &str = "TOP POSTS";
pub const DEMOGRAPHICS_SHEET: &str = "DEMOGRAPHICS";

/// Sheets every upload must contain.
pub const REQUIRED_SHEETS: [&str; 2] = [DISCOVERY_SHEET, ENGAGEMENT_SHEET];
