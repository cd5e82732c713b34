use metrics_core::models::FollowerPoint;
use tracing::debug;

use crate::workbook::{Cell, Sheet};

/// Follower data read from the FOLLOWERS sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowersExtract {
    /// Snapshot from cell B1.
    pub total_followers: u64,
    /// Daily new followers, ascending by date.
    pub series: Vec<FollowerPoint>,
}

/// Read the positional FOLLOWERS layout.
///
/// Row 0, column 1 holds the total-followers snapshot. The daily series
/// starts after the row whose first cell is the literal `Date` and runs to
/// the end of the sheet; a row needs a first cell and a second cell to be
/// considered, and is dropped when its date cannot be read.
pub fn extract_followers(sheet: &Sheet) -> FollowersExtract {
    let total_followers = sheet.cell(0, 1).as_count();

    let rows = sheet.rows();
    let Some(header_idx) = rows
        .iter()
        .position(|row| row.first().is_some_and(|c| c.is_text("Date")))
    else {
        debug!("FOLLOWERS: no Date header row");
        return FollowersExtract {
            total_followers,
            series: Vec::new(),
        };
    };

    let mut series: Vec<FollowerPoint> = rows[header_idx + 1..]
        .iter()
        .filter_map(|row| {
            let first = row.first().filter(|c| !c.is_blank())?;
            let second = row.get(1).filter(|c| **c != Cell::Empty)?;
            Some(FollowerPoint {
                date: first.as_date()?,
                new_followers: second.as_count(),
            })
        })
        .collect();

    series.sort_by_key(|p| p.date);

    debug!(
        "FOLLOWERS: total {}, {} dated rows",
        total_followers,
        series.len()
    );
    FollowersExtract {
        total_followers,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_followers_total_and_series() {
        let sheet = Sheet::new(
            "FOLLOWERS",
            vec![
                vec!["Total followers on 2/28/2024:".into(), 2_431.0.into()],
                vec![],
                vec!["Date".into(), "New followers".into()],
                vec!["2024-01-02".into(), 4.0.into()],
                vec!["2024-01-01".into(), 7.0.into()],
                vec!["garbage".into(), 3.0.into()],
                vec!["2024-01-03".into(), Cell::Empty],
                vec!["2024-01-04".into(), "".into()],
            ],
        );

        let extract = extract_followers(&sheet);
        assert_eq!(extract.total_followers, 2_431);
        assert_eq!(
            extract.series,
            vec![
                FollowerPoint {
                    date: date(2024, 1, 1),
                    new_followers: 7
                },
                FollowerPoint {
                    date: date(2024, 1, 2),
                    new_followers: 4
                },
                FollowerPoint {
                    date: date(2024, 1, 4),
                    new_followers: 0
                },
            ]
        );
    }

    #[test]
    fn test_followers_without_header_row_has_no_series() {
        let sheet = Sheet::new(
            "FOLLOWERS",
            vec![
                vec!["Total".into(), 10.0.into()],
                vec!["2024-01-01".into(), 4.0.into()],
            ],
        );

        let extract = extract_followers(&sheet);
        assert_eq!(extract.total_followers, 10);
        assert!(extract.series.is_empty());
    }

    #[test]
    fn test_followers_empty_sheet() {
        assert_eq!(
            extract_followers(&Sheet::new("FOLLOWERS", vec![])),
            FollowersExtract::default()
        );
    }
}
