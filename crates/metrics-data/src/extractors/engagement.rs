use metrics_core::models::EngagementPoint;
use tracing::debug;

use crate::workbook::{Cell, Sheet};

/// Read the daily `Date` / `Impressions` / `Engagements` table.
///
/// Missing numeric cells count as 0. Rows whose date cannot be read are
/// dropped. The result is sorted ascending by date.
pub fn extract_engagement(sheet: &Sheet) -> Vec<EngagementPoint> {
    let records = sheet.records();
    let total = records.len();

    let mut points: Vec<EngagementPoint> = records
        .iter()
        .filter_map(|record| {
            let date = record.get("Date").and_then(Cell::as_date)?;
            Some(EngagementPoint {
                date,
                impressions: record.get("Impressions").map_or(0, Cell::as_count),
                engagements: record.get("Engagements").map_or(0, Cell::as_count),
            })
        })
        .collect();

    points.sort_by_key(|p| p.date);

    debug!(
        "ENGAGEMENT: {} rows read, {} kept",
        total,
        points.len()
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header() -> Vec<Cell> {
        vec!["Date".into(), "Impressions".into(), "Engagements".into()]
    }

    #[test]
    fn test_engagement_sorted_and_undated_rows_dropped() {
        let sheet = Sheet::new(
            "ENGAGEMENT",
            vec![
                header(),
                vec!["2024-01-03".into(), 30.0.into(), 3.0.into()],
                vec!["not a date".into(), 99.0.into(), 9.0.into()],
                vec![45292.0.into(), 10.0.into(), 1.0.into()],
                vec![Cell::Empty, 50.0.into(), 5.0.into()],
                vec!["01/02/2024".into(), 20.0.into(), 2.0.into()],
            ],
        );

        let points = extract_engagement(&sheet);
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        assert_eq!(points[0].impressions, 10);
        assert_eq!(points[2].engagements, 3);
    }

    #[test]
    fn test_engagement_out_of_range_serials_dropped_before_weekly_buckets() {
        use crate::aggregator::SeriesAggregator;
        use chrono::Duration;
        use metrics_core::models::Period;
        use metrics_core::time_utils::EXCEL_UNIX_EPOCH_SERIAL;

        let near_min = NaiveDate::MIN + Duration::days(3);
        let serial = EXCEL_UNIX_EPOCH_SERIAL + (near_min - date(1970, 1, 1)).num_days() as f64;
        let sheet = Sheet::new(
            "ENGAGEMENT",
            vec![
                header(),
                vec![serial.into(), 70.0.into(), 7.0.into()],
                vec![45292.0.into(), 10.0.into(), 1.0.into()],
            ],
        );

        let points = extract_engagement(&sheet);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, date(2024, 1, 1));

        let weekly = SeriesAggregator::aggregate(&points, Period::Weekly);
        assert_eq!(weekly.keys(), vec!["2023-12-31"]);
    }

    #[test]
    fn test_engagement_missing_numbers_are_zero() {
        let sheet = Sheet::new(
            "ENGAGEMENT",
            vec![
                header(),
                vec!["2024-01-01".into(), Cell::Empty, "n/a".into()],
            ],
        );

        let points = extract_engagement(&sheet);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].impressions, 0);
        assert_eq!(points[0].engagements, 0);
    }

    #[test]
    fn test_engagement_missing_date_column_yields_nothing() {
        let sheet = Sheet::new(
            "ENGAGEMENT",
            vec![
                vec!["Day".into(), "Impressions".into()],
                vec!["2024-01-01".into(), 10.0.into()],
            ],
        );
        assert!(extract_engagement(&sheet).is_empty());
    }
}
