//! Time-series aggregation over daily, weekly and monthly buckets.
//!
//! Works on any [`SeriesPoint`], so the same pass serves the engagement,
//! follower and engagement-rate series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use metrics_core::formatting::format_period_label;
use metrics_core::models::{BeforeAfterStat, Period, SeriesPoint};
use metrics_core::time_utils::{day_key, month_key, week_start};

// ── Bucket ────────────────────────────────────────────────────────────────────

/// Summed fields of every point falling in one period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    /// `"2024-01-15"` for day and week buckets (week = its Sunday), `"2024-01"`
    /// for month buckets.
    pub key: String,
    pub sums: BTreeMap<&'static str, f64>,
    pub count: u32,
}

impl Bucket {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    fn add_point<P: SeriesPoint>(&mut self, point: &P) {
        for (name, value) in point.fields() {
            *self.sums.entry(name).or_insert(0.0) += value;
        }
        self.count += 1;
    }

    /// Summed value of `field`, 0 when no point in the bucket carried it.
    pub fn value(&self, field: &str) -> f64 {
        self.sums.get(field).copied().unwrap_or(0.0)
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Buckets for one series and period, sorted by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub period: Period,
    pub buckets: Vec<Bucket>,
}

impl Aggregation {
    pub fn keys(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.key.as_str()).collect()
    }

    /// Display labels, e.g. `"Jan 5"` or `"Jan 24"` for a month bucket.
    pub fn labels(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|b| format_period_label(&b.key, self.period))
            .collect()
    }

    pub fn values(&self, field: &str) -> Vec<f64> {
        self.buckets.iter().map(|b| b.value(field)).collect()
    }

    /// Index of the first bucket whose key sorts at or after `date`'s ISO
    /// form.
    ///
    /// Comparison is on strings, so a month key `"2024-01"` sorts before
    /// `"2024-01-10"` and the marker lands on the following month.
    pub fn start_index(&self, date: NaiveDate) -> Option<usize> {
        let iso = day_key(date);
        self.buckets.iter().position(|b| b.key.as_str() >= iso.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

// ── SeriesAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups dated points by period.
pub struct SeriesAggregator;

impl SeriesAggregator {
    /// Bucket key for `date` under `period`.
    pub fn bucket_key(date: NaiveDate, period: Period) -> String {
        match period {
            Period::Daily => day_key(date),
            Period::Weekly => day_key(week_start(date)),
            Period::Monthly => month_key(date),
        }
    }

    /// Sum every field of `series` per bucket.
    ///
    /// Buckets come out in ascending key order. The zero-padded key formats
    /// make that chronological.
    pub fn aggregate<P: SeriesPoint>(series: &[P], period: Period) -> Aggregation {
        let mut map: BTreeMap<String, Bucket> = BTreeMap::new();

        for point in series {
            let key = Self::bucket_key(point.date(), period);
            map.entry(key.clone())
                .or_insert_with(|| Bucket::new(key))
                .add_point(point);
        }

        Aggregation {
            period,
            buckets: map.into_values().collect(),
        }
    }

    /// Mean of `field` strictly before `start` and on/after it.
    ///
    /// No start date or an empty series yields all zeros. `change` is the
    /// percentage delta from `before` to `after` and is 0 when `before` is 0.
    /// Points lacking `field` count as 0.
    pub fn before_after<P: SeriesPoint>(
        series: &[P],
        start: Option<NaiveDate>,
        field: &str,
    ) -> BeforeAfterStat {
        let Some(start) = start else {
            return BeforeAfterStat::default();
        };
        if series.is_empty() {
            return BeforeAfterStat::default();
        }

        let (before, after): (Vec<&P>, Vec<&P>) =
            series.iter().partition(|p| p.date() < start);

        let before = mean(&before, field);
        let after = mean(&after, field);

        let change = if before == 0.0 {
            0.0
        } else {
            (after - before) / before * 100.0
        };

        BeforeAfterStat {
            before,
            after,
            change: if change.is_finite() { change } else { 0.0 },
        }
    }
}

fn mean<P: SeriesPoint>(points: &[&P], field: &str) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let total: f64 = points.iter().map(|p| p.field(field).unwrap_or(0.0)).sum();
    total / points.len() as f64
}

// ── Tests ─────────────────────────────────────────────────────────────────────
