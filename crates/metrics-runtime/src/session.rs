//! Dashboard session: one selected client plus per-chart view state.
//!
//! Every card, chart and table request goes through a session value instead
//! of process-wide state. Derived data is recomputed from the record on each
//! call.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use metrics_core::error::{MetricsError, Result};
use metrics_core::models::{ClientRecord, Metric, Period};
use metrics_data::summary::{
    build_chart, build_summary, build_top_posts, ChartSeries, SummaryCard, TopPostsTable,
};

use crate::store::ClientStore;

/// View state for one client's dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSession {
    record: ClientRecord,
    periods: BTreeMap<Metric, Period>,
}

impl DashboardSession {
    /// Load `name` from `store`.
    pub fn open<S>(store: &S, name: &str) -> Result<Self>
    where
        S: ClientStore + ?Sized,
    {
        let record = store
            .load_client(name)?
            .ok_or_else(|| MetricsError::ClientNotFound(name.trim().to_string()))?;
        tracing::debug!(client = %record.name, "session opened");
        Ok(Self::from_record(record))
    }

    /// Session over an already loaded record, every chart at the default
    /// period.
    pub fn from_record(record: ClientRecord) -> Self {
        let periods = Metric::ALL
            .into_iter()
            .map(|m| (m, Period::default()))
            .collect();
        Self { record, periods }
    }

    pub fn record(&self) -> &ClientRecord {
        &self.record
    }

    pub fn client_name(&self) -> &str {
        &self.record.name
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.record.start_date
    }

    // ── View state ────────────────────────────────────────────────────────────

    pub fn period(&self, metric: Metric) -> Period {
        self.periods.get(&metric).copied().unwrap_or_default()
    }

    pub fn set_period(&mut self, metric: Metric, period: Period) {
        self.periods.insert(metric, period);
    }

    /// Switch every chart to `period`.
    pub fn set_all_periods(&mut self, period: Period) {
        for metric in Metric::ALL {
            self.set_period(metric, period);
        }
    }

    /// Set or clear the campaign start date and persist the record.
    pub fn set_start_date<S>(&mut self, store: &mut S, start: Option<NaiveDate>) -> Result<()>
    where
        S: ClientStore + ?Sized,
    {
        self.record.start_date = start;
        store.save_client(&self.record)?;
        tracing::info!(
            client = %self.record.name,
            start_date = ?start,
            "start date updated"
        );
        Ok(())
    }

    // ── Derived views ─────────────────────────────────────────────────────────

    pub fn summary(&self) -> Vec<SummaryCard> {
        build_summary(&self.record)
    }

    /// Chart for `metric` at its current period.
    pub fn chart(&self, metric: Metric) -> ChartSeries {
        build_chart(
            &self.record,
            metric,
            self.period(metric),
            self.record.start_date,
        )
    }

    pub fn charts(&self) -> Vec<ChartSeries> {
        Metric::ALL.into_iter().map(|m| self.chart(m)).collect()
    }

    /// Top posts table, with days-ago counted up to `today`.
    pub fn top_posts(&self, today: NaiveDate) -> TopPostsTable {
        build_top_posts(&self.record.data.top_posts, self.record.start_date, today)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
