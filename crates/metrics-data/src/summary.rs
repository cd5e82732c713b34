//! Card, chart and top-post derivations over a stored [`ClientRecord`].
//!
//! Everything here is recomputed on demand from the record; nothing is
//! cached between calls.

use chrono::NaiveDate;
use metrics_core::formatting::{format_compact, format_number, percentage};
use metrics_core::insights::{self, AttachedInsight};
use metrics_core::models::{BeforeAfterStat, ClientRecord, Metric, Period, TopPost};
use metrics_core::time_utils::days_between;
use regex::Regex;
use serde::Serialize;

use crate::aggregator::SeriesAggregator;

/// Number of posts shown in the top-posts table.
pub const TOP_POSTS_SHOWN: usize = 10;

// ── Summary cards ─────────────────────────────────────────────────────────────

/// One headline card: a total plus its before/after comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub metric: Metric,
    pub title: &'static str,
    pub total: f64,
    pub stat: BeforeAfterStat,
    /// `"/day"` or `"%"`, appended to the before/after averages.
    pub suffix: &'static str,
    pub has_comparison: bool,
    pub insight: Option<AttachedInsight>,
}

impl SummaryCard {
    fn new(metric: Metric, total: f64, stat: BeforeAfterStat) -> Self {
        Self {
            metric,
            title: metric.card_title(),
            total,
            stat,
            suffix: metric.suffix(),
            has_comparison: stat.has_comparison(),
            insight: insights::for_metric(metric, &stat),
        }
    }

    /// Formatted total, e.g. `"12.5K"` or `"2.41%"`.
    pub fn display_total(&self) -> String {
        match self.metric {
            Metric::EngagementRate => format!("{}%", format_number(self.total, 2)),
            _ => format_compact(self.total),
        }
    }

    /// Advice for the current trend; empty without a comparison.
    pub fn advice(&self) -> &'static [&'static str] {
        match (&self.insight, self.has_comparison) {
            (Some(insight), true) => insight.advice,
            _ => &[],
        }
    }
}

/// The four headline cards in display order.
pub fn build_summary(record: &ClientRecord) -> Vec<SummaryCard> {
    let start = record.start_date;
    let data = &record.data;

    let impressions = record.total_impressions();
    let engagements = record.total_engagements();
    let rate = if impressions > 0.0 {
        engagements / impressions * 100.0
    } else {
        0.0
    };

    vec![
        SummaryCard::new(
            Metric::Impressions,
            impressions,
            SeriesAggregator::before_after(&data.engagement, start, Metric::Impressions.field()),
        ),
        SummaryCard::new(
            Metric::Engagements,
            engagements,
            SeriesAggregator::before_after(&data.engagement, start, Metric::Engagements.field()),
        ),
        SummaryCard::new(
            Metric::NewFollowers,
            data.total_followers as f64,
            SeriesAggregator::before_after(&data.followers, start, Metric::NewFollowers.field()),
        ),
        SummaryCard::new(
            Metric::EngagementRate,
            rate,
            SeriesAggregator::before_after(
                &record.engagement_rate_series(),
                start,
                Metric::EngagementRate.field(),
            ),
        ),
    ]
}

// ── Charts ────────────────────────────────────────────────────────────────────

/// A bucketed series ready to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub period: Period,
    /// Raw bucket keys.
    pub keys: Vec<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Bucket where the campaign start marker goes.
    pub start_index: Option<usize>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Aggregate the series behind `metric` at `period`.
pub fn build_chart(
    record: &ClientRecord,
    metric: Metric,
    period: Period,
    start: Option<NaiveDate>,
) -> ChartSeries {
    let aggregation = match metric {
        Metric::Impressions | Metric::Engagements => {
            SeriesAggregator::aggregate(&record.data.engagement, period)
        }
        Metric::NewFollowers => SeriesAggregator::aggregate(&record.data.followers, period),
        Metric::EngagementRate => {
            SeriesAggregator::aggregate(&record.engagement_rate_series(), period)
        }
    };

    ChartSeries {
        metric,
        period,
        keys: aggregation.keys().into_iter().map(str::to_string).collect(),
        labels: aggregation.labels(),
        values: aggregation.values(metric.field()),
        start_index: start.and_then(|d| aggregation.start_index(d)),
    }
}

// ── Top posts ─────────────────────────────────────────────────────────────────

/// Placeholder shown when a post URL carries no activity id.
pub const NO_ACTIVITY_ID: &str = "N/A";

/// One row of the top-posts table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPostRow {
    pub url: String,
    pub activity_id: String,
    pub date: Option<NaiveDate>,
    /// Whole days between the post date and "today"; `None` when undated.
    pub days_ago: Option<i64>,
    pub engagements: u64,
    pub impressions: u64,
    /// Engagement rate with two decimals, e.g. `"2.50"`.
    pub engagement_rate: String,
    /// Posted on or after the campaign start date.
    pub attributed: bool,
}

impl TopPostRow {
    /// Last eight characters of the activity id.
    pub fn short_id(&self) -> &str {
        let id = self.activity_id.as_str();
        match id.char_indices().rev().nth(7) {
            Some((idx, _)) => &id[idx..],
            None => id,
        }
    }
}

/// The leading rows of a record's top posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPostsTable {
    pub rows: Vec<TopPostRow>,
    /// Rows with `attributed` set.
    pub attributed_count: usize,
}

/// Build the table from the first [`TOP_POSTS_SHOWN`] posts.
pub fn build_top_posts(
    posts: &[TopPost],
    start: Option<NaiveDate>,
    today: NaiveDate,
) -> TopPostsTable {
    let activity_re = Regex::new(r"activity:(\d+)").expect("regex is valid");

    let rows: Vec<TopPostRow> = posts
        .iter()
        .take(TOP_POSTS_SHOWN)
        .map(|post| {
            let activity_id = activity_re
                .captures(&post.url)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| NO_ACTIVITY_ID.to_string());

            let engagement_rate = format!(
                "{:.2}",
                percentage(post.engagements as f64, post.impressions as f64, 2)
            );

            let attributed = matches!((start, post.date), (Some(s), Some(d)) if d >= s);

            TopPostRow {
                url: post.url.clone(),
                activity_id,
                date: post.date,
                days_ago: post.date.map(|d| days_between(d, today)),
                engagements: post.engagements,
                impressions: post.impressions,
                engagement_rate,
                attributed,
            }
        })
        .collect();

    let attributed_count = rows.iter().filter(|r| r.attributed).count();
    TopPostsTable {
        rows,
        attributed_count,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
