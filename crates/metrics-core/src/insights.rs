//! Static insight text attached to computed metrics.
//!
//! Each charted metric has a one-line definition, a benchmark string and two
//! short advice lists. Which list applies depends only on the sign of the
//! before/after change.

use serde::Serialize;

use crate::models::{BeforeAfterStat, Metric};

/// Definition, benchmark and advice for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricInsight {
    pub definition: &'static str,
    pub benchmark: &'static str,
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

/// Direction of a before/after change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    /// `Positive` when `change ≥ 0`.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Trend::Positive
        } else {
            Trend::Negative
        }
    }
}

/// Insight resolved for a concrete change value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachedInsight {
    pub definition: &'static str,
    pub benchmark: &'static str,
    pub trend: Trend,
    pub advice: &'static [&'static str],
}

const IMPRESSIONS: MetricInsight = MetricInsight {
    definition: "Total visibility. The size of your potential audience and digital footprint.",
    benchmark: "Benchmark: >10% Monthly Growth",
    positive: &[
        "Algorithm trust is high.",
        "Content format is working.",
        "Doubling down on recent topics.",
    ],
    negative: &[
        "Review posting time.",
        "Hook needs more urgency.",
        "Test a new content format.",
    ],
};

const ENGAGEMENTS: MetricInsight = MetricInsight {
    definition: "Total interactions. The definitive measure of how much people care.",
    benchmark: "Benchmark: ~2% of Impressions",
    positive: &[
        "High audience trust.",
        "Topics are resonating.",
        "Strong Calls to Action.",
    ],
    negative: &[
        "Ask more questions.",
        "Replies need more depth.",
        "Content was too passive.",
    ],
};

const NEW_FOLLOWERS: MetricInsight = MetricInsight {
    definition: "Audience retention. The permanent asset that compounds future reach.",
    benchmark: "Target: 2-5% Monthly Growth",
    positive: &[
        "Profile conversion is high.",
        "Bio is clear and compelling.",
        "Reach is targeted correctly.",
    ],
    negative: &[
        "Audit your Profile/Bio.",
        "Content may be off-niche.",
        "Add 'Follow' CTAs to comments.",
    ],
};

const ENGAGEMENT_RATE: MetricInsight = MetricInsight {
    definition: "Content efficiency. The truest measure of Content-Market Fit.",
    benchmark: "Industry Avg: 1.8% - 3.0%",
    positive: &[
        "Highly relevant audience.",
        "Quality over Quantity.",
        "Perfect topic alignment.",
    ],
    negative: &[
        "Stop chasing vanity metrics.",
        "Focus on depth, not width.",
        "Cut 'filler' content.",
    ],
};

/// Look up the insight for a canonical metric name such as `"New Followers"`.
///
/// Unknown names have no insight.
pub fn lookup(name: &str) -> Option<&'static MetricInsight> {
    match name {
        "Impressions" => Some(&IMPRESSIONS),
        "Engagements" => Some(&ENGAGEMENTS),
        "New Followers" => Some(&NEW_FOLLOWERS),
        "Engagement Rate" => Some(&ENGAGEMENT_RATE),
        _ => None,
    }
}

impl MetricInsight {
    /// Advice list for the given change.
    pub fn advice(&self, change: f64) -> &'static [&'static str] {
        match Trend::from_change(change) {
            Trend::Positive => self.positive,
            Trend::Negative => self.negative,
        }
    }
}

/// Resolve the insight for `name` against a computed change.
pub fn attach(name: &str, change: f64) -> Option<AttachedInsight> {
    lookup(name).map(|insight| AttachedInsight {
        definition: insight.definition,
        benchmark: insight.benchmark,
        trend: Trend::from_change(change),
        advice: insight.advice(change),
    })
}

/// Convenience wrapper keyed by [`Metric`].
pub fn for_metric(metric: Metric, stat: &BeforeAfterStat) -> Option<AttachedInsight> {
    attach(metric.canonical_name(), stat.change)
}
