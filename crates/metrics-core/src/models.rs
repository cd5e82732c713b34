use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of LinkedIn posts kept from the TOP POSTS sheet.
pub const MAX_TOP_POSTS: usize = 50;

/// Maximum number of job-title rows kept from the DEMOGRAPHICS sheet.
pub const MAX_DEMOGRAPHICS: usize = 8;

// ── Series points ─────────────────────────────────────────────────────────────

/// Interface for any dated record that can be bucketed and averaged.
///
/// `fields` lists every numeric field carried by the point; aggregation sums
/// each one independently, so a single pass serves all charted metrics.
pub trait SeriesPoint {
    /// Calendar date the point belongs to.
    fn date(&self) -> NaiveDate;
    /// Every numeric field carried by this point, keyed by field name.
    fn fields(&self) -> Vec<(&'static str, f64)>;

    /// Value of a single named field, or `None` when the point lacks it.
    fn field(&self, name: &str) -> Option<f64> {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// One day of impressions and engagements from the ENGAGEMENT sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub engagements: u64,
}

impl EngagementPoint {
    /// `engagements / impressions × 100`, or 0 when there were no impressions.
    pub fn engagement_rate(&self) -> f64 {
        if self.impressions == 0 {
            return 0.0;
        }
        self.engagements as f64 / self.impressions as f64 * 100.0
    }
}

impl SeriesPoint for EngagementPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            (Metric::Impressions.field(), self.impressions as f64),
            (Metric::Engagements.field(), self.engagements as f64),
        ]
    }
}

/// One day of follower growth from the FOLLOWERS sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowerPoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub new_followers: u64,
}

impl SeriesPoint for FollowerPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![(Metric::NewFollowers.field(), self.new_followers as f64)]
    }
}

/// Derived daily engagement rate (percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementRatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl From<&EngagementPoint> for EngagementRatePoint {
    fn from(point: &EngagementPoint) -> Self {
        Self {
            date: point.date,
            rate: point.engagement_rate(),
        }
    }
}

impl SeriesPoint for EngagementRatePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![(Metric::EngagementRate.field(), self.rate)]
    }
}

// ── Sheet records ─────────────────────────────────────────────────────────────

/// A value from the DISCOVERY label → value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscoveryValue {
    Number(f64),
    Text(String),
}

impl DiscoveryValue {
    /// Numeric reading of the value; text is parsed after dropping thousands
    /// separators.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DiscoveryValue::Number(n) => Some(*n),
            DiscoveryValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for DiscoveryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryValue::Number(n) => write!(f, "{}", n),
            DiscoveryValue::Text(s) => f.write_str(s),
        }
    }
}

/// A single post row from the TOP POSTS sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub url: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub engagements: u64,
    #[serde(default)]
    pub impressions: u64,
}

/// A job-title share from the DEMOGRAPHICS sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicEntry {
    pub label: String,
    pub percentage: f64,
}

// ── WorkbookData / ClientRecord ───────────────────────────────────────────────

/// Everything extracted from one uploaded workbook.
///
/// `engagement` and `followers` are sorted ascending by date; `top_posts` is
/// sorted by engagements descending and holds at most [`MAX_TOP_POSTS`];
/// `demographics` holds at most [`MAX_DEMOGRAPHICS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookData {
    #[serde(default)]
    pub discovery: BTreeMap<String, DiscoveryValue>,
    #[serde(default)]
    pub engagement: Vec<EngagementPoint>,
    #[serde(default)]
    pub followers: Vec<FollowerPoint>,
    #[serde(default)]
    pub total_followers: u64,
    #[serde(default)]
    pub top_posts: Vec<TopPost>,
    #[serde(default)]
    pub demographics: Vec<DemographicEntry>,
}

/// A client's analytics as persisted by the store.
///
/// Replaced wholesale on re-upload; only `start_date` is edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    /// Campaign start date used for before/after comparisons.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: WorkbookData,
}

impl ClientRecord {
    pub fn new(name: impl Into<String>, data: WorkbookData) -> Self {
        Self {
            name: name.into(),
            start_date: None,
            uploaded_at: None,
            data,
        }
    }

    /// Engagement rate per engagement day.
    pub fn engagement_rate_series(&self) -> Vec<EngagementRatePoint> {
        self.data
            .engagement
            .iter()
            .map(EngagementRatePoint::from)
            .collect()
    }

    /// Reported total impressions when the DISCOVERY sheet carries a non-zero
    /// figure, otherwise the sum of the daily impressions.
    pub fn total_impressions(&self) -> f64 {
        self.data
            .discovery
            .get("Impressions")
            .and_then(DiscoveryValue::as_number)
            .filter(|n| *n != 0.0)
            .unwrap_or_else(|| {
                self.data
                    .engagement
                    .iter()
                    .map(|p| p.impressions as f64)
                    .sum()
            })
    }

    /// Sum of the daily engagements.
    pub fn total_engagements(&self) -> f64 {
        self.data
            .engagement
            .iter()
            .map(|p| p.engagements as f64)
            .sum()
    }
}

// ── Client keys ───────────────────────────────────────────────────────────────

/// Lowercase ASCII-alphanumeric key for `name`; other runs become one `-`.
///
/// `"Acme Co."` and `"acme-co"` share the key `"acme-co"`.
pub fn client_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

// ── Period ────────────────────────────────────────────────────────────────────

/// Bucket width used when charting a series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Weekly
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// The four metrics shown as summary cards and charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Impressions,
    Engagements,
    NewFollowers,
    EngagementRate,
}

impl Metric {
    /// All metrics in card / chart order.
    pub const ALL: [Metric; 4] = [
        Metric::Impressions,
        Metric::Engagements,
        Metric::NewFollowers,
        Metric::EngagementRate,
    ];

    /// Name used as the insight lookup key.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Metric::Impressions => "Impressions",
            Metric::Engagements => "Engagements",
            Metric::NewFollowers => "New Followers",
            Metric::EngagementRate => "Engagement Rate",
        }
    }

    /// Series field carrying this metric.
    pub fn field(&self) -> &'static str {
        match self {
            Metric::Impressions => "impressions",
            Metric::Engagements => "engagements",
            Metric::NewFollowers => "new_followers",
            Metric::EngagementRate => "engagement_rate",
        }
    }

    /// Title of the summary card for this metric.
    pub fn card_title(&self) -> &'static str {
        match self {
            Metric::Impressions => "Total Impressions",
            Metric::Engagements => "Total Engagements",
            Metric::NewFollowers => "Total Followers",
            Metric::EngagementRate => "Engagement Rate",
        }
    }

    /// Suffix appended to before/after averages.
    pub fn suffix(&self) -> &'static str {
        match self {
            Metric::EngagementRate => "%",
            _ => "/day",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ── BeforeAfterStat ───────────────────────────────────────────────────────────

/// Average of a field before and on/after the campaign start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeforeAfterStat {
    pub before: f64,
    pub after: f64,
    /// Percentage change from `before` to `after`; 0 when `before` is 0.
    pub change: f64,
}

impl BeforeAfterStat {
    /// `false` when there was no start date or neither partition had data.
    pub fn has_comparison(&self) -> bool {
        self.before != 0.0 || self.after != 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_client_slug() {
        assert_eq!(client_slug("Acme Co."), "acme-co");
        assert_eq!(client_slug("  Jane   Doe  "), "jane-doe");
        assert_eq!(client_slug("--x--"), "x");
        assert_eq!(client_slug("!!!"), "");
    }

    #[test]
    fn test_engagement_rate_zero_impressions() {
        let point = EngagementPoint {
            date: date(2024, 1, 1),
            impressions: 0,
            engagements: 5,
        };
        assert_eq!(point.engagement_rate(), 0.0);
    }

    #[test]
    fn test_engagement_rate_percent() {
        let point = EngagementPoint {
            date: date(2024, 1, 1),
            impressions: 200,
            engagements: 5,
        };
        assert!((point.engagement_rate() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_series_point_field_lookup() {
        let point = EngagementPoint {
            date: date(2024, 1, 1),
            impressions: 10,
            engagements: 3,
        };
        assert_eq!(point.field("impressions"), Some(10.0));
        assert_eq!(point.field("engagements"), Some(3.0));
        assert_eq!(point.field("new_followers"), None);
    }

    #[test]
    fn test_discovery_value_as_number() {
        assert_eq!(DiscoveryValue::Number(12.0).as_number(), Some(12.0));
        assert_eq!(
            DiscoveryValue::Text("1,234".to_string()).as_number(),
            Some(1234.0)
        );
        assert_eq!(DiscoveryValue::Text("n/a".to_string()).as_number(), None);
    }

    #[test]
    fn test_total_impressions_prefers_discovery() {
        let mut data = WorkbookData::default();
        data.discovery
            .insert("Impressions".to_string(), DiscoveryValue::Number(5000.0));
        data.engagement.push(EngagementPoint {
            date: date(2024, 1, 1),
            impressions: 10,
            engagements: 1,
        });
        let record = ClientRecord::new("Acme", data);
        assert_eq!(record.total_impressions(), 5000.0);
    }

    #[test]
    fn test_total_impressions_falls_back_to_sum() {
        let mut data = WorkbookData::default();
        data.discovery
            .insert("Members reached".to_string(), DiscoveryValue::Number(90.0));
        data.engagement = vec![
            EngagementPoint {
                date: date(2024, 1, 1),
                impressions: 10,
                engagements: 1,
            },
            EngagementPoint {
                date: date(2024, 1, 2),
                impressions: 30,
                engagements: 2,
            },
        ];
        let record = ClientRecord::new("Acme", data);
        assert_eq!(record.total_impressions(), 40.0);
        assert_eq!(record.total_engagements(), 3.0);
    }

    #[test]
    fn test_period_default_is_weekly() {
        assert_eq!(Period::default(), Period::Weekly);
    }

    #[test]
    fn test_before_after_has_comparison() {
        assert!(!BeforeAfterStat::default().has_comparison());
        let stat = BeforeAfterStat {
            before: 0.0,
            after: 4.0,
            change: 0.0,
        };
        assert!(stat.has_comparison());
        assert!(stat.is_positive());
    }

    #[test]
    fn test_client_record_json_shape() {
        let mut record = ClientRecord::new("Acme", WorkbookData::default());
        record.start_date = Some(date(2024, 3, 1));
        record.data.total_followers = 1200;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["start_date"], "2024-03-01");
        assert_eq!(json["total_followers"], 1200);

        let back: ClientRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
