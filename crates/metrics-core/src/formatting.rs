use chrono::NaiveDate;

use crate::models::Period;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use metrics_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Compact display used on cards and chart axes.
///
/// * `≥ 1,000,000` → `"1.2M"`
/// * `≥ 1,000` → `"3.4K"`
/// * otherwise the rounded integer with thousands separators.
///
/// # Examples
///
/// ```
/// use metrics_core::formatting::format_compact;
///
/// assert_eq!(format_compact(1_250_000.0), "1.3M");
/// assert_eq!(format_compact(3_400.0), "3.4K");
/// assert_eq!(format_compact(999.6), "1,000");
/// ```
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", format_number(value / 1_000_000.0, 1))
    } else if value >= 1_000.0 {
        format!("{}K", format_number(value / 1_000.0, 1))
    } else {
        format_number(value, 0)
    }
}

/// Arrow plus absolute percentage, e.g. `"↑ 12.5%"` or `"↓ 3.0%"`.
pub fn format_change(change: f64) -> String {
    let arrow = if change >= 0.0 { '↑' } else { '↓' };
    format!("{} {}%", arrow, format_number(change.abs(), 1))
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use metrics_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Human label for a bucket key: `"Jan 24"` for monthly keys, `"Jan 5"` for
/// day and week keys. Keys that do not parse are returned unchanged.
pub fn format_period_label(key: &str, period: Period) -> String {
    match period {
        Period::Monthly => NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
            .map(|d| d.format("%b %y").to_string())
            .unwrap_or_else(|_| key.to_string()),
        Period::Daily | Period::Weekly => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| d.format("%b %-d").to_string())
            .unwrap_or_else(|_| key.to_string()),
    }
}

/// `"Today"`, `"1 day ago"` or `"N days ago"`.
pub fn format_days_ago(days: i64) -> String {
    match days {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero() {
        assert_eq!(format_number(-0.01, 0), "0");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── format_compact ───────────────────────────────────────────────────────

    #[test]
    fn test_format_compact_millions() {
        assert_eq!(format_compact(2_000_000.0), "2.0M");
        assert_eq!(format_compact(1_250_000.0), "1.3M");
    }

    #[test]
    fn test_format_compact_thousands() {
        assert_eq!(format_compact(1_000.0), "1.0K");
        assert_eq!(format_compact(12_345.0), "12.3K");
    }

    #[test]
    fn test_format_compact_small() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(42.4), "42");
        assert_eq!(format_compact(42.5), "43");
    }

    // ── format_change ────────────────────────────────────────────────────────

    #[test]
    fn test_format_change_positive() {
        assert_eq!(format_change(12.34), "↑ 12.3%");
        assert_eq!(format_change(0.0), "↑ 0.0%");
    }

    #[test]
    fn test_format_change_negative() {
        assert_eq!(format_change(-3.0), "↓ 3.0%");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(50.0, 200.0, 1);
        assert!((p - 25.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 2);
        assert!((p - 33.33).abs() < 1e-2, "percentage = {p}");
    }

    // ── format_period_label ──────────────────────────────────────────────────

    #[test]
    fn test_period_label_daily_and_weekly() {
        assert_eq!(format_period_label("2024-01-05", Period::Daily), "Jan 5");
        assert_eq!(format_period_label("2023-12-31", Period::Weekly), "Dec 31");
    }

    #[test]
    fn test_period_label_monthly() {
        assert_eq!(format_period_label("2024-03", Period::Monthly), "Mar 24");
    }

    #[test]
    fn test_period_label_unparseable_passthrough() {
        assert_eq!(format_period_label("week-1", Period::Weekly), "week-1");
    }

    // ── format_days_ago ──────────────────────────────────────────────────────

    #[test]
    fn test_format_days_ago() {
        assert_eq!(format_days_ago(0), "Today");
        assert_eq!(format_days_ago(1), "1 day ago");
        assert_eq!(format_days_ago(12), "12 days ago");
    }

    // ── group_thousands (via format_number) ──────────────────────────────────

    #[test]
    fn test_group_thousands_seven_digits() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }
}
