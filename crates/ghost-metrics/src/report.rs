//! Plain-text reports printed by the CLI.
//!
//! Each function returns the finished text so it can be asserted on in
//! tests; `main` only prints it.

use metrics_core::formatting::{format_change, format_compact, format_days_ago, format_number};
use metrics_core::models::{ClientRecord, DemographicEntry, Metric};
use metrics_data::summary::{ChartSeries, SummaryCard, TopPostsTable};

const RULE: &str = "────────────────────────────────────────────────────────────";

fn heading(title: &str) -> Vec<String> {
    vec![title.to_string(), RULE.to_string()]
}

/// Before/after figures use two decimals for the rate, compact form otherwise.
fn format_average(metric: Metric, value: f64) -> String {
    match metric {
        Metric::EngagementRate => format_number(value, 2),
        _ => format_compact(value),
    }
}

// ── Upload / list ─────────────────────────────────────────────────────────────

pub fn render_upload(record: &ClientRecord) -> String {
    let data = &record.data;
    let mut lines = vec![format!("Stored analytics for {}", record.name)];
    lines.push(format!("  engagement days : {}", data.engagement.len()));
    lines.push(format!("  follower days   : {}", data.followers.len()));
    lines.push(format!("  top posts       : {}", data.top_posts.len()));
    lines.push(format!("  demographics    : {}", data.demographics.len()));
    if let Some(start) = record.start_date {
        lines.push(format!("  start date kept : {}", start));
    }
    lines.join("\n")
}

/// One line per client with the UTC date of its last upload.
pub fn render_client_list(records: &[ClientRecord]) -> String {
    if records.is_empty() {
        return "No clients stored yet. Use `ghost-metrics upload <file> --client <name>`."
            .to_string();
    }
    let width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let mut lines = heading(&format!("{} client(s)", records.len()));
    lines.extend(records.iter().map(|r| {
        let uploaded = r
            .uploaded_at
            .map(|at| at.date_naive().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        format!("  {:<width$}  uploaded {}", r.name, uploaded, width = width)
    }));
    lines.join("\n")
}

// ── Summary ───────────────────────────────────────────────────────────────────

pub fn render_summary(client: &str, cards: &[SummaryCard]) -> String {
    let mut lines = heading(&format!("{}: summary", client));

    for card in cards {
        lines.push(String::new());
        lines.push(format!("{:<18} {}", card.title, card.display_total()));

        if let Some(insight) = &card.insight {
            lines.push(format!("  {}", insight.benchmark));
        }

        if card.has_comparison {
            lines.push(format!(
                "  Before {}{}  After {}{}  {}",
                format_average(card.metric, card.stat.before),
                card.suffix,
                format_average(card.metric, card.stat.after),
                card.suffix,
                format_change(card.stat.change)
            ));
        } else {
            lines.push("  Set start date to see comparison".to_string());
        }

        if let Some(insight) = &card.insight {
            lines.push(format!("  {}", insight.definition));
        }
        for advice in card.advice() {
            lines.push(format!("    - {}", advice));
        }
    }

    lines.join("\n")
}

pub fn render_demographics(entries: &[DemographicEntry]) -> String {
    let mut lines = heading("Top job titles");
    if entries.is_empty() {
        lines.push("  No demographic data".to_string());
    }
    for entry in entries {
        lines.push(format!(
            "  {:<40} {:>6}%",
            entry.label,
            format_number(entry.percentage, 1)
        ));
    }
    lines.join("\n")
}

// ── Chart ─────────────────────────────────────────────────────────────────────

pub fn render_chart(chart: &ChartSeries) -> String {
    let mut lines = heading(&format!("{} ({})", chart.metric, chart.period));
    if chart.is_empty() {
        lines.push("  No data".to_string());
        return lines.join("\n");
    }

    for (i, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let marker = if chart.start_index == Some(i) {
            "  <- campaign start"
        } else {
            ""
        };
        let shown = match chart.metric {
            Metric::EngagementRate => format!("{}%", format_number(*value, 2)),
            _ => format_number(*value, 0),
        };
        lines.push(format!("  {:<8} {:>12}{}", label, shown, marker));
    }
    lines.join("\n")
}

// ── Top posts ─────────────────────────────────────────────────────────────────

pub fn render_top_posts(table: &TopPostsTable, start_known: bool) -> String {
    let mut lines = heading("Top posts");
    if table.rows.is_empty() {
        lines.push("  No post data available".to_string());
        return lines.join("\n");
    }

    if start_known && table.attributed_count > 0 {
        lines.push(format!(
            "  {} of {} top posts created after the start date",
            table.attributed_count,
            table.rows.len()
        ));
    }

    lines.push(format!(
        "  {:<12} {:<11} {:<14} {:>11} {:>12} {:>7}",
        "ID", "Date", "Posted", "Engagements", "Impressions", "Rate"
    ));
    for row in &table.rows {
        let date = row
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let posted = row
            .days_ago
            .map(format_days_ago)
            .unwrap_or_else(|| "-".to_string());
        let flag = if row.attributed { " *" } else { "" };
        lines.push(format!(
            "  ...{:<9} {:<11} {:<14} {:>11} {:>12} {:>6}%{}",
            row.short_id(),
            date,
            posted,
            format_number(row.engagements as f64, 0),
            format_number(row.impressions as f64, 0),
            row.engagement_rate,
            flag
        ));
    }
    lines.join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
