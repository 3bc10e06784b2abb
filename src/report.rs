// 📝 Reporting - console analysis report + plain-text summary file

use crate::aggregation::{ColumnStats, DatasetOverview, GroupTotal, SalesInsights};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const SUMMARY_HEADER: &str = "=== SALES DATA ANALYSIS SUMMARY ===";

const MISSING: &str = "N/A";

// ============================================================================
// FORMATTING
// ============================================================================

/// `$1,234.56` (or `$1234.56` without separators). Negative values keep the sign
/// in front of the dollar sign.
pub fn format_currency(value: f64, thousands: bool) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let int_part = if thousands {
        group_thousands(int_part)
    } else {
        int_part.to_string()
    };

    format!("{}${}.{}", sign, int_part, frac_part)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn push_ranking(out: &mut String, title: &str, totals: &[GroupTotal], limit: usize) {
    out.push_str(&format!("\n{}\n", title));
    if totals.is_empty() {
        out.push_str("  (no data)\n");
        return;
    }
    let width = totals.iter().map(|g| g.key.len()).max().unwrap_or(0);
    for g in totals.iter().take(limit) {
        out.push_str(&format!("  {:<width$}  {:>14.2}\n", g.key, g.total, width = width));
    }
}

// ============================================================================
// CONSOLE REPORT
// ============================================================================

/// Dataset info, basic statistics and the grouped rankings, as printed to stdout
pub fn render_console_report(
    overview: &DatasetOverview,
    stats: &[ColumnStats],
    insights: &SalesInsights,
    top_n: usize,
) -> String {
    let date_range = match (overview.first_date, overview.last_date) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => MISSING.to_string(),
    };

    let mut out = format!(
        "=== DATASET INFO ===\n\
         Total records: {}\n\
         Date range: {}\n\
         Products: {}\n\
         Regions: {}\n\
         Salespeople: {}\n",
        overview.record_count,
        date_range,
        overview.product_count,
        overview.region_count,
        overview.salesperson_count,
    );

    out.push_str("\n=== BASIC STATISTICS ===\n");
    out.push_str(&format!(
        "{:<12} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for s in stats {
        out.push_str(&format!(
            "{:<12} {:>7} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}\n",
            s.column, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
        ));
    }

    out.push_str("\n=== SALES ANALYSIS ===\n");
    push_ranking(
        &mut out,
        &format!("Top {} Products by Sales:", top_n),
        &insights.by_product,
        top_n,
    );
    push_ranking(&mut out, "Sales by Region:", &insights.by_region, usize::MAX);
    push_ranking(
        &mut out,
        "Sales by Salesperson:",
        &insights.by_salesperson,
        usize::MAX,
    );

    out.push_str("\nMonthly Sales Trend:\n");
    if insights.monthly.is_empty() {
        out.push_str("  (no data)\n");
    }
    for m in insights.monthly.iter().take(top_n) {
        out.push_str(&format!("  {}  {:>14.2}\n", m.month, m.total));
    }

    out
}

// ============================================================================
// SUMMARY FILE
// ============================================================================

/// Fixed-format summary: header, blank line, then one line per insight
pub fn render_summary(insights: &SalesInsights) -> String {
    format!(
        "{}\n\n\
         Total Sales: {}\n\
         Average Transaction: {}\n\
         Best Product: {}\n\
         Top Region: {}\n\
         Top Salesperson: {}\n",
        SUMMARY_HEADER,
        format_currency(insights.total_sales, true),
        format_currency(insights.avg_transaction, false),
        insights.best_product().unwrap_or(MISSING),
        insights.top_region().unwrap_or(MISSING),
        insights.top_salesperson().unwrap_or(MISSING),
    )
}

pub fn write_summary(path: &Path, insights: &SalesInsights) -> Result<()> {
    fs::write(path, render_summary(insights))
        .with_context(|| format!("Failed to write summary file: {:?}", path))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::MonthlyTotal;
    use crate::dataset::YearMonth;

    fn create_test_insights() -> SalesInsights {
        SalesInsights {
            by_product: vec![
                GroupTotal { key: "Laptop".into(), total: 12345.6 },
                GroupTotal { key: "Mouse".into(), total: 99.0 },
            ],
            by_region: vec![GroupTotal { key: "West".into(), total: 12444.6 }],
            by_salesperson: vec![GroupTotal { key: "Diana".into(), total: 12444.6 }],
            monthly: vec![MonthlyTotal { month: YearMonth::new(2023, 4), total: 12444.6 }],
            total_sales: 1234567.891,
            avg_transaction: 1234.5,
            record_count: 3,
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.891, true), "$1,234,567.89");
        assert_eq!(format_currency(999.5, true), "$999.50");
        assert_eq!(format_currency(1000.0, true), "$1,000.00");
        assert_eq!(format_currency(1234.5, false), "$1234.50");
        assert_eq!(format_currency(0.0, true), "$0.00");
        assert_eq!(format_currency(-4321.0, true), "-$4,321.00");
    }

    #[test]
    fn test_summary_lines() {
        let summary = render_summary(&create_test_insights());
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(
            lines,
            vec![
                SUMMARY_HEADER,
                "",
                "Total Sales: $1,234,567.89",
                "Average Transaction: $1234.50",
                "Best Product: Laptop",
                "Top Region: West",
                "Top Salesperson: Diana",
            ]
        );
    }

    #[test]
    fn test_summary_missing_keys_use_placeholder() {
        let summary = render_summary(&SalesInsights::compute(&[]));

        assert!(summary.contains("Best Product: N/A"));
        assert!(summary.contains("Top Region: N/A"));
        assert!(summary.contains("Top Salesperson: N/A"));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");

        write_summary(&path, &create_test_insights()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_summary(&create_test_insights()));
    }

    #[test]
    fn test_console_report_sections() {
        let insights = create_test_insights();
        let overview = DatasetOverview {
            record_count: 3,
            first_date: chrono::NaiveDate::from_ymd_opt(2023, 4, 1),
            last_date: chrono::NaiveDate::from_ymd_opt(2023, 4, 30),
            product_count: 2,
            region_count: 1,
            salesperson_count: 1,
        };
        let stats = vec![ColumnStats::describe("Total_Sales", &[1.0, 2.0, 3.0]).unwrap()];

        let report = render_console_report(&overview, &stats, &insights, 5);

        assert!(report.contains("=== DATASET INFO ==="));
        assert!(report.contains("Total records: 3"));
        assert!(report.contains("Date range: 2023-04-01 to 2023-04-30"));
        assert!(report.contains("=== BASIC STATISTICS ==="));
        assert!(report.contains("Total_Sales"));
        assert!(report.contains("Top 5 Products by Sales:"));
        assert!(report.contains("Laptop"));
        assert!(report.contains("2023-04"));
    }
}
