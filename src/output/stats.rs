//! Statistics display for saved category reports

use crate::output::traits::CategoryReport;
use std::fmt::Write;

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Renders a report's statistics as human-readable text
///
/// # Arguments
///
/// * `report` - The report to summarize
pub fn format_statistics(report: &CategoryReport) -> String {
    let stats = &report.statistics;
    let total = report.total_games;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== {} ===\n", report.category.to_uppercase());
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Games: {}", total);
    let _ = writeln!(out, "  Scraped at: {}", report.scraped_at);
    let _ = writeln!(out);

    let _ = writeln!(out, "Detail Coverage:");
    let _ = writeln!(
        out,
        "  With description: {}/{} ({:.1}%)",
        stats.with_description,
        total,
        percentage(stats.with_description, total)
    );
    let _ = writeln!(
        out,
        "  With features: {}/{} ({:.1}%)",
        stats.with_features,
        total,
        percentage(stats.with_features, total)
    );
    let _ = writeln!(
        out,
        "  With reviews: {}/{} ({} reviews)",
        stats.with_reviews, total, stats.total_reviews
    );

    let embeddable = report.games.iter().filter(|g| g.is_embeddable).count();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Embeddable: {:.1}% ({} / {} games)",
        percentage(embeddable, total),
        embeddable,
        total
    );

    out
}

/// Prints a report's statistics to stdout
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_statistics(report: &CategoryReport) {
    print!("{}", format_statistics(report));
}
