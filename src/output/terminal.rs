//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use super::csv::ReportRow;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One summary line for a report row.
pub fn format_summary_row(row: &ReportRow<'_>) -> String {
    format!(
        "{ip_count},{cidr},{country},{netname},{descr}",
        ip_count = format_field(row.ip_count, 10),
        cidr = format_field(row.cidr, 20),
        country = format_field(row.country, 5),
        netname = format_field(row.netname, 24),
        descr = format_field(row.descr, 0),
    )
}

/// Print the first `top` report rows to stdout.
pub fn print_summary(rows: &[ReportRow<'_>], top: usize) {
    if top == 0 {
        return;
    }
    println!(
        "{}",
        format!("# Top {} of {} matched blocks", top.min(rows.len()), rows.len()).on_blue()
    );
    for row in rows.iter().take(top) {
        println!("{}", format_summary_row(row));
    }
}
