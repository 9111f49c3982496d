//! Report output.
//!
//! - [`csv`] - ranked CSV report
//! - [`terminal`] - summary of the top rows on stdout

mod csv;
mod terminal;

pub use self::csv::{report_rows, write_report, write_report_file, ReportRow, REPORT_HEADER};
pub use terminal::{format_field, print_summary};
