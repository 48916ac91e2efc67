//! CLI command implementations.

pub mod inspect;
pub mod normalize;
pub mod run;

use colored::Colorize;
use langbase::RejectedRow;

/// Print up to `limit` rejected rows.
pub(crate) fn print_rejected(rows: &[RejectedRow], limit: usize) {
    for row in rows.iter().take(limit) {
        println!(
            "    {} {} {}",
            format!("line {}:", row.line).yellow(),
            row.raw(','),
            format!("({})", row.reason).dimmed()
        );
    }
    if rows.len() > limit && limit > 0 {
        println!("    ... {} more", rows.len() - limit);
    }
}
