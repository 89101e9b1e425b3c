//! Terminal output styling for the CLI's human-facing status lines.
//!
//! Diagnostic detail goes through the `log` facade; these helpers only
//! render the handful of progress and summary lines a user watches.

use console::style;

pub fn status(msg: &str) {
    println!("{} {}", style("»").cyan(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Prints an indented key/value detail line under a status or summary.
pub fn detail(key: &str, value: &str) {
    println!("  {} {}", style(format!("{key}:")).dim(), value);
}
