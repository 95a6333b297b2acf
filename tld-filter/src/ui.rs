//! Display logic for the tld-filter CLI.
//!
//! Handles text and `--pretty` output: accepted record lines, the header,
//! the summary bar, and the attributed failure list shown with `--debug`.
//! Uses only the `console` crate.

use console::{pad_str, style, Alignment};
use std::time::Duration;
use tld_filter_lib::{LocalizationTable, Record, RecordFailure};

const DOMAIN_WIDTH: usize = 30;

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(record_count: usize, suffix: &str) {
    println!(
        "{} {} {}",
        style("tld-filter").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "- Classifying {} record{}",
            record_count,
            plural(record_count)
        ))
        .dim(),
    );
    println!("{}", style(format!("Suffix: {}", display_suffix(suffix))).dim());
    println!();
}

// ── Record lines ─────────────────────────────────────────────────────────────

/// Print one accepted record with colors and alignment.
pub fn print_record(record: &Record, show_info: bool) {
    let padded = pad_str(&record.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));
    let info_str = if show_info {
        format!("  {}", style(format_record_info(record)).dim())
    } else {
        String::new()
    };
    println!(
        "  {}  {} {} {}{}",
        style(&padded).white(),
        style(display_tld(record.tld())).cyan().bold(),
        style("->").dim(),
        style(display_tld(record.localized_tld())).green(),
        info_str,
    );
}

/// Print one accepted record as plain text.
pub fn print_record_default(record: &Record, show_info: bool) {
    let mut line = format!(
        "{} {} -> {}",
        record.domain,
        display_tld(record.tld()),
        display_tld(record.localized_tld())
    );
    if show_info {
        line.push_str("  ");
        line.push_str(&format_record_info(record));
    }
    println!("{}", line);
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar.
pub fn print_summary(total: usize, accepted: usize, duration: Duration) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} record{} in {:.3}s  {}  {}  {}  {}",
        style(total).bold(),
        plural(total),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} accepted", accepted)).green(),
        style("|").dim(),
        style(format!("{} filtered out", total - accepted)).yellow(),
    );
}

// ── Failures ─────────────────────────────────────────────────────────────────

/// Print every rejected record with its rank and domain (stderr).
pub fn print_failures(failures: &[RecordFailure]) {
    eprintln!(
        "  {}",
        style(format!(
            "{} record{} rejected:",
            failures.len(),
            plural(failures.len())
        ))
        .red()
    );
    for failure in failures {
        eprintln!("  {} {}", style("•").dim(), failure.describe());
    }
}

// ── Localization table ───────────────────────────────────────────────────────

/// Print the active global -> localized pairs (stderr, `--debug`).
pub fn print_table(table: &LocalizationTable) {
    eprintln!(
        "  {}",
        style(format!(
            "Localization table ({} pair{}):",
            table.len(),
            plural(table.len())
        ))
        .dim()
    );
    if table.is_empty() {
        eprintln!("    {}", style("(empty)").dim());
    }
    for (tld, localized) in table.entries() {
        eprintln!("    {} -> {}", tld, localized);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Concise rank / reference-count string for `--info`.
pub fn format_record_info(record: &Record) -> String {
    format!("rank: {}, refs: {}", record.rank, record.ref_count)
}

fn display_tld(tld: &str) -> &str {
    if tld.is_empty() {
        "(none)"
    } else {
        tld
    }
}

fn display_suffix(suffix: &str) -> &str {
    if suffix.is_empty() {
        "(any)"
    } else {
        suffix
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_info() {
        let record = Record::new(7, "google.com", true, 100);
        assert_eq!(format_record_info(&record), "rank: 7, refs: 100");
    }

    #[test]
    fn test_display_tld_empty() {
        assert_eq!(display_tld(""), "(none)");
        assert_eq!(display_tld(".com"), ".com");
    }

    #[test]
    fn test_display_suffix_empty() {
        assert_eq!(display_suffix(""), "(any)");
        assert_eq!(display_suffix(".org"), ".org");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(3), "s");
    }
}
