use owo_colors::OwoColorize;

use nightly_core::{EnrichSummary, RunReport};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Nightly".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Trending repositories from Changelog Nightly\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let indicator = if ms < 1000.0 {
        "fast".dimmed().to_string()
    } else if ms < 10_000.0 {
        "moderate".bright_yellow().to_string()
    } else {
        "slow".bright_red().to_string()
    };

    eprintln!("  {} {:>10.2}ms ({})", format!("{}:", label).dimmed(), ms, indicator);
}

/// Print the per-category counts and enrichment tally of a run
pub fn print_run_summary(report: &RunReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{} {}", "Digest".bold().cyan(), report.date.to_string().dimmed());
    eprintln!("{}", "═".repeat(60).dimmed());

    for category in nightly_core::Category::ALL {
        let found = report.trending().category(category).len();
        let skipped = report.digest.skipped_in(category);
        eprintln!(
            "  {} {} {}",
            format!("{:<18}", category.json_key()).dimmed(),
            found.to_string().bright_white(),
            if skipped > 0 { format!("({} skipped)", skipped).dimmed().to_string() } else { String::new() }
        );
    }

    if let Some(EnrichSummary { found, missing, failed }) = report.enrichment {
        eprintln!(
            "  {} {} found, {} without image, {} failed",
            format!("{:<18}", "Screenshots").dimmed(),
            found.to_string().bright_white(),
            missing,
            failed
        );
    }
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
