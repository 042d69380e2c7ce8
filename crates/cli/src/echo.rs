use owo_colors::OwoColorize;
use referent_core::Extraction;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Referent".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Extract article text and derive summaries from it\n".dimmed());
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

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 1000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print extraction details summary
pub fn print_extraction_details(extraction: &Extraction) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extraction Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    let strategy = extraction.strategy.map(|s| s.name()).unwrap_or("none");
    eprintln!("  {} {}", "Strategy:".dimmed(), strategy.bright_white());

    if let Some(content) = extraction.content() {
        eprintln!(
            "  {} {}",
            "Length:".dimmed(),
            format!("{} chars", content.chars().count()).bright_white()
        );
    }
    if let Some(title) = &extraction.metadata.title {
        eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
    }
    if let Some(date) = &extraction.metadata.date {
        eprintln!("  {} {}", "Date:".dimmed(), date.bright_white());
    }
    eprintln!();
}

/// Print timing summary
pub fn print_timing_summary(total: std::time::Duration, timings: &[(&str, std::time::Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
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
