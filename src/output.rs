//! Plain console presentation: a spinner while commits are pulled, then a
//! coloured report.

use std::fmt::Write as _;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::service::{DayBucket, VelocityReport};

pub fn banner() -> String {
    format!("{}", "Git Velocity".yellow().bold())
}

/// Spinner shown while a long-running step is in progress
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn format_change(report: &VelocityReport) -> String {
    match report.change_percent() {
        None => "n/a (no commits in the previous period)".dimmed().to_string(),
        Some(change) if change >= 0.0 => format!("+{:.1}%", change).green().to_string(),
        Some(change) => format!("{:.1}%", change).red().to_string(),
    }
}

fn format_difference(report: &VelocityReport) -> String {
    match report.difference() {
        d if d > 0 => format!("+{}", d).green().to_string(),
        d => d.to_string().red().to_string(),
    }
}

fn format_buckets(buckets: &[DayBucket]) -> String {
    buckets
        .iter()
        .map(|b| format!("{:>4}", b.count))
        .collect::<Vec<_>>()
        .join("")
}

/// Render the report as text; colour codes are included unless disabled globally
pub fn render_report(report: &VelocityReport) -> String {
    let mut out = String::new();
    let period = report.format.period_name();

    let _ = writeln!(
        out,
        "Your {} commit velocity is...",
        report.format.adjective()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<18}{}",
        format!("Current {}:", period),
        report.current.to_string().green().bold()
    );
    let _ = writeln!(
        out,
        "  {:<18}{}",
        format!("Previous {}:", period),
        report.previous.to_string().yellow()
    );
    let _ = writeln!(out, "  {:<18}{}", "Difference:", format_difference(report));
    let _ = writeln!(out, "  {:<18}{}", "Change:", format_change(report));
    let _ = writeln!(out);

    let labels: String = report
        .current_buckets
        .iter()
        .map(|b| format!("{:>4}", b.label))
        .collect();
    let _ = writeln!(out, "  {:<10}{}", "", labels.dimmed());
    let _ = writeln!(
        out,
        "  {:<10}{}",
        "current",
        format_buckets(&report.current_buckets).green()
    );
    let _ = writeln!(
        out,
        "  {:<10}{}",
        "previous",
        format_buckets(&report.previous_buckets).yellow()
    );

    out
}
