//! Formatting and reporting for check results

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::check::CheckStatus;
use super::runner::HealthCheckReport;

/// Formats a report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Duration", "Summary"]);

    for (name, result) in &report.results {
        let duration = format!("{:.2?}", result.duration);
        builder.push_record([
            name.as_str(),
            &result.status.as_colored_str(),
            &duration,
            &result.message,
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut summary = format!("\n{}\n", "Summary".bold().underline());
    summary.push_str(&format!("  Total checks: {}\n", report.total));
    summary.push_str(&format!("  {} Passed: {}\n", CheckStatus::Pass.marker(), report.passed));
    if report.warned > 0 {
        summary.push_str(&format!("  {} Warned: {}\n", CheckStatus::Warn.marker(), report.warned));
    }
    if report.failed > 0 {
        summary.push_str(&format!("  {} Failed: {}\n", CheckStatus::Fail.marker(), report.failed));
    }

    summary.push('\n');
    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "Overall: UNHEALTHY".red().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "Overall: HEALTHY".green().bold(),
    };
    summary.push_str(&format!("  {overall}\n"));
    summary
}

/// Formats the findings of every check
///
/// With `verbose` unset only warnings and failures are listed.
pub fn format_findings(report: &HealthCheckReport, verbose: bool) -> String {
    let threshold = if verbose {
        CheckStatus::Pass
    } else {
        CheckStatus::Warn
    };

    let mut output = String::new();
    for (name, result) in &report.results {
        let mut findings = result.findings_at_least(threshold).peekable();
        if findings.peek().is_none() {
            continue;
        }
        output.push_str(&format!("\n{}\n", name.bold()));
        for finding in findings {
            output.push_str(&format!("  {} {}\n", finding.status.marker(), finding.text));
        }
    }
    output
}

/// Prints a report to stdout
pub fn print_report(report: &HealthCheckReport, verbose: bool) {
    println!("{}", format_report(report));
    let findings = format_findings(report, verbose);
    if !findings.is_empty() {
        println!("{}", "Findings".bold().underline());
        print!("{findings}");
    }
}
