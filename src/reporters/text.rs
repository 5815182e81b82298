//! Text (terminal) reporter with colors and formatting

use crate::models::{AnalysisReport, DiagnosticReport, Severity};
use crate::registry::RuleRegistry;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Diagnostics shown before the listing is cut short
const MAX_LISTED: usize = 50;

/// Severity colors
fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",   // Red
        Severity::Warning => "\x1b[33m", // Yellow
        Severity::Info => "\x1b[34m",    // Blue
    }
}

/// Severity tag
fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "[E]",
        Severity::Warning => "[W]",
        Severity::Info => "[I]",
    }
}

/// Color the total by how much debt is declared
fn days_color(days: u64) -> &'static str {
    match days {
        0 => "\x1b[32m",
        1..=29 => "\x1b[33m",
        _ => "\x1b[31m",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str(&format!("\n{BOLD}Manual Technical Debt{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Total: {}{BOLD}{} days{RESET}  Diagnostics: {}  Annotations: {}  Files: {}/{}\n\n",
        days_color(summary.total_days),
        summary.total_days,
        summary.total,
        report.annotations_matched,
        summary.files_with_debt,
        report.files_analyzed
    ));

    if !report.diagnostics.is_empty() {
        out.push_str(&format!(
            "{DIM}  SEV  DAYS  RULE               LOCATION{RESET}\n"
        ));
        out.push_str(&format!(
            "{DIM}  ─────────────────────────────────────────────────────────────────{RESET}\n"
        ));

        for diagnostic in report.diagnostics.iter().take(MAX_LISTED) {
            let sev_c = severity_color(&diagnostic.severity);
            out.push_str(&format!(
                "  {sev_c}{}{RESET}  {:>4}  {:<18} {DIM}{}{RESET}\n",
                severity_tag(&diagnostic.severity),
                diagnostic.remediation_cost_days,
                diagnostic.rule_id,
                format_location(diagnostic)
            ));
        }

        let remaining = report.diagnostics.len().saturating_sub(MAX_LISTED);
        if remaining > 0 {
            out.push_str(&format!(
                "\n  {DIM}...and {} more (use --format json for the full list){RESET}\n",
                remaining
            ));
        }
        out.push('\n');
    }

    if !summary.by_rule.is_empty() {
        out.push_str(&format!("{BOLD}BY RULE{RESET}\n"));
        for (rule, count) in &summary.by_rule {
            out.push_str(&format!("  {:<18} {}\n", rule, count));
        }
        out.push('\n');
    }

    if report.has_errors() {
        out.push_str(&format!(
            "{BOLD}\x1b[31mERRORS{RESET} ({})\n",
            report.errors.len()
        ));
        for error in &report.errors {
            out.push_str(&format!("  {}: {}\n", error.file.display(), error.message));
        }
        out.push('\n');
    }

    if report.diagnostics.is_empty() && !report.has_errors() {
        out.push_str(&format!(
            "{DIM}No manual technical debt declared.{RESET}\n"
        ));
    }

    Ok(out)
}

/// Table of every registered bucket
pub fn render_rules() -> String {
    let registry = RuleRegistry::initialize();
    let mut out = String::new();

    out.push_str(&format!(
        "\n{BOLD}Registered diagnostics{RESET} ({})\n",
        registry.len()
    ));
    out.push_str(&format!(
        "{DIM}  RULE               DAYS  SEVERITY  CATEGORY{RESET}\n"
    ));
    for bucket in registry.all_buckets() {
        out.push_str(&format!(
            "  {:<18} {:>4}  {:<8}  {}\n",
            bucket.identifier,
            bucket.remediation_cost_days,
            bucket.severity.to_string(),
            bucket.category
        ));
    }
    out
}

/// `file:line:col`, shortened from the left when long
fn format_location(diagnostic: &DiagnosticReport) -> String {
    let file_str = diagnostic.location.file.display().to_string();
    let short_file = if file_str.chars().count() > 40 {
        let skip = file_str.chars().count() - 37;
        format!("...{}", file_str.chars().skip(skip).collect::<String>())
    } else {
        file_str
    };
    format!(
        "{}:{}:{}",
        short_file, diagnostic.location.line, diagnostic.location.column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisError, Location};
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_lists_diagnostics() {
        let out = render(&test_report()).expect("render text");
        assert!(out.contains("35 days"));
        assert!(out.contains("ManualDebt30Days"));
        assert!(out.contains("src/Billing.cs:12:5"));
        assert!(!out.contains("ERRORS"));
    }

    #[test]
    fn test_text_render_empty() {
        let out = render(&AnalysisReport::default()).expect("render text");
        assert!(out.contains("No manual technical debt declared."));
    }

    #[test]
    fn test_text_render_errors() {
        let mut report = test_report();
        report.errors.push(AnalysisError {
            file: "src/Huge.cs".into(),
            message: "value too large".into(),
        });
        let out = render(&report).expect("render text");
        assert!(out.contains("ERRORS"));
        assert!(out.contains("src/Huge.cs: value too large"));
    }

    #[test]
    fn test_long_paths_are_shortened() {
        let diagnostic = DiagnosticReport {
            location: Location::new(
                "src/Company/Product/Feature/Subfeature/Legacy/VeryOldService.cs",
                3,
                1,
            ),
            ..Default::default()
        };
        let location = format_location(&diagnostic);
        assert!(location.starts_with("..."));
        assert!(location.ends_with("VeryOldService.cs:3:1"));
    }

    #[test]
    fn test_rules_table() {
        let out = render_rules();
        assert!(out.contains("(18)"));
        assert!(out.contains("ManualDebt1Day"));
        assert!(out.contains("ManualDebt90Days"));
    }
}
