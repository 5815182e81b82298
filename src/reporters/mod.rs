//! Output reporters for manual-debt analysis results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `sarif` - SARIF 2.1.0 for GitHub Code Scanning / VS Code

mod json;
mod sarif;
mod text;

use crate::models::AnalysisReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Sarif,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, sarif",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

/// Render an analysis report in the specified format
pub fn report(report: &AnalysisReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render an analysis report using an OutputFormat enum
pub fn report_with_format(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Sarif => sarif::render(report),
    }
}

/// Render the list of registered diagnostics
///
/// SARIF has no standalone rule listing, so it falls back to JSON.
pub fn rules_report(format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_rules()),
        OutputFormat::Json | OutputFormat::Sarif => json::render_rules(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{DebtSummary, DiagnosticReport, Location, Severity};

    /// Create a small AnalysisReport for testing
    pub(crate) fn test_report() -> AnalysisReport {
        let diagnostics = vec![
            DiagnosticReport {
                id: "a1b2c3d4e5f60718".into(),
                rule_id: "ManualDebt30Days".into(),
                remediation_cost_days: 30,
                severity: Severity::Info,
                category: "TechnicalDebt".into(),
                title: "Manual technical debt: 30 days".into(),
                message: "'ManualTechnicalDebt' declares 30 days of manual technical debt"
                    .into(),
                location: Location::new("src/Billing.cs", 12, 5),
                display_name: "ManualTechnicalDebt".into(),
            },
            DiagnosticReport {
                id: "0f1e2d3c4b5a6978".into(),
                rule_id: "ManualDebt5Days".into(),
                remediation_cost_days: 5,
                severity: Severity::Info,
                category: "TechnicalDebt".into(),
                title: "Manual technical debt: 5 days".into(),
                message: "'ManualTechnicalDebt' declares 5 days of manual technical debt".into(),
                location: Location::new("src/Billing.cs", 12, 5),
                display_name: "ManualTechnicalDebt".into(),
            },
        ];

        AnalysisReport {
            summary: DebtSummary::from_diagnostics(&diagnostics),
            diagnostics,
            files_analyzed: 4,
            annotations_matched: 1,
            errors: Vec::new(),
            duration_ms: 7,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("sarif").unwrap(),
            OutputFormat::Sarif
        );
        assert!(OutputFormat::from_str("html").is_err());
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Sarif] {
            assert_eq!(OutputFormat::from_str(&format.to_string()).unwrap(), format);
        }
    }

    #[test]
    fn test_report_dispatch() {
        let report = test_report();
        assert!(super::report(&report, "json").unwrap().starts_with('{'));
        assert!(super::report(&report, "xml").is_err());
    }
}
