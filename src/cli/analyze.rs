//! Analyze command - run the ManualTechnicalDebt analyzer over a path

use crate::config::load_project_config;
use crate::engine::AnalysisEngine;
use crate::models::AnalysisReport;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Exit code when --fail-on is reached
const EXIT_THRESHOLD: i32 = 1;
/// Exit code when some annotations or files could not be analyzed
const EXIT_ANALYSIS_ERRORS: i32 = 2;

/// Analyze flags as given on the command line; unset values fall back to config
#[derive(Debug, Default)]
pub(super) struct AnalyzeOptions {
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub workers: Option<usize>,
    pub fail_on: Option<u64>,
    pub min_days: Option<u32>,
}

pub(super) fn run(path: &Path, options: AnalyzeOptions) -> Result<()> {
    let config = load_project_config(path);
    let defaults = &config.defaults;

    let format: OutputFormat = options
        .format
        .or_else(|| defaults.format.clone())
        .as_deref()
        .unwrap_or("text")
        .parse()?;
    let workers = options.workers.or(defaults.workers).unwrap_or(0);
    let fail_on = options.fail_on.or(defaults.fail_on);
    let min_days = options.min_days.or(defaults.min_days);

    let mut engine =
        AnalysisEngine::with_manual_debt_analyzer(workers).with_exclude(&config.exclude)?;
    if let Some(severity) = config.diagnostics.severity {
        engine = engine.with_severity(severity);
    }

    let mut report = engine.analyze_path(path)?;
    info!("Analysis finished in {}ms", report.duration_ms);

    // Threshold applies to everything declared, not just what is displayed
    let total_days = report.summary.total_days;
    if let Some(min) = min_days {
        report.retain_min_days(min);
    }

    let rendered = reporters::report_with_format(&report, format)?;
    write_output(&rendered, options.output.as_deref())?;

    check_exit_status(&report, total_days, fail_on);
    Ok(())
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(out_path) => {
            std::fs::write(out_path, rendered)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(out_path.display()).cyan()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Exit code for a finished run, if it is not 0
fn exit_code(report: &AnalysisReport, total_days: u64, fail_on: Option<u64>) -> Option<i32> {
    if report.has_errors() {
        return Some(EXIT_ANALYSIS_ERRORS);
    }
    match fail_on {
        Some(threshold) if total_days >= threshold => Some(EXIT_THRESHOLD),
        _ => None,
    }
}

fn check_exit_status(report: &AnalysisReport, total_days: u64, fail_on: Option<u64>) {
    match exit_code(report, total_days, fail_on) {
        Some(EXIT_ANALYSIS_ERRORS) => {
            eprintln!(
                "{} {} annotation(s) or file(s) could not be analyzed",
                style("✗").red(),
                report.errors.len()
            );
            std::process::exit(EXIT_ANALYSIS_ERRORS);
        }
        Some(code) => {
            if let Some(threshold) = fail_on {
                eprintln!(
                    "Failing due to --fail-on={} threshold ({} days declared)",
                    threshold, total_days
                );
            }
            std::process::exit(code);
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisError;

    #[test]
    fn test_exit_code_threshold() {
        let report = AnalysisReport::default();
        assert_eq!(exit_code(&report, 10, None), None);
        assert_eq!(exit_code(&report, 10, Some(11)), None);
        assert_eq!(exit_code(&report, 10, Some(10)), Some(EXIT_THRESHOLD));
    }

    #[test]
    fn test_errors_take_precedence() {
        let report = AnalysisReport {
            errors: vec![AnalysisError {
                file: "A.cs".into(),
                message: "too large".into(),
            }],
            ..Default::default()
        };
        assert_eq!(exit_code(&report, 0, None), Some(EXIT_ANALYSIS_ERRORS));
        assert_eq!(exit_code(&report, 50, Some(1)), Some(EXIT_ANALYSIS_ERRORS));
    }
}
