//! Core data models for manual-debt
//!
//! These models are shared by the analyzer, the engine and the reporters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Generate a deterministic diagnostic ID based on content hash.
///
/// Stable across runs so a report can be diffed or suppressed by ID.
/// The ID is a 16-character hex string derived from hashing the rule id,
/// file path, line and column.
pub fn deterministic_diagnostic_id(rule_id: &str, file: &str, line: u32, column: u32) -> String {
    // MD5 for stable cross-version hashing; DefaultHasher is not stable.
    let input = format!("{rule_id}\n{file}\n{line}\n{column}");
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Diagnostic severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Source position of an attribute usage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Location {
    pub file: PathBuf,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    #[serde(default)]
    pub start_byte: usize,
    #[serde(default)]
    pub end_byte: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            start_byte: 0,
            end_byte: 0,
        }
    }

    pub fn with_span(mut self, start_byte: usize, end_byte: usize) -> Self {
        self.start_byte = start_byte;
        self.end_byte = end_byte;
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// One reported bucket for one attribute occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiagnosticReport {
    #[serde(default)]
    pub id: String,
    /// Bucket identifier, e.g. `ManualDebt20Days`
    pub rule_id: String,
    pub remediation_cost_days: u32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub location: Location,
    /// The attribute name as written in source
    #[serde(default)]
    pub display_name: String,
}

/// Aggregate numbers over a set of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total: usize,
    /// Sum of reported bucket costs (values of 100 days or more count as 99)
    pub total_days: u64,
    pub by_rule: BTreeMap<String, usize>,
    pub files_with_debt: usize,
}

impl DebtSummary {
    pub fn from_diagnostics(diagnostics: &[DiagnosticReport]) -> Self {
        let mut summary = Self::default();
        let mut files = BTreeSet::new();
        for d in diagnostics {
            summary.total += 1;
            summary.total_days += u64::from(d.remediation_cost_days);
            *summary.by_rule.entry(d.rule_id.clone()).or_insert(0) += 1;
            files.insert(&d.location.file);
        }
        summary.files_with_debt = files.len();
        summary
    }
}

/// A non-fatal failure recorded during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub file: PathBuf,
    pub message: String,
}

/// Result of analyzing a set of source files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub diagnostics: Vec<DiagnosticReport>,
    pub summary: DebtSummary,
    pub files_analyzed: usize,
    /// Attribute usages that matched `ManualTechnicalDebt`, including zero-cost ones
    pub annotations_matched: usize,
    #[serde(default)]
    pub errors: Vec<AnalysisError>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl AnalysisReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Keep only diagnostics whose bucket cost is at least `min_days`, refreshing the summary
    pub fn retain_min_days(&mut self, min_days: u32) {
        self.diagnostics
            .retain(|d| d.remediation_cost_days >= min_days);
        self.summary = DebtSummary::from_diagnostics(&self.diagnostics);
    }
}
