//! ManualTechnicalDebt analyzer and its host boundary
//!
//! The analyzer itself is stateless: it owns a reference to the global
//! bucket registry and registers a single attribute action with whatever
//! host walks the syntax trees. For each matching attribute it reports one
//! diagnostic per bucket of the decomposed cost.
//!
//! ```text
//!  host (syntax walker) ──AttributeUsage──▶ extractor::match_usage
//!                                                 │ days
//!                                                 ▼
//!                                     RuleRegistry::decompose
//!                                                 │ buckets
//!                                                 ▼
//!                                DiagnosticSink::report(bucket, location, name)
//! ```

use crate::error::DebtResult;
use crate::extractor::{match_usage, AttributeUsage, ExtractedDebt};
use crate::models::{deterministic_diagnostic_id, DiagnosticReport, Location, Severity};
use crate::registry::{Bucket, RuleRegistry};
use std::sync::Mutex;

/// Receiver of reported diagnostics. Must tolerate concurrent calls.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, bucket: &Bucket, location: &Location, display_name: &str);
}

/// Callback run by a host for every attribute usage it visits.
/// Returns whether the usage was a `ManualTechnicalDebt` attribute.
pub type AttributeAction =
    Box<dyn Fn(&AttributeUsage, &dyn DiagnosticSink) -> DebtResult<bool> + Send + Sync>;

/// Something that walks syntax trees and calls registered actions
pub trait AnalysisHost {
    fn register_attribute_action(&mut self, action: AttributeAction);
}

#[derive(Debug, Clone, Copy)]
pub struct ManualDebtAnalyzer {
    registry: &'static RuleRegistry,
}

impl Default for ManualDebtAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualDebtAnalyzer {
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::initialize(),
        }
    }

    /// Every diagnostic this analyzer can emit
    pub fn supported_diagnostics(&self) -> impl Iterator<Item = &'static Bucket> {
        self.registry.all_buckets()
    }

    /// Register the attribute action with a host. Called once per host.
    pub fn initialize(&self, host: &mut dyn AnalysisHost) {
        let analyzer = *self;
        host.register_attribute_action(Box::new(
            move |usage: &AttributeUsage, sink: &dyn DiagnosticSink| {
                analyzer
                    .analyze_attribute(usage, sink)
                    .map(|found| found.is_some())
            },
        ));
    }

    /// Analyze one attribute usage, reporting zero, one or two diagnostics
    pub fn analyze_attribute(
        &self,
        usage: &AttributeUsage,
        sink: &dyn DiagnosticSink,
    ) -> DebtResult<Option<ExtractedDebt>> {
        let Some(found) = match_usage(usage)? else {
            return Ok(None);
        };

        for bucket in self.registry.decompose(u32::from(found.days))? {
            sink.report(bucket, &found.location, &found.display_name);
        }

        Ok(Some(found))
    }
}

/// Sink that turns reports into [`DiagnosticReport`] values
#[derive(Debug, Default)]
pub struct CollectingSink {
    severity: Option<Severity>,
    reports: Mutex<Vec<DiagnosticReport>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every bucket at `severity` instead of its registered one
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn into_reports(self) -> Vec<DiagnosticReport> {
        self.reports
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, bucket: &Bucket, location: &Location, display_name: &str) {
        let file = location.file.display().to_string();
        let report = DiagnosticReport {
            id: deterministic_diagnostic_id(
                &bucket.identifier,
                &file,
                location.line,
                location.column,
            ),
            rule_id: bucket.identifier.clone(),
            remediation_cost_days: bucket.remediation_cost_days,
            severity: self.severity.unwrap_or(bucket.severity),
            category: bucket.category.to_string(),
            title: bucket.title(),
            message: bucket.message(display_name),
            location: location.clone(),
            display_name: display_name.to_string(),
        };
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(report);
    }
}
