//! SARIF 2.1.0 reporter for GitHub Code Scanning and VS Code integration
//!
//! Generates SARIF (Static Analysis Results Interchange Format) output
//! compliant with OASIS SARIF 2.1.0 specification. The rule list is the
//! whole bucket registry, not just the rules that fired.
//!
//! Reference: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::models::{AnalysisReport, DiagnosticReport, Severity};
use crate::registry::{Bucket, RuleRegistry};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// SARIF schema URI
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";
const TOOL_NAME: &str = "manual-debt";
const FINGERPRINT_KEY: &str = "manual-debt/diagnostic/v1";

/// Map severity to SARIF level
fn severity_to_sarif_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

// ============================================================================
// SARIF Data Structures
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
    invocations: Vec<SarifInvocation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    name: String,
    short_description: SarifMessage,
    full_description: SarifMessage,
    default_configuration: SarifConfiguration,
    properties: SarifRuleProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifConfiguration {
    enabled: bool,
    level: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRuleProperties {
    category: String,
    remediation_cost_days: u32,
    tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_index: Option<usize>,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    fingerprints: HashMap<String, String>,
    properties: SarifResultProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifArtifactLocation {
    uri: String,
    uri_base_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: u32,
    start_column: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifInvocation {
    execution_successful: bool,
    end_time_utc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_execution_notifications: Vec<SarifNotification>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifNotification {
    level: String,
    message: SarifMessage,
    descriptor: SarifDescriptor,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDescriptor {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResultProperties {
    severity: String,
    category: String,
    remediation_cost_days: u32,
    attribute: String,
}

// ============================================================================
// Implementation
// ============================================================================

/// Render report as SARIF 2.1.0 JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    let sarif = build_sarif(report);
    Ok(serde_json::to_string_pretty(&sarif)?)
}

/// Build the complete SARIF document
fn build_sarif(report: &AnalysisReport) -> SarifReport {
    let registry = RuleRegistry::initialize();
    let rules: Vec<SarifRule> = registry.all_buckets().map(build_rule).collect();

    let rule_indices: HashMap<&str, usize> = registry
        .all_buckets()
        .enumerate()
        .map(|(i, bucket)| (bucket.identifier.as_str(), i))
        .collect();

    let results: Vec<SarifResult> = report
        .diagnostics
        .iter()
        .map(|d| build_result(d, rule_indices.get(d.rule_id.as_str()).copied()))
        .collect();

    let mut notifications = vec![SarifNotification {
        level: "note".to_string(),
        message: SarifMessage {
            text: format!(
                "Analysis complete. {} diagnostics, {} days of declared debt in {} files",
                report.summary.total, report.summary.total_days, report.files_analyzed
            ),
        },
        descriptor: SarifDescriptor {
            id: "summary".to_string(),
        },
    }];
    notifications.extend(report.errors.iter().map(|e| SarifNotification {
        level: "error".to_string(),
        message: SarifMessage {
            text: format!("{}: {}", e.file.display(), e.message),
        },
        descriptor: SarifDescriptor {
            id: "analysis-error".to_string(),
        },
    }));

    SarifReport {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
            invocations: vec![SarifInvocation {
                execution_successful: !report.has_errors(),
                end_time_utc: Utc::now().to_rfc3339(),
                tool_execution_notifications: notifications,
            }],
        }],
    }
}

/// Build a SARIF rule from a registered bucket
fn build_rule(bucket: &Bucket) -> SarifRule {
    SarifRule {
        id: bucket.identifier.clone(),
        name: bucket.identifier.clone(),
        short_description: SarifMessage {
            text: bucket.title(),
        },
        full_description: SarifMessage {
            text: bucket.description.to_string(),
        },
        default_configuration: SarifConfiguration {
            enabled: bucket.enabled_by_default,
            level: severity_to_sarif_level(&bucket.severity).to_string(),
        },
        properties: SarifRuleProperties {
            category: bucket.category.to_string(),
            remediation_cost_days: bucket.remediation_cost_days,
            tags: vec!["maintenance".to_string(), "technical-debt".to_string()],
        },
    }
}

/// Build a SARIF result from a diagnostic
fn build_result(diagnostic: &DiagnosticReport, rule_index: Option<usize>) -> SarifResult {
    let mut fingerprints = HashMap::new();
    fingerprints.insert(FINGERPRINT_KEY.to_string(), diagnostic.id.clone());

    SarifResult {
        rule_id: diagnostic.rule_id.clone(),
        rule_index,
        level: severity_to_sarif_level(&diagnostic.severity).to_string(),
        message: SarifMessage {
            text: diagnostic.message.clone(),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: diagnostic.location.file.display().to_string(),
                    uri_base_id: "%SRCROOT%".to_string(),
                },
                region: SarifRegion {
                    start_line: diagnostic.location.line,
                    start_column: diagnostic.location.column,
                },
            },
        }],
        fingerprints,
        properties: SarifResultProperties {
            severity: diagnostic.severity.to_string(),
            category: diagnostic.category.clone(),
            remediation_cost_days: diagnostic.remediation_cost_days,
            attribute: diagnostic.display_name.clone(),
        },
    }
}
