//! JSON reporter
//!
//! Outputs the full AnalysisReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::models::AnalysisReport;
use crate::registry::{Bucket, RuleRegistry};
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the registered buckets as a JSON array
pub fn render_rules() -> Result<String> {
    let buckets: Vec<&Bucket> = RuleRegistry::initialize().all_buckets().collect();
    Ok(serde_json::to_string_pretty(&buckets)?)
}
