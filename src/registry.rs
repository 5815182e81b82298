//! Diagnostic bucket registry
//!
//! Every reportable remediation cost is a pre-registered bucket with its own
//! diagnostic identifier: one bucket per day from 1 to 9, then one per ten
//! days from 10 to 90. Arbitrary costs are expressed as one or two of these
//! buckets (see [`crate::decompose`]).
//!
//! The table is built by a pure function and published once through a
//! `OnceLock`, so concurrent first use from worker threads is safe and the
//! table is read-only afterwards.

use crate::error::{DebtError, DebtResult};
use crate::models::Severity;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::OnceLock;

/// Identifier of the single-day bucket
pub const MANUAL_DEBT_1_DAY_ID: &str = "ManualDebt1Day";

/// Category shared by all buckets
pub const CATEGORY: &str = "TechnicalDebt";

/// Number of buckets in the table
pub const BUCKET_COUNT: usize = 18;

const TITLE_TEMPLATE: &str = "Manual technical debt: {days}";
const MESSAGE_TEMPLATE: &str = "'{name}' declares {days} of manual technical debt";
const DESCRIPTION: &str = "Remediation cost declared with the ManualTechnicalDebt attribute. \
Costs are reported as fixed buckets: a tens bucket plus an optional ones bucket, \
with anything of 100 days or more reported as 90 + 9 days.";

static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();

/// Remediation costs that own a bucket, in registration order
pub fn registered_costs() -> impl Iterator<Item = u32> {
    std::iter::once(1).chain(2..10).chain((10..100).step_by(10))
}

/// Diagnostic identifier for a cost, whether or not it is registered
pub fn identifier_for_cost(days: u32) -> String {
    if days == 1 {
        MANUAL_DEBT_1_DAY_ID.to_string()
    } else {
        format!("ManualDebt{days}Days")
    }
}

fn days_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// One reportable remediation-cost tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub identifier: String,
    pub remediation_cost_days: u32,
    pub title_template: &'static str,
    pub message_template: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub enabled_by_default: bool,
}

impl Bucket {
    fn new(remediation_cost_days: u32) -> Self {
        Self {
            identifier: identifier_for_cost(remediation_cost_days),
            remediation_cost_days,
            title_template: TITLE_TEMPLATE,
            message_template: MESSAGE_TEMPLATE,
            description: DESCRIPTION,
            category: CATEGORY,
            severity: Severity::Info,
            enabled_by_default: true,
        }
    }

    /// Title with the cost filled in
    pub fn title(&self) -> String {
        self.title_template
            .replace("{days}", &days_label(self.remediation_cost_days))
    }

    /// Message for one occurrence, naming the attribute as written
    pub fn message(&self, display_name: &str) -> String {
        self.message_template
            .replace("{name}", display_name)
            .replace("{days}", &days_label(self.remediation_cost_days))
    }
}

/// Immutable table of buckets keyed by identifier
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    buckets: IndexMap<String, Bucket>,
}

impl RuleRegistry {
    /// Process-wide registry, built on first call
    pub fn initialize() -> &'static RuleRegistry {
        REGISTRY.get_or_init(Self::build)
    }

    /// Build a fresh table: 1 day, then 2..=9 days, then 10..=90 by tens
    pub fn build() -> Self {
        let buckets = registered_costs()
            .map(Bucket::new)
            .map(|b| (b.identifier.clone(), b))
            .collect();
        Self { buckets }
    }

    pub fn lookup_by_identifier(&self, identifier: &str) -> DebtResult<&Bucket> {
        self.buckets
            .get(identifier)
            .ok_or_else(|| DebtError::RegistryLookup {
                identifier: identifier.to_string(),
            })
    }

    pub fn lookup_by_cost(&self, days: u32) -> DebtResult<&Bucket> {
        self.lookup_by_identifier(&identifier_for_cost(days))
    }

    /// All buckets in registration order
    pub fn all_buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
