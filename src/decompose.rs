//! Day count to bucket decomposition
//!
//! A cost is split into its tens part and its ones part, each of which has a
//! registered bucket. Costs of 100 days or more cannot be expressed with two
//! buckets and are reported as the largest pair, 90 + 9 days.

use crate::error::DebtResult;
use crate::registry::{Bucket, RuleRegistry};

/// Smallest cost that gets clamped
pub const CLAMP_THRESHOLD_DAYS: u32 = 100;

const MAX_TENS_DAYS: u32 = 90;
const MAX_ONES_DAYS: u32 = 9;

/// Bucket costs for a day count, largest first
///
/// ```
/// use manual_debt::decompose::cost_tiers;
/// assert_eq!(cost_tiers(0), Vec::<u32>::new());
/// assert_eq!(cost_tiers(7), vec![7]);
/// assert_eq!(cost_tiers(95), vec![90, 5]);
/// assert_eq!(cost_tiers(250), vec![90, 9]);
/// ```
pub fn cost_tiers(days: u32) -> Vec<u32> {
    if days >= CLAMP_THRESHOLD_DAYS {
        return vec![MAX_TENS_DAYS, MAX_ONES_DAYS];
    }

    let mut tiers = Vec::with_capacity(2);
    let mut remaining = days;

    if days >= 10 {
        let tens = (days / 10) * 10;
        tiers.push(tens);
        remaining = days - tens;
    }

    if remaining > 0 {
        tiers.push(remaining);
    }

    tiers
}

impl RuleRegistry {
    /// Buckets reporting `days`, in the order they should be emitted
    pub fn decompose(&self, days: u32) -> DebtResult<Vec<&Bucket>> {
        cost_tiers(days)
            .into_iter()
            .map(|cost| self.lookup_by_cost(cost))
            .collect()
    }
}

/// [`RuleRegistry::decompose`] against the process-wide registry
pub fn decompose(days: u32) -> DebtResult<Vec<&'static Bucket>> {
    RuleRegistry::initialize().decompose(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(days: u32) -> Vec<String> {
        decompose(days)
            .expect("every tier is registered")
            .into_iter()
            .map(|b| b.identifier.clone())
            .collect()
    }

    #[test]
    fn test_zero_yields_nothing() {
        assert!(decompose(0).expect("zero").is_empty());
    }

    #[test]
    fn test_single_digits_map_to_one_bucket() {
        for days in 1..=9 {
            let buckets = decompose(days).expect("single digit");
            assert_eq!(buckets.len(), 1, "days = {days}");
            assert_eq!(buckets[0].remediation_cost_days, days);
        }
        assert_eq!(ids(1), vec!["ManualDebt1Day"]);
        assert_eq!(ids(2), vec!["ManualDebt2Days"]);
    }

    #[test]
    fn test_multiples_of_ten_map_to_tens_bucket() {
        for days in (10..=90).step_by(10) {
            let buckets = decompose(days).expect("multiple of ten");
            assert_eq!(buckets.len(), 1, "days = {days}");
            assert_eq!(buckets[0].remediation_cost_days, days);
        }
    }

    #[test]
    fn test_tens_then_ones() {
        assert_eq!(ids(11), vec!["ManualDebt10Days", "ManualDebt1Day"]);
        assert_eq!(ids(47), vec!["ManualDebt40Days", "ManualDebt7Days"]);
        assert_eq!(ids(95), vec!["ManualDebt90Days", "ManualDebt5Days"]);
        assert_eq!(ids(99), vec!["ManualDebt90Days", "ManualDebt9Days"]);
    }

    #[test]
    fn test_hundred_and_above_clamp_to_ninety_nine() {
        assert_eq!(ids(100), vec!["ManualDebt90Days", "ManualDebt9Days"]);
        assert_eq!(decompose(100).expect("100"), decompose(250).expect("250"));
        assert_eq!(ids(u32::from(u16::MAX)), ids(100));
        assert_eq!(ids(u32::MAX), ids(100));
    }

    #[test]
    fn test_every_value_below_hundred_sums_back() {
        for days in 0..CLAMP_THRESHOLD_DAYS {
            let total: u32 = decompose(days)
                .expect("registered")
                .iter()
                .map(|b| b.remediation_cost_days)
                .sum();
            assert_eq!(total, days);
        }
    }

    #[test]
    fn test_explicit_registry() {
        let registry = RuleRegistry::build();
        let buckets = registry.decompose(23).expect("23");
        let costs: Vec<u32> = buckets.iter().map(|b| b.remediation_cost_days).collect();
        assert_eq!(costs, vec![20, 3]);
    }
}
