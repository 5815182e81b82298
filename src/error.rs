//! Error types for the manual debt core
//!
//! Only failures that can cross the analyzer boundary are modelled here.
//! A missing or non-numeric cost argument is not an error: it reads as zero
//! days. File and configuration plumbing uses `anyhow` instead.

use crate::models::Location;
use thiserror::Error;

/// Errors raised while matching attributes or resolving buckets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebtError {
    /// The attribute node carries no identifier at all (broken or partial source).
    /// The extractor skips these; the variant exists so callers can log them.
    #[error("attribute at {location} has no resolvable name")]
    MalformedAnnotationName { location: Location },

    /// The cost literal does not fit in 16 bits
    #[error("remediation cost '{literal}' at {location} exceeds {max} days", max = u16::MAX)]
    ArgumentOverflow { literal: String, location: Location },

    /// A bucket was requested that the registry never built
    #[error("no diagnostic bucket registered as '{identifier}'")]
    RegistryLookup { identifier: String },
}

pub type DebtResult<T> = Result<T, DebtError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overflow_message_names_literal_and_location() {
        let err = DebtError::ArgumentOverflow {
            literal: "70000".to_string(),
            location: Location::new(PathBuf::from("Debt.cs"), 4, 2),
        };
        let msg = err.to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("Debt.cs:4:2"));
        assert!(msg.contains("65535"));
    }

    #[test]
    fn test_registry_lookup_message() {
        let err = DebtError::RegistryLookup {
            identifier: "ManualDebt11Days".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no diagnostic bucket registered as 'ManualDebt11Days'"
        );
    }
}
