//! ManualTechnicalDebt attribute matching
//!
//! The front end hands over every attribute usage it sees as an
//! [`AttributeUsage`]: the name in one of a few syntactic shapes, the
//! argument list reduced to names and numeric literals, and a location.
//! This module decides whether the usage is a `ManualTechnicalDebt`
//! attribute and pulls the day count out of its named cost argument.

use crate::error::{DebtError, DebtResult};
use crate::models::Location;
use std::num::IntErrorKind;
use tracing::debug;

/// Attribute name, without the conventional suffix
pub const ATTRIBUTE_NAME: &str = "ManualTechnicalDebt";

/// Attribute name with the `Attribute` suffix
pub const ATTRIBUTE_FULL_NAME: &str = "ManualTechnicalDebtAttribute";

/// Named argument carrying the remediation cost in days
pub const COST_ARGUMENT_NAME: &str = "SqaleRemediationDaysEffort";

/// Syntactic shapes an attribute name can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeName {
    /// `Name`
    Simple(String),
    /// `Name<T>`; holds the identifier only
    Generic(String),
    /// `Outer.Inner.Name`, one entry per dotted segment
    Qualified(Vec<String>),
    /// `alias::Name`
    AliasQualified { alias: String, name: String },
}

impl AttributeName {
    /// The simple identifier that names the attribute type.
    ///
    /// Dotted names resolve to their last segment, the type name itself.
    pub fn simple_name(&self) -> Option<&str> {
        let name = match self {
            AttributeName::Simple(name) | AttributeName::Generic(name) => name.as_str(),
            AttributeName::Qualified(segments) => segments.last()?.as_str(),
            AttributeName::AliasQualified { name, .. } => name.as_str(),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// One argument of an attribute usage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeArgument {
    /// Set for `Name = value` and `Name: value` arguments
    pub name: Option<String>,
    /// Text of the first numeric literal inside the value, if any
    pub numeric_literal: Option<String>,
}

impl AttributeArgument {
    pub fn named(name: impl Into<String>, numeric_literal: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            numeric_literal: numeric_literal.map(str::to_string),
        }
    }

    pub fn positional(numeric_literal: Option<&str>) -> Self {
        Self {
            name: None,
            numeric_literal: numeric_literal.map(str::to_string),
        }
    }
}

/// An attribute usage node as delivered by a syntax-tree walker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeUsage {
    /// `None` when the source is too broken to carry a name
    pub name: Option<AttributeName>,
    /// The name exactly as written
    pub display_name: String,
    pub arguments: Vec<AttributeArgument>,
    pub location: Location,
}

/// A matched `ManualTechnicalDebt` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDebt {
    pub name: String,
    pub display_name: String,
    pub location: Location,
    /// Zero when the cost argument is missing or not an integer literal
    pub days: u16,
}

/// Outcome of reading a numeric literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue {
    Days(u16),
    Overflow,
    NotInteger,
}

/// Case-insensitive check against both accepted spellings
pub fn is_target_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(ATTRIBUTE_NAME) || name.eq_ignore_ascii_case(ATTRIBUTE_FULL_NAME)
}

/// Resolve the simple name of a usage
pub fn resolve_name(usage: &AttributeUsage) -> DebtResult<&str> {
    usage
        .name
        .as_ref()
        .and_then(AttributeName::simple_name)
        .ok_or_else(|| DebtError::MalformedAnnotationName {
            location: usage.location.clone(),
        })
}

/// Match one usage.
///
/// Returns `Ok(None)` for other attributes and for usages without a
/// resolvable name. Only a cost literal above `u16::MAX` is an error.
pub fn match_usage(usage: &AttributeUsage) -> DebtResult<Option<ExtractedDebt>> {
    let name = match resolve_name(usage) {
        Ok(name) => name,
        Err(err) => {
            debug!("Skipping attribute: {}", err);
            return Ok(None);
        }
    };

    if !is_target_name(name) {
        return Ok(None);
    }

    let days = remediation_days(usage)?;

    Ok(Some(ExtractedDebt {
        name: name.to_string(),
        display_name: usage.display_name.clone(),
        location: usage.location.clone(),
        days,
    }))
}

fn remediation_days(usage: &AttributeUsage) -> DebtResult<u16> {
    let Some(argument) = usage
        .arguments
        .iter()
        .find(|arg| arg.name.as_deref() == Some(COST_ARGUMENT_NAME))
    else {
        return Ok(0);
    };

    let Some(literal) = argument.numeric_literal.as_deref() else {
        return Ok(0);
    };

    match parse_integer_literal(literal) {
        LiteralValue::Days(days) => Ok(days),
        LiteralValue::NotInteger => {
            debug!(
                "Non-integer {} literal '{}' at {}, reading as 0",
                COST_ARGUMENT_NAME, literal, usage.location
            );
            Ok(0)
        }
        LiteralValue::Overflow => Err(DebtError::ArgumentOverflow {
            literal: literal.to_string(),
            location: usage.location.clone(),
        }),
    }
}

/// Parse a C# integer literal token as a day count.
///
/// Accepts decimal, `0x` hex and `0b` binary forms, `_` separators and
/// `u`/`l` suffixes. Real literals (`2.5`, `3f`, `1e2`) are `NotInteger`.
pub fn parse_integer_literal(text: &str) -> LiteralValue {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let body = cleaned.trim_end_matches(['u', 'U', 'l', 'L']);

    let (digits, radix) = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = body
        .strip_prefix("0b")
        .or_else(|| body.strip_prefix("0B"))
    {
        (bin, 2)
    } else {
        (body, 10)
    };

    match u64::from_str_radix(digits, radix) {
        Ok(value) => match u16::try_from(value) {
            Ok(days) => LiteralValue::Days(days),
            Err(_) => LiteralValue::Overflow,
        },
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => LiteralValue::Overflow,
        Err(_) => LiteralValue::NotInteger,
    }
}
