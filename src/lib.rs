//! manual-debt - declared technical debt for C# code
//!
//! Finds `[ManualTechnicalDebt(SqaleRemediationDaysEffort = N)]` attributes
//! and reports each declared cost as one or two diagnostics drawn from a
//! fixed table of 18 buckets (1-9 days and 10-90 days).

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod decompose;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod models;
pub mod parsers;
pub mod registry;
pub mod reporters;

pub use analyzer::{AnalysisHost, CollectingSink, DiagnosticSink, ManualDebtAnalyzer};
pub use engine::AnalysisEngine;
pub use error::{DebtError, DebtResult};
pub use registry::{Bucket, RuleRegistry};
