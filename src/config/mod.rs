//! Configuration module for manual-debt
//!
//! This module handles:
//! - Project-level configuration (manual-debt.toml)
//! - Path exclusions
//! - Diagnostic severity override
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, CliDefaults, DiagnosticsConfig, ExcludeConfig, ProjectConfig,
    CONFIG_FILENAME, JSON_CONFIG_FILENAME,
};
