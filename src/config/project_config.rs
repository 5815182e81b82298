//! Project-level configuration support
//!
//! Loads per-project configuration from `manual-debt.toml` or
//! `.manualdebtrc.json` in the analyzed directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # manual-debt.toml
//!
//! [exclude]
//! paths = ["generated/", "*.Designer.cs"]
//!
//! [defaults]
//! format = "text"
//! workers = 8
//! fail_on = 120
//! min_days = 5
//!
//! [diagnostics]
//! severity = "warning"
//! ```

use crate::models::Severity;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILENAME: &str = "manual-debt.toml";
pub const JSON_CONFIG_FILENAME: &str = ".manualdebtrc.json";

/// Project-level configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Exclusion patterns
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Paths/patterns to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, sarif)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Fail when total remediation days reach this value
    #[serde(default)]
    pub fail_on: Option<u64>,

    /// Hide diagnostics cheaper than this many days
    #[serde(default)]
    pub min_days: Option<u32>,
}

/// How diagnostics are reported
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiagnosticsConfig {
    /// Uniform severity for every bucket (registered default: info)
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Load project configuration from the analyzed path
///
/// Searches for config files in order:
/// 1. `manual-debt.toml`
/// 2. `.manualdebtrc.json`
///
/// When `repo_path` is a file, its directory is searched. Returns default
/// config if no file is found or parsing fails.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let dir = if repo_path.is_file() {
        repo_path.parent().unwrap_or(repo_path)
    } else {
        repo_path
    };

    // Try TOML first (preferred format)
    let toml_path = dir.join(CONFIG_FILENAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILENAME);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path());
        assert!(config.exclude.paths.is_empty());
        assert!(config.defaults.format.is_none());
        assert!(config.diagnostics.severity.is_none());
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"
[exclude]
paths = ["generated/"]

[defaults]
format = "json"
workers = 4
fail_on = 30
min_days = 2

[diagnostics]
severity = "warning"
"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.exclude.paths, vec!["generated/"]);
        assert_eq!(config.defaults.format.as_deref(), Some("json"));
        assert_eq!(config.defaults.workers, Some(4));
        assert_eq!(config.defaults.fail_on, Some(30));
        assert_eq!(config.defaults.min_days, Some(2));
        assert_eq!(config.diagnostics.severity, Some(Severity::Warning));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(JSON_CONFIG_FILENAME),
            r#"{"exclude": {"paths": ["vendor/"]}, "diagnostics": {"severity": "error"}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.exclude.paths, vec!["vendor/"]);
        assert_eq!(config.diagnostics.severity, Some(Severity::Error));
    }

    #[test]
    fn test_invalid_toml_falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "[exclude\npaths = ").unwrap();
        fs::write(
            dir.path().join(JSON_CONFIG_FILENAME),
            r#"{"defaults": {"workers": 2}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.defaults.workers, Some(2));
    }

    #[test]
    fn test_file_path_uses_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[defaults]\nmin_days = 10\n",
        )
        .unwrap();
        let file = dir.path().join("Legacy.cs");
        fs::write(&file, "class Legacy {}").unwrap();

        let config = load_project_config(&file);
        assert_eq!(config.defaults.min_days, Some(10));
    }
}
