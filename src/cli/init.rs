//! Init command - write a starter manual-debt.toml

use crate::config::CONFIG_FILENAME;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# manual-debt configuration

[exclude]
# Paths/patterns to skip (gitignore and .manualdebtignore are always honoured)
paths = ["bin/", "obj/", "*.Designer.cs"]

[defaults]
# Output format (text, json, sarif)
format = "text"

# Exit with code 1 when total declared days reach this value
# fail_on = 120

# Hide diagnostics whose bucket is cheaper than this many days
# min_days = 1

[diagnostics]
# Severity for every bucket (info, warning, error)
severity = "info"
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join(CONFIG_FILENAME);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nNext: {}",
        style("manual-debt analyze .").bold()
    );
    Ok(())
}
