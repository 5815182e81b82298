//! CLI command definitions and handlers

mod analyze;
mod init;

use crate::reporters::{self, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// manual-debt - report declared technical debt in C# code
#[derive(Parser, Debug)]
#[command(name = "manual-debt")]
#[command(
    version,
    about = "Report [ManualTechnicalDebt] remediation costs in C# code as bucketed diagnostics",
    long_about = "Finds every [ManualTechnicalDebt(SqaleRemediationDaysEffort = N)] attribute \
in a C# code base and reports its cost as one or two fixed diagnostics: a tens bucket \
(10-90 days) plus a ones bucket (1-9 days). Costs of 100 days or more are reported as 99.\n\n\
Run without a subcommand to analyze the current directory:\n  \
manual-debt .",
    after_help = "\
Examples:
  manual-debt .                           Analyze current directory
  manual-debt analyze . --format json     JSON output for scripting
  manual-debt analyze . --fail-on 60      Exit code 1 at 60+ declared days
  manual-debt rules                       List the 18 diagnostics"
)]
pub struct Cli {
    /// Path to a directory or .cs file (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: auto)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a manual-debt.toml config file with example settings
    Init,

    /// Analyze C# files for ManualTechnicalDebt attributes
    #[command(after_help = "\
Examples:
  manual-debt analyze .                                     Analyze current directory
  manual-debt analyze src/Legacy.cs                         Analyze one file
  manual-debt analyze . --format sarif -o debt.sarif.json   SARIF for GitHub Code Scanning
  manual-debt analyze . --min-days 10                       Hide the ones buckets
  manual-debt analyze . --fail-on 120                       Exit code 1 at 120+ days (CI mode)

Exit codes:
  0  analysis finished
  1  --fail-on threshold reached
  2  some annotations or files could not be analyzed")]
    Analyze {
        /// Output format: text, json, sarif
        #[arg(long, short = 'f', value_parser = ["text", "json", "sarif"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 if total declared days reach this value
        #[arg(long)]
        fail_on: Option<u64>,

        /// Hide diagnostics whose bucket is cheaper than this many days
        #[arg(long)]
        min_days: Option<u32>,
    },

    /// List every diagnostic this tool can report
    Rules {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Analyze {
            format,
            output,
            fail_on,
            min_days,
        }) => analyze::run(
            &cli.path,
            analyze::AnalyzeOptions {
                format,
                output,
                workers: cli.workers,
                fail_on,
                min_days,
            },
        ),

        Some(Commands::Rules { format }) => {
            let format: OutputFormat = format.parse()?;
            print!("{}", reporters::rules_report(format)?);
            Ok(())
        }

        None => analyze::run(
            &cli.path,
            analyze::AnalyzeOptions {
                workers: cli.workers,
                ..Default::default()
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_default_command_is_analyze() {
        let cli = Cli::try_parse_from(["manual-debt", "src"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("src"));
        assert_eq!(cli.workers, None);
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "manual-debt",
            "analyze",
            "repo",
            "--format",
            "sarif",
            "--fail-on",
            "30",
            "--min-days",
            "5",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.workers, Some(2));
        match cli.command {
            Some(Commands::Analyze {
                format,
                fail_on,
                min_days,
                ..
            }) => {
                assert_eq!(format.as_deref(), Some("sarif"));
                assert_eq!(fail_on, Some(30));
                assert_eq!(min_days, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rules_rejects_sarif() {
        assert!(Cli::try_parse_from(["manual-debt", "rules", "--format", "sarif"]).is_err());
    }
}
