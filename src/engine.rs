//! Analysis host with parallel file processing
//!
//! The `AnalysisEngine` plays the part of the compiler host: analyzers
//! register attribute actions with it, and it feeds every attribute usage
//! of every C# file to those actions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    AnalysisEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Analyzers register attribute actions                │
//! │  2. Collect .cs files (gitignore + [exclude] aware)     │
//! │  3. Parse and visit files in parallel (rayon)           │
//! │  4. Record per-occurrence failures, keep going          │
//! │  5. Sort diagnostics and summarize                      │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::analyzer::{
    AnalysisHost, AttributeAction, CollectingSink, DiagnosticSink, ManualDebtAnalyzer,
};
use crate::config::ExcludeConfig;
use crate::extractor::AttributeUsage;
use crate::models::{AnalysisError, AnalysisReport, DebtSummary, DiagnosticReport, Severity};
use crate::parsers;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Custom ignore file honoured next to .gitignore
pub const IGNORE_FILENAME: &str = ".manualdebtignore";

/// Upper bound when the worker count is auto-detected
const MAX_AUTO_WORKERS: usize = 16;

pub struct AnalysisEngine {
    actions: Vec<AttributeAction>,
    /// Number of worker threads for parallel execution
    workers: usize,
    exclude: Option<GlobSet>,
    severity: Option<Severity>,
}

impl AnalysisHost for AnalysisEngine {
    fn register_attribute_action(&mut self, action: AttributeAction) {
        self.actions.push(action);
    }
}

/// What one file contributed to the report
#[derive(Debug, Default)]
struct FileOutcome {
    diagnostics: Vec<DiagnosticReport>,
    matched: usize,
    errors: Vec<AnalysisError>,
}

impl AnalysisEngine {
    /// Create an engine with no registered actions
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(MAX_AUTO_WORKERS)
        } else {
            workers
        };

        Self {
            actions: Vec::new(),
            workers: actual_workers,
            exclude: None,
            severity: None,
        }
    }

    /// Engine with the ManualTechnicalDebt analyzer already registered
    pub fn with_manual_debt_analyzer(workers: usize) -> Self {
        let mut engine = Self::new(workers);
        ManualDebtAnalyzer::new().initialize(&mut engine);
        engine
    }

    /// Skip files matching the configured exclude patterns
    pub fn with_exclude(mut self, exclude: &ExcludeConfig) -> Result<Self> {
        if exclude.paths.is_empty() {
            self.exclude = None;
            return Ok(self);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &exclude.paths {
            let glob = Glob::new(&normalize_exclude_pattern(pattern))
                .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
            builder.add(glob);
        }
        self.exclude = Some(builder.build().context("Failed to build exclude set")?);
        Ok(self)
    }

    /// Report every diagnostic at this severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Collect supported source files under `root`, respecting .gitignore
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(if parsers::is_supported(root) {
                vec![root.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        if !root.is_dir() {
            anyhow::bail!("Path does not exist: {}", root.display());
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .add_custom_ignore_filename(IGNORE_FILENAME);

        let mut files = Vec::new();
        for entry in builder.build().flatten() {
            let path = entry.path();
            if !path.is_file() || !parsers::is_supported(path) {
                continue;
            }
            if self.is_excluded(root, path) {
                debug!("Excluded by config: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let Some(ref exclude) = self.exclude else {
            return false;
        };
        let relative = path.strip_prefix(root).unwrap_or(path);
        exclude.is_match(relative)
    }

    /// Analyze every supported file under `root`
    pub fn analyze_path(&self, root: &Path) -> Result<AnalysisReport> {
        let start = Instant::now();
        let files = self.collect_files(root)?;
        info!("Analyzing {} C# files with {} workers", files.len(), self.workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to build worker pool")?;

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| match parsers::parse_file(path) {
                    Ok(parsed) => {
                        if parsed.has_syntax_errors {
                            debug!("{} has syntax errors, analyzing what parsed", path.display());
                        }
                        self.visit_attributes(&parsed.attributes, path)
                    }
                    Err(e) => {
                        warn!("Skipping {}: {:#}", path.display(), e);
                        FileOutcome {
                            errors: vec![AnalysisError {
                                file: path.clone(),
                                message: format!("{:#}", e),
                            }],
                            ..Default::default()
                        }
                    }
                })
                .collect()
        });

        let report = build_report(files.len(), outcomes, start);
        info!(
            "Found {} manual debt diagnostics ({} days) in {} files",
            report.summary.total, report.summary.total_days, report.summary.files_with_debt
        );
        Ok(report)
    }

    /// Analyze a single in-memory C# file
    pub fn analyze_source(&self, source: &str, path: &Path) -> Result<AnalysisReport> {
        let start = Instant::now();
        let parsed = parsers::csharp::parse_source(source, path)?;
        let outcome = self.visit_attributes(&parsed.attributes, path);
        Ok(build_report(1, vec![outcome], start))
    }

    /// Run every registered action on every usage of one file
    fn visit_attributes(&self, usages: &[AttributeUsage], path: &Path) -> FileOutcome {
        let sink = match self.severity {
            Some(severity) => CollectingSink::new().with_severity(severity),
            None => CollectingSink::new(),
        };

        let sink_ref: &dyn DiagnosticSink = &sink;
        let mut matched = 0;
        let mut errors = Vec::new();

        for usage in usages {
            for action in &self.actions {
                match action(usage, sink_ref) {
                    Ok(true) => matched += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("{}", e);
                        errors.push(AnalysisError {
                            file: path.to_path_buf(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        FileOutcome {
            diagnostics: sink.into_reports(),
            matched,
            errors,
        }
    }
}

fn build_report(files_analyzed: usize, outcomes: Vec<FileOutcome>, start: Instant) -> AnalysisReport {
    let mut report = AnalysisReport {
        files_analyzed,
        ..Default::default()
    };

    for outcome in outcomes {
        report.diagnostics.extend(outcome.diagnostics);
        report.annotations_matched += outcome.matched;
        report.errors.extend(outcome.errors);
    }

    // Stable: buckets of one occurrence keep their tens-then-ones order
    report.diagnostics.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
    });
    report.errors.sort_by(|a, b| a.file.cmp(&b.file));

    report.summary = DebtSummary::from_diagnostics(&report.diagnostics);
    report.duration_ms = start.elapsed().as_millis() as u64;
    report
}

/// `vendor/` matches the directory tree, bare names match at any depth
fn normalize_exclude_pattern(pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./");
    let pattern = if let Some(dir) = pattern.strip_suffix('/') {
        format!("{dir}/**")
    } else {
        pattern.to_string()
    };
    if pattern.contains('/') {
        pattern
    } else {
        format!("**/{pattern}")
    }
}
