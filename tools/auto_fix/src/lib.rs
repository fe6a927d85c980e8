//! Auto-fix tool for static-analysis diagnostics.
//!
//! This tool fixes reported problems by:
//! 1. Parsing lint, type-checker or security-scanner output into canonical errors
//! 2. Grouping the errors by file, keeping the order they were reported in
//! 3. Asking a repair service to fix each error against the file's latest content
//! 4. Writing every genuine change back to disk, unless running in dry-run mode

pub mod context;
pub mod file_fixer;
pub mod parsers;
pub mod session;

use autofix_core::config::{ApiKey, Config};
use autofix_core::diagnostic::CanonicalError;
use autofix_core::repair::RepairService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub use context::{DEFAULT_CONTEXT_LINES, excerpt, file_context};
pub use file_fixer::{LlmRepairService, build_prompt, normalize_response};
pub use parsers::{
    DiagnosticParser, LintParser, StructuredParser, TypeCheckParser, load_errors, parser_for,
};
pub use session::{FailureReason, FileFixSession, FileRecord, FixOutcome, is_real_change};

/// Fatal errors. Everything else is recovered from and reported per file or per error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} environment variable not set")]
    MissingCredential(String),
    #[error("failed to write summary to {}: {source}", .path.display())]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize summary: {0}")]
    SerializeSummary(#[from] serde_json::Error),
}

/// Reads the repair service credential from the environment variable `var`.
pub fn read_credential(var: &str) -> Result<ApiKey, Error> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(ApiKey(key)),
        _ => Err(Error::MissingCredential(var.to_string())),
    }
}

/// Configuration for the auto-fix loop.
#[derive(Debug, Clone)]
pub struct FixConfig {
    /// Compute fixes without writing them.
    pub dry_run: bool,
    /// Upper bound on each repair-service call.
    pub timeout: Duration,
    /// Lines of context on each side of the offending line.
    pub context_lines: usize,
    /// Directory relative diagnostic paths are resolved against. Defaults to the working
    /// directory.
    pub root: Option<PathBuf>,
}

impl Default for FixConfig {
    fn default() -> Self {
        FixConfig {
            dry_run: false,
            timeout: Duration::from_secs(120),
            context_lines: DEFAULT_CONTEXT_LINES,
            root: None,
        }
    }
}

impl FixConfig {
    pub fn from_config(config: &Config) -> FixConfig {
        FixConfig {
            dry_run: config.dry_run,
            timeout: config.timeout(),
            context_lines: config.context_lines,
            root: None,
        }
    }

    /// Resolves a diagnostic's file path against `root`.
    pub fn resolve(&self, file: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Summary of the fixing process
#[derive(Debug, Serialize)]
pub struct FixSummary {
    pub dry_run: bool,
    pub fixed: usize,
    pub failed: usize,
    pub files: Vec<FileRecord>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl FixSummary {
    /// True iff every discovered error was fixed.
    pub fn all_fixed(&self) -> bool {
        self.failed == 0
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| Error::WriteSummary {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Buckets `errors` by file. Files appear in the order they were first seen, and each file's
/// errors keep their relative order.
pub fn group_by_file(errors: Vec<CanonicalError>) -> Vec<(String, Vec<CanonicalError>)> {
    let mut groups: Vec<(String, Vec<CanonicalError>)> = Vec::new();
    for error in errors {
        match groups.iter_mut().find(|(file, _)| *file == error.file) {
            Some((_, group)) => group.push(error),
            None => groups.push((error.file.clone(), vec![error])),
        }
    }
    groups
}

/// Main auto-fix loop. Files are processed one at a time, and so are the errors within a file.
pub fn fix_errors(
    errors: Vec<CanonicalError>,
    service: &dyn RepairService,
    config: &FixConfig,
) -> FixSummary {
    let start_time = Utc::now();
    let mut files = Vec::new();

    for (file, file_errors) in group_by_file(errors) {
        info!("{}", "=".repeat(60));
        info!("Processing: {file}");
        info!("Errors to fix: {}", file_errors.len());
        info!("{}", "=".repeat(60));

        let record = match FileFixSession::open(file, file_errors, config) {
            Ok(session) => session.run(service, config),
            Err(record) => record,
        };
        files.push(record);
    }

    FixSummary {
        dry_run: config.dry_run,
        fixed: files.iter().map(|f| f.fixed).sum(),
        failed: files.iter().map(|f| f.failed).sum(),
        files,
        start_time,
        end_time: Utc::now(),
    }
}

#[cfg(test)]
mod tests;
