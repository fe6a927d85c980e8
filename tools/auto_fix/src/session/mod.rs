//! One file's fix session: the errors reported for the file, fixed one at a time against the
//! file's latest content.

use crate::FixConfig;
use crate::context::excerpt;
use autofix_core::diagnostic::CanonicalError;
use autofix_core::repair::{RepairRequest, RepairService};
use serde::Serialize;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Why an error could not be fixed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The file did not exist when its session started. The service was not called.
    FileMissing,
    /// The file exists but could not be read as text. The service was not called.
    FileUnreadable,
    /// The service declined, failed, timed out, or returned nothing usable.
    NoFix,
    /// The service returned the content it was sent (ignoring surrounding whitespace).
    Unchanged,
    /// The fix was accepted but the file could not be overwritten.
    WriteFailed,
}

/// Result of attempting to fix one error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixOutcome {
    /// Accepted and written to disk.
    Applied,
    /// Accepted in dry-run mode; nothing was written.
    Generated,
    Failed(FailureReason),
}

impl FixOutcome {
    /// Whether the service proposed a genuine change that was kept.
    pub fn accepted(self) -> bool {
        matches!(self, FixOutcome::Applied | FixOutcome::Generated)
    }

    /// Whether the change was written to disk.
    pub fn applied(self) -> bool {
        matches!(self, FixOutcome::Applied)
    }
}

/// A proposed replacement counts only if it is non-empty and differs from the content that was
/// sent once leading and trailing whitespace is ignored.
pub fn is_real_change(sent: &str, candidate: &str) -> bool {
    !candidate.is_empty() && candidate.trim() != sent.trim()
}

/// The outcome of one error within a [`FileRecord`].
#[derive(Clone, Debug, Serialize)]
pub struct AttemptRecord {
    pub line: usize,
    pub rule_or_type: Option<String>,
    pub outcome: FixOutcome,
}

/// Per-file results, in the order the errors were reported.
#[derive(Clone, Debug, Serialize)]
pub struct FileRecord {
    pub file: String,
    pub fixed: usize,
    pub failed: usize,
    pub attempts: Vec<AttemptRecord>,
}

impl FileRecord {
    fn new(file: String, errors: &[CanonicalError], outcomes: Vec<FixOutcome>) -> FileRecord {
        let fixed = outcomes.iter().filter(|o| o.accepted()).count();
        let attempts: Vec<_> = errors
            .iter()
            .zip(outcomes)
            .map(|(error, outcome)| AttemptRecord {
                line: error.line,
                rule_or_type: error.rule_or_type.clone(),
                outcome,
            })
            .collect();
        FileRecord {
            failed: attempts.len() - fixed,
            fixed,
            file,
            attempts,
        }
    }
}

/// State of the fix loop for a single file.
///
/// `working_content` starts as the file's content on disk and is replaced by every fix that is
/// written, so each request sees all earlier fixes. In dry-run mode it never changes.
pub struct FileFixSession {
    file: String,
    path: PathBuf,
    errors: Vec<CanonicalError>,
    working_content: String,
}

impl FileFixSession {
    /// Reads the file and starts a session. If the file is missing or unreadable, every error is
    /// failed immediately and the returned record is the session's final result.
    pub fn open(
        file: String,
        errors: Vec<CanonicalError>,
        config: &FixConfig,
    ) -> Result<FileFixSession, FileRecord> {
        let path = config.resolve(&file);
        let reason = if !path.exists() {
            warn!("  ⚠ File not found, skipping");
            FailureReason::FileMissing
        } else {
            match fs::read_to_string(&path) {
                Ok(working_content) => {
                    return Ok(FileFixSession {
                        file,
                        path,
                        errors,
                        working_content,
                    });
                }
                Err(e) => {
                    warn!("  ⚠ Could not read {}: {e}, skipping", path.display());
                    FailureReason::FileUnreadable
                }
            }
        };
        let outcomes = vec![FixOutcome::Failed(reason); errors.len()];
        Err(FileRecord::new(file, &errors, outcomes))
    }

    /// Attempts every error in order and returns the per-file results.
    pub fn run(mut self, service: &dyn RepairService, config: &FixConfig) -> FileRecord {
        let errors = std::mem::take(&mut self.errors);
        let outcomes = errors
            .iter()
            .map(|error| self.attempt(error, service, config))
            .collect();
        FileRecord::new(self.file, &errors, outcomes)
    }

    fn attempt(
        &mut self,
        error: &CanonicalError,
        service: &dyn RepairService,
        config: &FixConfig,
    ) -> FixOutcome {
        info!(
            "  Fixing: Line {} - {}...",
            error.line,
            error.message_preview(60)
        );

        let candidate = {
            let context = excerpt(&self.working_content, error.line, config.context_lines);
            let request = RepairRequest {
                error,
                context: &context,
                file_content: &self.working_content,
            };
            service.propose_fix(&request, config.timeout)
        };

        let Some(candidate) = candidate else {
            warn!("  ✗ Could not generate fix");
            return FixOutcome::Failed(FailureReason::NoFix);
        };
        if !is_real_change(&self.working_content, &candidate) {
            warn!("  ✗ Could not generate fix (proposed content is unchanged)");
            return FixOutcome::Failed(FailureReason::Unchanged);
        }

        if config.dry_run {
            info!("  ✓ Fix generated (dry run, not applied)");
            return FixOutcome::Generated;
        }

        match write_atomically(&self.path, &candidate) {
            Ok(()) => {
                debug!("Wrote {} bytes to {}", candidate.len(), self.path.display());
                self.working_content = candidate;
                info!("  ✓ Fix applied");
                FixOutcome::Applied
            }
            Err(e) => {
                error!("  ✗ Failed to write {}: {e}", self.path.display());
                FixOutcome::Failed(FailureReason::WriteFailed)
            }
        }
    }
}

/// Replaces the content of `path` by renaming a fully written temporary file over it, so the file
/// is either entirely replaced or left untouched. Symlinks are followed: the temporary file is
/// created next to the link's target and replaces the target. The existing permissions are kept.
fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().set_permissions(fs::metadata(&target)?.permissions())?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
