//! The interface through which the orchestrator asks an external service to repair a file.

use crate::diagnostic::CanonicalError;
use std::time::Duration;

/// Everything a repair service is given for one fix attempt.
#[derive(Clone, Copy, Debug)]
pub struct RepairRequest<'a> {
    pub error: &'a CanonicalError,
    /// Marked excerpt of the lines around `error.line`.
    pub context: &'a str,
    /// The complete current content of the file, including any earlier accepted fixes.
    pub file_content: &'a str,
}

/// A service that proposes replacement content for a file, given one error in it.
///
/// Implementations must not fail: transport errors, timeouts and unusable responses are all
/// reported as `None`, which callers treat the same as the service declining to propose a fix.
pub trait RepairService {
    /// Returns the proposed full replacement content of `request.error.file`, if any. The call
    /// must not take much longer than `timeout`.
    fn propose_fix(&self, request: &RepairRequest, timeout: Duration) -> Option<String>;
}
