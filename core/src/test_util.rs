//! Place to put utilities that are only used by tests.

use crate::repair::{RepairRequest, RepairService};
use std::cell::RefCell;
use std::time::Duration;

/// Returns a new temporary directory. Unlike the defaults in the `tempdir` and `tempfile` crates,
/// this directory is not world-accessible by default.
#[cfg(not(miri))]
pub fn tempdir() -> std::io::Result<tempfile::TempDir> {
    use std::fs::Permissions;
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o700));
    }
    builder.tempdir()
}

/// What a [`MockRepairService`] saw for one call.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub file: String,
    pub line: usize,
    pub context: String,
    pub file_content: String,
}

/// A repair service that can be programmed to have many different behaviors, for testing code
/// that calls `RepairService::propose_fix`. Every call is recorded.
pub struct MockRepairService {
    #[allow(clippy::type_complexity)]
    respond: RefCell<Box<dyn FnMut(&RepairRequest) -> Option<String>>>,
    calls: RefCell<Vec<RecordedRequest>>,
}

impl Default for MockRepairService {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder-style API for configuring how this MockRepairService behaves.
///
/// # Example
/// ```
/// use autofix_core::test_util::MockRepairService;
/// let service = MockRepairService::new()
///     .respond(|request| Some(request.file_content.replace("var", "let")));
/// ```
impl MockRepairService {
    /// Creates a new MockRepairService that never proposes a fix.
    pub fn new() -> MockRepairService {
        MockRepairService {
            respond: RefCell::new(Box::new(|_| None)),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Sets a closure to be run when `RepairService::propose_fix` is called.
    pub fn respond<F: FnMut(&RepairRequest) -> Option<String> + 'static>(
        self,
        f: F,
    ) -> MockRepairService {
        *self.respond.borrow_mut() = Box::new(f);
        self
    }

    /// Makes every call return the file content it was sent, unchanged.
    pub fn echo(self) -> MockRepairService {
        self.respond(|request| Some(request.file_content.to_string()))
    }

    /// Returns the calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl RepairService for MockRepairService {
    fn propose_fix(&self, request: &RepairRequest, _timeout: Duration) -> Option<String> {
        self.calls.borrow_mut().push(RecordedRequest {
            file: request.error.file.clone(),
            line: request.error.line,
            context: request.context.to_string(),
            file_content: request.file_content.to_string(),
        });
        (*self.respond.borrow_mut())(request)
    }
}
