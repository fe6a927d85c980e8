//! The canonical error model that every diagnostic parser converges on.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The diagnostic source format a record was parsed from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// Line-oriented lint output grouped under file headers (ESLint "stylish").
    Lint,
    /// `path(line,col): error CODE: message` type-checker output (tsc).
    TypeCheck,
    /// A JSON document with a `results` array (Semgrep).
    Structured,
}

impl DiagnosticFormat {
    /// The name used for this format on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticFormat::Lint => "lint",
            DiagnosticFormat::TypeCheck => "typecheck",
            DiagnosticFormat::Structured => "structured",
        }
    }
}

impl Display for DiagnosticFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One reported issue, independent of the tool that reported it.
///
/// Every record belongs to exactly one file and one line. Format-specific details survive only
/// as the optional fields (`column`, `end_line`, `suggested_fix`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CanonicalError {
    /// Path of the offending file, as reported by the tool.
    pub file: String,
    /// 1-indexed line the diagnostic applies to.
    pub line: usize,
    /// 1-indexed column, when the format reports one.
    pub column: Option<usize>,
    /// Closing line of a multi-line finding.
    pub end_line: Option<usize>,
    /// Severity as spelled by the tool (e.g. "error", "warning", "ERROR"). Not normalized.
    pub severity: String,
    pub message: String,
    /// Rule id for lint and security formats, diagnostic code for type-checker formats.
    pub rule_or_type: Option<String>,
    /// Literal patch text embedded in the diagnostic by the tool.
    pub suggested_fix: Option<String>,
    pub format: DiagnosticFormat,
}

impl CanonicalError {
    /// The rule or type identifier, or `"unknown"` if the tool did not report one.
    pub fn rule_or_unknown(&self) -> &str {
        self.rule_or_type.as_deref().unwrap_or("unknown")
    }

    /// Returns at most the first `max_chars` characters of the message, for progress output.
    pub fn message_preview(&self, max_chars: usize) -> &str {
        match self.message.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.message[..idx],
            None => &self.message,
        }
    }
}
