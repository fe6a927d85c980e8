//! Diagnostic parsers. Each turns one tool's output format into [`CanonicalError`]s, in the
//! order they appear in the input, without deduplicating.

mod lint;
mod structured;
mod typecheck;

use crate::Error;
use autofix_core::diagnostic::{CanonicalError, DiagnosticFormat};
use std::path::Path;
use tracing::debug;

pub use lint::LintParser;
pub use structured::StructuredParser;
pub use typecheck::TypeCheckParser;

/// Parses raw diagnostic output. Malformed records are skipped; parsing never fails as a whole.
pub trait DiagnosticParser {
    fn parse(&self, raw: &str) -> Vec<CanonicalError>;
}

/// Returns the parser for `format`.
pub fn parser_for(format: DiagnosticFormat) -> Box<dyn DiagnosticParser> {
    match format {
        DiagnosticFormat::Lint => Box::new(LintParser),
        DiagnosticFormat::TypeCheck => Box::new(TypeCheckParser),
        DiagnosticFormat::Structured => Box::new(StructuredParser),
    }
}

/// Reads the diagnostic file at `path` and parses it as `format`.
///
/// Structured input is handed to [`StructuredParser::parse_file`] unread, so that the parser owns
/// JSON decoding and reports decode failures itself. Only a missing or unreadable input file is
/// an error.
pub fn load_errors(format: DiagnosticFormat, path: &Path) -> Result<Vec<CanonicalError>, Error> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let errors = match format {
        DiagnosticFormat::Structured => StructuredParser.parse_file(path)?,
        _ => {
            let raw = std::fs::read_to_string(path).map_err(|source| Error::ReadInput {
                path: path.to_path_buf(),
                source,
            })?;
            parser_for(format).parse(&raw)
        }
    };

    debug!(
        "Parsed {} {} diagnostics from {}",
        errors.len(),
        format,
        path.display()
    );
    Ok(errors)
}
