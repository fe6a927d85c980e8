//! Parser for TypeScript compiler output, one diagnostic per line:
//!
//! ```text
//! src/file.ts(10,5): error TS2322: Type 'string' is not assignable to type 'number'.
//! ```

use super::DiagnosticParser;
use autofix_core::diagnostic::{CanonicalError, DiagnosticFormat};
use tracing::trace;

const ERROR_MARKER: &str = ": error ";
const CODE_MARKER: &str = "TS";
/// `ERROR_MARKER` immediately followed by `CODE_MARKER`.
const CANDIDATE_MARKER: &str = ": error TS";

pub struct TypeCheckParser;

impl DiagnosticParser for TypeCheckParser {
    fn parse(&self, raw: &str) -> Vec<CanonicalError> {
        raw.lines()
            .filter(|line| line.contains(CANDIDATE_MARKER))
            .filter_map(|line| {
                let parsed = parse_line(line);
                if parsed.is_none() {
                    trace!("Skipping malformed type-checker line: {line:?}");
                }
                parsed
            })
            .collect()
    }
}

fn parse_line(line: &str) -> Option<CanonicalError> {
    let (path_part, rest) = line.split_once(ERROR_MARKER)?;
    let (file, location) = path_part.rsplit_once('(')?;
    let location = location.strip_suffix(')')?;
    let (line_no, column) = location.split_once(',')?;
    let line_no = line_no.trim().parse::<usize>().ok().filter(|&n| n > 0)?;
    let column = column.trim().parse::<usize>().ok()?;

    let file = file.trim();
    if file.is_empty() {
        return None;
    }

    let rest = rest.trim();
    let (code, message) = match rest.split_once(':') {
        Some((code, message)) if !message.trim().is_empty() => (code.trim(), message.trim()),
        Some((code, _)) => (code.trim(), rest),
        None => (rest.split_whitespace().next().unwrap_or(rest), rest),
    };
    let code = code.starts_with(CODE_MARKER).then(|| code.to_string());

    Some(CanonicalError {
        file: file.to_string(),
        line: line_no,
        column: Some(column),
        end_line: None,
        severity: "error".to_string(),
        message: message.to_string(),
        rule_or_type: code,
        suggested_fix: None,
        format: DiagnosticFormat::TypeCheck,
    })
}
