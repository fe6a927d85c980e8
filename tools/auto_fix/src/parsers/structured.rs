//! Parser for Semgrep's JSON report (`semgrep --json`).

use super::DiagnosticParser;
use crate::Error;
use autofix_core::diagnostic::{CanonicalError, DiagnosticFormat};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{error, warn};

const DEFAULT_SEVERITY: &str = "warning";

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    results: Vec<Finding>,
}

#[derive(Debug, Deserialize)]
struct Finding {
    path: String,
    check_id: String,
    start: Position,
    end: Position,
    extra: Extra,
}

#[derive(Debug, Deserialize)]
struct Position {
    line: usize,
    #[serde(default)]
    col: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Extra {
    message: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    fix: Option<String>,
}

impl From<Finding> for CanonicalError {
    fn from(finding: Finding) -> CanonicalError {
        CanonicalError {
            file: finding.path,
            line: finding.start.line,
            column: finding.start.col,
            end_line: Some(finding.end.line),
            severity: finding
                .extra
                .severity
                .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
            message: finding.extra.message,
            rule_or_type: Some(finding.check_id),
            suggested_fix: finding.extra.fix,
            format: DiagnosticFormat::Structured,
        }
    }
}

pub struct StructuredParser;

impl StructuredParser {
    /// Opens and decodes the report at `path`. Only failing to open the file is an error; an
    /// undecodable report is logged and yields no diagnostics.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<CanonicalError>, Error> {
        let file = File::open(path).map_err(|source| Error::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(convert(serde_json::from_reader(BufReader::new(file))))
    }
}

impl DiagnosticParser for StructuredParser {
    fn parse(&self, raw: &str) -> Vec<CanonicalError> {
        convert(serde_json::from_str(raw))
    }
}

fn convert(report: serde_json::Result<Report>) -> Vec<CanonicalError> {
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            error!("Error parsing structured diagnostics: {e}");
            return vec![];
        }
    };

    report
        .results
        .into_iter()
        .filter(|finding| {
            let usable = finding.start.line > 0
                && !finding.path.is_empty()
                && !finding.extra.message.is_empty();
            if !usable {
                warn!(
                    "Skipping structured result {} at {}:{} (missing location or message)",
                    finding.check_id, finding.path, finding.start.line
                );
            }
            usable
        })
        .map(CanonicalError::from)
        .collect()
}
