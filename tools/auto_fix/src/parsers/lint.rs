//! Parser for ESLint-style "stylish" output:
//!
//! ```text
//! /repo/src/a.ts
//!   10:5  error    'x' is assigned a value but never used  no-unused-vars
//!   12:1  warning  Unexpected console statement            no-console
//! ```

use super::DiagnosticParser;
use autofix_core::diagnostic::{CanonicalError, DiagnosticFormat};
use tracing::trace;

const SEVERITY_KEYWORDS: [&str; 2] = ["error", "warning"];

pub struct LintParser;

impl DiagnosticParser for LintParser {
    fn parse(&self, raw: &str) -> Vec<CanonicalError> {
        let mut errors = Vec::new();
        let mut current_file: Option<&str> = None;

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // File header lines move the cursor and are never errors themselves.
            if !line.starts_with(char::is_whitespace) && is_path_like(trimmed) {
                current_file = Some(trimmed);
                continue;
            }

            let Some(file) = current_file else { continue };
            if !trimmed.contains(':') || !SEVERITY_KEYWORDS.iter().any(|k| trimmed.contains(k)) {
                continue;
            }

            match parse_error_line(file, trimmed) {
                Some(error) => errors.push(error),
                None => trace!("Skipping malformed lint line: {trimmed:?}"),
            }
        }

        errors
    }
}

fn is_path_like(line: &str) -> bool {
    if ["/", "./", "../", "~/"].iter().any(|p| line.starts_with(p)) {
        return true;
    }
    // Windows drive prefix, e.g. `C:\src\a.ts`.
    if let [drive, b':', sep, ..] = line.as_bytes()
        && drive.is_ascii_alphabetic()
        && (*sep == b'\\' || *sep == b'/')
    {
        return true;
    }
    !line.contains(char::is_whitespace) && (line.contains('/') || line.contains('\\'))
}

/// Splits `<line>:<col> <severity> <message...> <rule>`. Needs at least four tokens.
fn parse_error_line(file: &str, line: &str) -> Option<CanonicalError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [location, severity, message @ .., rule] = tokens.as_slice() else {
        return None;
    };
    if message.is_empty() {
        return None;
    }

    let (line_no, column) = location.split_once(':')?;
    let line_no = line_no.parse::<usize>().ok().filter(|&n| n > 0)?;
    let column = column.parse::<usize>().ok()?;

    Some(CanonicalError {
        file: file.to_string(),
        line: line_no,
        column: Some(column),
        end_line: None,
        severity: severity.to_string(),
        message: message.join(" "),
        rule_or_type: Some(rule.to_string()),
        suggested_fix: None,
        format: DiagnosticFormat::Lint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLISH: &str = "
/home/dev/app/src/a.ts
  10:5   error    'x' is assigned a value but never used  no-unused-vars
  12:1   warning  Unexpected console statement            no-console

/home/dev/app/src/b.ts
  3:14  error  Missing return type on function  @typescript-eslint/explicit-function-return-type

✖ 3 problems (2 errors, 1 warning)
";

    #[test]
    fn parses_stylish_output() {
        let errors = LintParser.parse(STYLISH);
        assert_eq!(errors.len(), 3);

        assert_eq!(errors[0].file, "/home/dev/app/src/a.ts");
        assert_eq!(errors[0].line, 10);
        assert_eq!(errors[0].column, Some(5));
        assert_eq!(errors[0].severity, "error");
        assert_eq!(
            errors[0].message,
            "'x' is assigned a value but never used"
        );
        assert_eq!(errors[0].rule_or_type.as_deref(), Some("no-unused-vars"));

        assert_eq!(errors[1].line, 12);
        assert_eq!(errors[1].severity, "warning");
        assert_eq!(errors[1].rule_or_type.as_deref(), Some("no-console"));

        assert_eq!(errors[2].file, "/home/dev/app/src/b.ts");
        assert_eq!(errors[2].line, 3);
        assert_eq!(errors[2].column, Some(14));
        assert_eq!(
            errors[2].rule_or_type.as_deref(),
            Some("@typescript-eslint/explicit-function-return-type")
        );
        assert!(errors.iter().all(|e| e.format == DiagnosticFormat::Lint));
        assert!(errors.iter().all(|e| e.end_line.is_none() && e.suggested_fix.is_none()));
    }

    #[test]
    fn rule_is_last_token_and_message_is_rejoined() {
        let errors = LintParser.parse("src/a.ts\n  1:2  error  a   b\tc  rule-x\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "a b c");
        assert_eq!(errors[0].rule_or_type.as_deref(), Some("rule-x"));
    }

    #[test]
    fn error_lines_need_a_file_cursor() {
        let errors = LintParser.parse(
            "  1:1  error  No file yet  some-rule\n\
             /x/a.ts\n  2:1  error  Ok now  r\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let input = "\
/x/a.ts
  1:1  error  short
  abc:1  error  Bad location  r
  0:1  error  Zero line  r
  4:x  error  Bad column  r
  5:2  error  Good one  r
";
        let errors = LintParser.parse(input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 5);
        assert_eq!(errors[0].message, "Good one");
    }

    #[test]
    fn lines_without_colon_or_severity_are_ignored() {
        let input = "/x/a.ts\n  1:1  info  Just info  r\n  note error without location\n";
        assert!(LintParser.parse(input).is_empty());
    }

    #[test]
    fn indented_paths_do_not_move_the_cursor() {
        let input = "/x/a.ts\n  /x/b.ts\n  1:1  error  Still a.ts  r\n";
        let errors = LintParser.parse(input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file, "/x/a.ts");
    }

    #[test]
    fn path_like_headers() {
        assert!(is_path_like("/abs/a.ts"));
        assert!(is_path_like("./rel/a.ts"));
        assert!(is_path_like("../up/a.ts"));
        assert!(is_path_like("C:\\src\\a.ts"));
        assert!(is_path_like("src/a.ts"));
        assert!(!is_path_like("✖ 3 problems (2 errors, 1 warning)"));
        assert!(!is_path_like("10:5 error msg rule"));
    }
}
