//! Marked excerpts of the lines surrounding a diagnostic.

use std::fs;
use std::path::Path;

/// Lines shown on each side of the target line when no other window is configured.
pub const DEFAULT_CONTEXT_LINES: usize = 10;

const TARGET_MARKER: &str = ">>> ";
const CONTEXT_MARKER: &str = "    ";

/// Reads `path` and returns the excerpt around `line` (see [`excerpt`]).
///
/// Context is advisory, so an unreadable file produces a placeholder string rather than an error.
pub fn file_context(path: &Path, line: usize, window: usize) -> String {
    match fs::read_to_string(path) {
        Ok(content) => excerpt(&content, line, window),
        Err(e) => format!("Could not read file: {e}"),
    }
}

/// Renders lines `max(1, line - window)..=min(line_count, line + window)` of `content`, one per
/// output line as `"{marker}{n}: {text}"`. The target line is marked with `>>> `.
pub fn excerpt(content: &str, line: usize, window: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let first = line.saturating_sub(window).max(1);
    let last = line.saturating_add(window).min(lines.len());

    (first..=last)
        .map(|n| {
            let marker = if n == line {
                TARGET_MARKER
            } else {
                CONTEXT_MARKER
            };
            format!("{marker}{n}: {}", lines[n - 1].trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
