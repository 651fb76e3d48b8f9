//! Unified diff parser. Pure: text in, added/removed lines out.
//!
//! This is the only diff parser in the crate; status-driven file diffs and
//! anything else that reads `git diff` output go through [`parse_diff`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::types::DiffHunkLine;
use crate::error::GitError;

/// Captures the new-file start of `@@ -a[,b] +c[,d] @@`.
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -[^ ]* \+([^, ]*)").expect("hunk header regex is valid")
});

/// Added and removed lines of one diff, in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedDiff {
    pub added: Vec<DiffHunkLine>,
    pub removed: Vec<DiffHunkLine>,
}

impl ParsedDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// New-file start line of a hunk header.
pub fn parse_hunk_header(line: &str) -> Result<u32, GitError> {
    HUNK_HEADER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| GitError::MalformedHunkHeader(line.to_string()))
}

/// Parse unified diff text.
///
/// A single counter tracks the new-file line: hunk headers reset it, added
/// and context lines advance it, removed lines leave it alone. A malformed
/// header keeps the previous counter, which starts at 1. Lines are split on
/// `\n` only, so a CRLF file keeps its `\r` in the content.
pub fn parse_diff(text: &str) -> ParsedDiff {
    let mut parsed = ParsedDiff::default();
    let mut next_line: u32 = 1;

    for line in text.split_terminator('\n') {
        if line.starts_with("@@") {
            match parse_hunk_header(line) {
                Ok(start) => next_line = start,
                Err(e) => debug!(error = %e, "Keeping line counter"),
            }
        } else if line.starts_with("+++") || line.starts_with("---") {
            // file headers
        } else if let Some(content) = line.strip_prefix('+') {
            parsed.added.push(DiffHunkLine::added(next_line, content));
            next_line = next_line.saturating_add(1);
        } else if let Some(content) = line.strip_prefix('-') {
            parsed.removed.push(DiffHunkLine::removed(content));
        } else if !line.starts_with('\\') {
            next_line = next_line.saturating_add(1);
        }
    }

    parsed
}
