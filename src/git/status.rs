//! Working-tree / index status from `git status --porcelain`.

use tracing::debug;

use super::types::{ChangeState, ChangedFiles, Classification, FileStatus};
use super::{RepoContext, current_branch, ensure_repository};
use crate::error::GitError;

const RENAME_ARROW: &str = " -> ";

/// Every changed path of the repository, with branch and short summary.
pub fn list_changed_files(ctx: &RepoContext) -> Result<ChangedFiles, GitError> {
    ensure_repository(ctx)?;

    let stdout = ctx.git_checked(&["-c", "core.quotePath=false", "status", "--porcelain", "-uall"])?;
    let files = parse_porcelain(&stdout);
    let branch = current_branch(ctx)?;
    let repo_summary = status_summary(ctx)?;

    debug!(repo = %ctx.root.display(), files = files.len(), branch = %branch, "Listed changed files");

    Ok(ChangedFiles { branch, repo_summary, files })
}

/// Status entry of a single path, `None` when git reports nothing for it.
///
/// A pathspec hides the source side of a rename, so a staged add is looked
/// up again in the full status and reported as `renamed` when it is one.
pub fn status_for_path(ctx: &RepoContext, path: &str) -> Result<Option<FileStatus>, GitError> {
    let stdout = ctx.git_checked(&[
        "-c",
        "core.quotePath=false",
        "status",
        "--porcelain",
        "-uall",
        "--",
        path,
    ])?;
    let Some(status) = parse_porcelain(&stdout).into_iter().next() else {
        return Ok(None);
    };
    if status.index_state != ChangeState::Added {
        return Ok(Some(status));
    }

    let full = ctx.git_checked(&["-c", "core.quotePath=false", "status", "--porcelain", "-uall"])?;
    let renamed = parse_porcelain(&full)
        .into_iter()
        .find(|entry| entry.path == status.path && entry.original_path.is_some());
    if renamed.is_some() {
        debug!(path, "Staged add is the target of a rename");
    }
    Ok(Some(renamed.unwrap_or(status)))
}

/// `git status --short --branch`, or an empty string if it fails.
pub fn status_summary(ctx: &RepoContext) -> Result<String, GitError> {
    match ctx.git(&["status", "--short", "--branch"]) {
        Ok(output) if output.success() => Ok(output.stdout.trim_end().to_string()),
        Ok(_) => Ok(String::new()),
        Err(GitError::Cancelled) => Err(GitError::Cancelled),
        Err(e) => {
            debug!(error = %e, "Could not read status summary");
            Ok(String::new())
        }
    }
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Parse porcelain v1 output. Lines are never trimmed: a leading blank is
/// the index half of the status code.
pub fn parse_porcelain(text: &str) -> Vec<FileStatus> {
    text.lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse_status_line(line);
            if parsed.is_none() {
                debug!(line, "Skipping unparsable status line");
            }
            parsed
        })
        .collect()
}

/// Parse one `XY path` or `XY old -> new` line.
pub fn parse_status_line(line: &str) -> Option<FileStatus> {
    let mut chars = line.chars();
    let index = chars.next()?;
    let worktree = chars.next()?;
    let rest = line.get(3..).filter(|r| !r.is_empty())?;

    let (original, path) = split_paths(rest);
    let index_state = ChangeState::from_code(index);
    let worktree_state = ChangeState::from_code(worktree);

    let is_rename = original.is_some() && (index == 'R' || worktree == 'R');
    let (classification, original_path) = if is_rename {
        (Classification::Renamed, original)
    } else {
        (classify(index, worktree), None)
    };

    Some(FileStatus {
        path,
        original_path,
        code: format!("{}{}", index, worktree),
        index_state,
        worktree_state,
        classification,
    })
}

/// Overall label of a status code.
///
/// Priority: `??` untracked, `!!` ignored, then the work tree half, then the
/// index half (as `staged_<x>`).
pub fn classify(index: char, worktree: char) -> Classification {
    if index == '?' && worktree == '?' {
        return Classification::Untracked;
    }
    if index == '!' && worktree == '!' {
        return Classification::Ignored;
    }

    let worktree_state = ChangeState::from_code(worktree);
    if worktree_state.is_mapped() {
        return Classification::from_state(worktree_state);
    }

    let index_state = ChangeState::from_code(index);
    if index_state.is_mapped() {
        return Classification::Staged(index_state);
    }

    Classification::Unknown
}

/// Split `old -> new` into `(Some(old), new)`; a plain path gives `(None, path)`.
fn split_paths(rest: &str) -> (Option<String>, String) {
    if rest.starts_with('"') {
        if let Some(end) = closing_quote(rest) {
            let (first, tail) = rest.split_at(end + 1);
            if let Some(second) = tail.strip_prefix(RENAME_ARROW) {
                return (Some(unquote_path(first)), unquote_path(second));
            }
            if tail.is_empty() {
                return (None, unquote_path(first));
            }
        }
    } else if let Some((first, second)) = rest.split_once(RENAME_ARROW) {
        return (Some(unquote_path(first)), unquote_path(second));
    }
    (None, unquote_path(rest))
}

/// Byte offset of the quote closing the one at offset 0.
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Undo git's C-style path quoting (`"a\tb"`, `"caf\303\251"`).
/// Unquoted input is returned as is.
pub fn unquote_path(raw: &str) -> String {
    let inner = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let esc = bytes[i + 1];
        i += 2;
        match esc {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'0'..=b'3' if i + 1 < bytes.len() && is_octal(bytes[i]) && is_octal(bytes[i + 1]) => {
                out.push((esc - b'0') * 64 + (bytes[i] - b'0') * 8 + (bytes[i + 1] - b'0'));
                i += 2;
            }
            other => out.push(other),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}
