//! Per-file diff: status classification plus the diff parser.

use tracing::debug;

use super::diff::parse_diff;
use super::status::status_for_path;
use super::types::{ChangeType, Classification, DiffHunkLine, DiffScope, DiffSection, FileDiff, FileStatus};
use super::{RepoContext, ensure_repository};
use crate::error::GitError;

/// What changed in `path`, split into staged / unstaged / untracked sections.
///
/// Untracked files are read from disk and reported as one untracked section
/// whatever the scope. Tracked files get one section per scope whose status
/// half shows a change, staged first.
pub fn get_file_diff(ctx: &RepoContext, path: &str, scope: DiffScope) -> Result<FileDiff, GitError> {
    ensure_repository(ctx)?;

    let status = status_for_path(ctx, path)?.ok_or_else(|| GitError::NoChanges {
        path: path.to_string(),
    })?;

    let sections = if status.classification == Classification::Untracked {
        read_untracked(ctx, path)?.into_iter().collect()
    } else {
        tracked_sections(ctx, path, &status, scope)?
    };

    debug!(path, status = %status.classification, sections = sections.len(), "Built file diff");

    Ok(FileDiff {
        path: path.to_string(),
        status: status.classification,
        sections,
    })
}

fn tracked_sections(
    ctx: &RepoContext,
    path: &str,
    status: &FileStatus,
    scope: DiffScope,
) -> Result<Vec<DiffSection>, GitError> {
    let mut sections = Vec::new();

    for &change_type in scope.change_types() {
        let half = match change_type {
            ChangeType::Staged => status.index_code(),
            _ => status.worktree_code(),
        };
        if half == ' ' || half == '?' {
            continue;
        }

        let mut args = vec!["diff", "--no-color", "--no-ext-diff"];
        if change_type == ChangeType::Staged {
            args.push("--cached");
        }
        args.extend(["--", path]);

        let text = ctx.git_checked(&args)?;
        if text.trim().is_empty() {
            continue;
        }

        let parsed = parse_diff(&text);
        if parsed.is_empty() {
            continue;
        }
        sections.push(DiffSection {
            change_type,
            added: parsed.added,
            removed: parsed.removed,
        });
    }

    Ok(sections)
}

fn read_untracked(ctx: &RepoContext, path: &str) -> Result<Option<DiffSection>, GitError> {
    let full = ctx.root().join(path);
    let (content, lossy) = crate::read_file_lossy(&full).map_err(|source| GitError::FileRead {
        path: path.to_string(),
        source,
    })?;
    if lossy {
        debug!(path, "Untracked file is not valid UTF-8, decoded lossily");
    }
    Ok(untracked_section(&content))
}

/// Every line of a new file as an added line, numbered from 1.
/// Empty content gives no section. A CRLF line keeps its `\r`.
pub fn untracked_section(content: &str) -> Option<DiffSection> {
    let added: Vec<DiffHunkLine> = content
        .split_terminator('\n')
        .enumerate()
        .map(|(i, line)| DiffHunkLine::added(i as u32 + 1, line))
        .collect();

    if added.is_empty() {
        return None;
    }
    Some(DiffSection {
        change_type: ChangeType::Untracked,
        added,
        removed: Vec::new(),
    })
}
