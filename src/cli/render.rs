//! Human-readable views of operation results.

use std::fmt::Write;

use crate::git::types::{ChangeType, ChangedFiles, CommitHistory, FileDiff};

const SHORT_HASH_LEN: usize = 7;

pub fn render_changed_files(changed: &ChangedFiles) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Branch: {}", changed.branch);
    if !changed.repo_summary.is_empty() {
        let _ = writeln!(out, "{}", changed.repo_summary);
    }
    let _ = writeln!(out);

    if changed.files.is_empty() {
        let _ = writeln!(out, "No changes.");
        return out;
    }

    let _ = writeln!(out, "Changed files ({}):", changed.files.len());
    for (i, file) in changed.files.iter().enumerate() {
        let _ = writeln!(out, "{}. [{}] {}", i + 1, file.classification, file.path);
        if let Some(original) = &file.original_path {
            let _ = writeln!(out, "   (from {})", original);
        }
    }
    out
}

pub fn render_file_diff(diff: &FileDiff) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {} [{}]", diff.path, diff.status);

    if diff.sections.is_empty() {
        let _ = writeln!(out, "\nNo changes in the requested scope.");
        return out;
    }

    for section in &diff.sections {
        let title = match section.change_type {
            ChangeType::Staged => "STAGED CHANGES",
            ChangeType::Unstaged => "UNSTAGED CHANGES",
            ChangeType::Untracked => "UNTRACKED FILE",
        };
        let _ = writeln!(out, "\n--- {} ---", title);
        for line in &section.removed {
            let _ = writeln!(out, "- {}", line.content);
        }
        for line in &section.added {
            match line.line_number {
                Some(n) => {
                    let _ = writeln!(out, "+ [{}] {}", n, line.content);
                }
                None => {
                    let _ = writeln!(out, "+ {}", line.content);
                }
            }
        }
    }
    out
}

pub fn render_history(history: &CommitHistory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Branch: {}", history.branch);

    if history.commits.is_empty() {
        let _ = writeln!(out, "No commits.");
        return out;
    }

    let _ = writeln!(out, "Commits ({}):", history.commits.len());
    for (i, commit) in history.commits.iter().enumerate() {
        let short = commit.hash.get(..SHORT_HASH_LEN).unwrap_or(&commit.hash);
        let _ = writeln!(out, "{}. [{}] {} - {}", i + 1, short, commit.date, commit.author_name);
        let _ = writeln!(out, "   {}", commit.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::{
        ChangeState, Classification, CommitRecord, DiffHunkLine, DiffSection, FileStatus,
    };

    #[test]
    fn test_render_changed_files() {
        let changed = ChangedFiles {
            branch: "main".to_string(),
            repo_summary: "## main".to_string(),
            files: vec![
                FileStatus {
                    path: "a.rs".to_string(),
                    original_path: None,
                    code: " M".to_string(),
                    index_state: ChangeState::None,
                    worktree_state: ChangeState::Modified,
                    classification: Classification::Modified,
                },
                FileStatus {
                    path: "new.rs".to_string(),
                    original_path: Some("old.rs".to_string()),
                    code: "R ".to_string(),
                    index_state: ChangeState::Renamed,
                    worktree_state: ChangeState::None,
                    classification: Classification::Renamed,
                },
            ],
        };
        let text = render_changed_files(&changed);
        assert!(text.starts_with("Branch: main\n## main\n"));
        assert!(text.contains("1. [modified] a.rs\n"));
        assert!(text.contains("2. [renamed] new.rs\n   (from old.rs)\n"));
    }

    #[test]
    fn test_render_changed_files_empty() {
        let changed = ChangedFiles { branch: "main".to_string(), repo_summary: String::new(), files: vec![] };
        assert!(render_changed_files(&changed).contains("No changes."));
    }

    #[test]
    fn test_render_file_diff() {
        let diff = FileDiff {
            path: "a.txt".to_string(),
            status: Classification::Modified,
            sections: vec![DiffSection {
                change_type: ChangeType::Staged,
                added: vec![DiffHunkLine::added(2, "TWO")],
                removed: vec![DiffHunkLine::removed("two")],
            }],
        };
        let text = render_file_diff(&diff);
        assert!(text.contains("File: a.txt [modified]"));
        assert!(text.contains("--- STAGED CHANGES ---\n- two\n+ [2] TWO\n"));
    }

    #[test]
    fn test_render_history_short_hash() {
        let history = CommitHistory {
            branch: "main".to_string(),
            commits: vec![CommitRecord {
                hash: "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3".to_string(),
                author_name: "Ada".to_string(),
                author_email: "ada@example.com".to_string(),
                date: "2024-03-01T10:00:00+00:00".to_string(),
                message: "Add engine".to_string(),
            }],
        };
        let text = render_history(&history);
        assert!(text.contains("1. [a94a8fe] 2024-03-01T10:00:00+00:00 - Ada\n   Add engine\n"));
    }
}
