//! Value types produced by the git inspection operations.
//!
//! All of them are request-scoped: built fresh for one query, never mutated
//! afterwards, serialized with camelCase field names.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

// ─── Status ─────────────────────────────────────────────────────────

/// State of one half (index or work tree) of a porcelain status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    None,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Ignored,
    Unknown,
}

impl ChangeState {
    /// Map a porcelain status character.
    pub fn from_code(code: char) -> Self {
        match code {
            ' ' => ChangeState::None,
            'A' => ChangeState::Added,
            'M' => ChangeState::Modified,
            'D' => ChangeState::Deleted,
            'R' => ChangeState::Renamed,
            'C' => ChangeState::Copied,
            'U' => ChangeState::Unmerged,
            '?' => ChangeState::Untracked,
            '!' => ChangeState::Ignored,
            _ => ChangeState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeState::None => "none",
            ChangeState::Added => "added",
            ChangeState::Modified => "modified",
            ChangeState::Deleted => "deleted",
            ChangeState::Renamed => "renamed",
            ChangeState::Copied => "copied",
            ChangeState::Unmerged => "unmerged",
            ChangeState::Untracked => "untracked",
            ChangeState::Ignored => "ignored",
            ChangeState::Unknown => "unknown",
        }
    }

    /// True when the character is part of the status table (not blank, not unknown).
    pub fn is_mapped(&self) -> bool {
        !matches!(self, ChangeState::None | ChangeState::Unknown)
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall label derived from both halves of a status code.
///
/// `Staged(state)` is used when only the index side carries a change;
/// it renders as `staged_<state>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Ignored,
    Staged(ChangeState),
    Unknown,
}

impl Classification {
    /// Label for a change observed directly (work tree side).
    pub(crate) fn from_state(state: ChangeState) -> Self {
        match state {
            ChangeState::Added => Classification::Added,
            ChangeState::Modified => Classification::Modified,
            ChangeState::Deleted => Classification::Deleted,
            ChangeState::Renamed => Classification::Renamed,
            ChangeState::Copied => Classification::Copied,
            ChangeState::Unmerged => Classification::Unmerged,
            ChangeState::Untracked => Classification::Untracked,
            ChangeState::Ignored => Classification::Ignored,
            ChangeState::None | ChangeState::Unknown => Classification::Unknown,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Classification::Added => "added".to_string(),
            Classification::Modified => "modified".to_string(),
            Classification::Deleted => "deleted".to_string(),
            Classification::Renamed => "renamed".to_string(),
            Classification::Copied => "copied".to_string(),
            Classification::Unmerged => "unmerged".to_string(),
            Classification::Untracked => "untracked".to_string(),
            Classification::Ignored => "ignored".to_string(),
            Classification::Staged(state) => format!("staged_{}", state.as_str()),
            Classification::Unknown => "unknown".to_string(),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// One path touched in the working tree or index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub path: String,
    /// Rename source. Set iff `classification == Renamed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    /// Raw two-character porcelain code, e.g. `"M "`, `"??"`.
    pub code: String,
    pub index_state: ChangeState,
    pub worktree_state: ChangeState,
    pub classification: Classification,
}

impl FileStatus {
    pub fn index_code(&self) -> char {
        self.code.chars().next().unwrap_or(' ')
    }

    pub fn worktree_code(&self) -> char {
        self.code.chars().nth(1).unwrap_or(' ')
    }
}

/// Result of listing every changed path, plus repository-level context.
#[derive(Clone, Debug)]
pub struct ChangedFiles {
    pub branch: String,
    /// Output of `git status --short --branch`.
    pub repo_summary: String,
    pub files: Vec<FileStatus>,
}

// ─── Diff ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    Added,
    Removed,
}

/// One added or removed line of a diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunkLine {
    pub kind: DiffLineKind,
    pub content: String,
    /// 1-based position in the new file. Removed lines never carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
}

impl DiffHunkLine {
    pub fn added(line_number: u32, content: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Added,
            content: content.into(),
            line_number: Some(line_number),
        }
    }

    pub fn removed(content: impl Into<String>) -> Self {
        Self {
            kind: DiffLineKind::Removed,
            content: content.into(),
            line_number: None,
        }
    }
}

/// Which side of the repository a diff section describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Staged,
    Unstaged,
    Untracked,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Staged => "staged",
            ChangeType::Unstaged => "unstaged",
            ChangeType::Untracked => "untracked",
        }
    }
}

/// Requested diff scope. `All` expands to staged then unstaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiffScope {
    #[default]
    All,
    Staged,
    Unstaged,
}

impl DiffScope {
    /// Section kinds covered by this scope, in emission order.
    pub fn change_types(&self) -> &'static [ChangeType] {
        match self {
            DiffScope::All => &[ChangeType::Staged, ChangeType::Unstaged],
            DiffScope::Staged => &[ChangeType::Staged],
            DiffScope::Unstaged => &[ChangeType::Unstaged],
        }
    }
}

impl FromStr for DiffScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DiffScope::All),
            "staged" => Ok(DiffScope::Staged),
            "unstaged" => Ok(DiffScope::Unstaged),
            other => Err(format!(
                "Invalid diff type '{}': expected one of all, staged, unstaged",
                other
            )),
        }
    }
}

/// Added/removed lines of one diff scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSection {
    pub change_type: ChangeType,
    pub added: Vec<DiffHunkLine>,
    pub removed: Vec<DiffHunkLine>,
}

/// Everything that changed in one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub path: String,
    pub status: Classification,
    pub sections: Vec<DiffSection>,
}

// ─── History ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// ISO-8601 author date
    pub date: String,
    /// Subject line only
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHistory {
    pub branch: String,
    /// Most recent first
    pub commits: Vec<CommitRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_state_table() {
        assert_eq!(ChangeState::from_code('A'), ChangeState::Added);
        assert_eq!(ChangeState::from_code('M'), ChangeState::Modified);
        assert_eq!(ChangeState::from_code('D'), ChangeState::Deleted);
        assert_eq!(ChangeState::from_code('R'), ChangeState::Renamed);
        assert_eq!(ChangeState::from_code('C'), ChangeState::Copied);
        assert_eq!(ChangeState::from_code('U'), ChangeState::Unmerged);
        assert_eq!(ChangeState::from_code('?'), ChangeState::Untracked);
        assert_eq!(ChangeState::from_code('!'), ChangeState::Ignored);
        assert_eq!(ChangeState::from_code(' '), ChangeState::None);
        assert_eq!(ChangeState::from_code('T'), ChangeState::Unknown);
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::Modified.label(), "modified");
        assert_eq!(Classification::Staged(ChangeState::Added).label(), "staged_added");
        assert_eq!(Classification::Staged(ChangeState::Deleted).to_string(), "staged_deleted");
        assert_eq!(json!(Classification::Untracked), json!("untracked"));
    }

    #[test]
    fn test_removed_line_serializes_without_line_number() {
        let value = serde_json::to_value(DiffHunkLine::removed("old")).unwrap();
        assert_eq!(value, json!({ "kind": "removed", "content": "old" }));
        assert!(value.get("lineNumber").is_none());
    }

    #[test]
    fn test_added_line_serializes_line_number() {
        let value = serde_json::to_value(DiffHunkLine::added(7, "new")).unwrap();
        assert_eq!(value["lineNumber"], 7);
        assert_eq!(value["kind"], "added");
    }

    #[test]
    fn test_file_status_serialization() {
        let status = FileStatus {
            path: "new.txt".to_string(),
            original_path: Some("old.txt".to_string()),
            code: "R ".to_string(),
            index_state: ChangeState::Renamed,
            worktree_state: ChangeState::None,
            classification: Classification::Renamed,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["path"], "new.txt");
        assert_eq!(value["originalPath"], "old.txt");
        assert_eq!(value["indexState"], "renamed");
        assert_eq!(value["worktreeState"], "none");
        assert_eq!(value["classification"], "renamed");
        assert_eq!(status.index_code(), 'R');
        assert_eq!(status.worktree_code(), ' ');
    }

    #[test]
    fn test_diff_scope_parse() {
        assert_eq!("all".parse::<DiffScope>(), Ok(DiffScope::All));
        assert_eq!("Staged".parse::<DiffScope>(), Ok(DiffScope::Staged));
        assert_eq!(" unstaged ".parse::<DiffScope>(), Ok(DiffScope::Unstaged));
        assert!("untracked".parse::<DiffScope>().is_err());
    }

    #[test]
    fn test_diff_scope_all_is_staged_then_unstaged() {
        assert_eq!(DiffScope::All.change_types(), &[ChangeType::Staged, ChangeType::Unstaged]);
        assert_eq!(DiffScope::Staged.change_types(), &[ChangeType::Staged]);
        assert_eq!(DiffScope::Unstaged.change_types(), &[ChangeType::Unstaged]);
    }
}
