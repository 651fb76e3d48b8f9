//! Tool-level entry points: run an operation and wrap the result in the
//! `{ "success": ... }` JSON envelope shared by the MCP server and `--json`.
//!
//! Nothing here returns an error; failures become `{success: false, error}`.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::error::GitError;
use crate::git::file_diff::get_file_diff;
use crate::git::history::{HistoryRequest, get_history};
use crate::git::status::list_changed_files;
use crate::git::types::{Classification, CommitRecord, DiffScope, DiffSection, FileStatus};
use crate::git::RepoContext;

// ─── Envelopes ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFilesResponse {
    pub success: bool,
    pub branch: String,
    pub repo_summary: String,
    pub changed_files_count: usize,
    pub changed_files: Vec<FileStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffResponse {
    pub success: bool,
    pub filename: String,
    pub file_status: Classification,
    pub detailed_changes: Vec<DiffSection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHistoryResponse {
    pub success: bool,
    pub branch: String,
    pub commit_count: usize,
    pub commits: Vec<CommitRecord>,
}

/// Envelope plus whether it reports a failure.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub body: Value,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok<T: Serialize>(response: &T) -> Self {
        match serde_json::to_value(response) {
            Ok(body) => Self { body, is_error: false },
            Err(e) => Self::failure(&format!("Failed to serialize response: {}", e)),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            body: json!({ "success": false, "error": message }),
            is_error: true,
        }
    }

    fn from_error(tool: &str, err: &GitError) -> Self {
        warn!(tool, error = %err, "Tool failed");
        Self::failure(&err.to_string())
    }
}

// ─── Operations ─────────────────────────────────────────────────────

/// `get_changed_files`
pub fn changed_files(ctx: &RepoContext) -> ToolOutput {
    match list_changed_files(ctx) {
        Ok(changed) => ToolOutput::ok(&ChangedFilesResponse {
            success: true,
            branch: changed.branch,
            repo_summary: changed.repo_summary,
            changed_files_count: changed.files.len(),
            changed_files: changed.files,
        }),
        Err(e) => ToolOutput::from_error("get_changed_files", &e),
    }
}

/// `get_file_diff`
pub fn file_diff(ctx: &RepoContext, path: &str, scope: DiffScope) -> ToolOutput {
    match get_file_diff(ctx, path, scope) {
        Ok(diff) => ToolOutput::ok(&FileDiffResponse {
            success: true,
            filename: diff.path,
            file_status: diff.status,
            detailed_changes: diff.sections,
        }),
        Err(e) => ToolOutput::from_error("get_file_diff", &e),
    }
}

/// `get_commit_history`
pub fn commit_history(ctx: &RepoContext, request: &HistoryRequest) -> ToolOutput {
    match get_history(ctx, request) {
        Ok(history) => ToolOutput::ok(&CommitHistoryResponse {
            success: true,
            branch: history.branch,
            commit_count: history.commits.len(),
            commits: history.commits,
        }),
        Err(e) => ToolOutput::from_error("get_commit_history", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScratchRepo;

    #[test]
    fn test_changed_files_envelope() {
        let repo = ScratchRepo::with_commits(1);
        repo.write("file1.txt", "edited\n");
        repo.write("extra.txt", "x\n");

        let out = changed_files(&repo.ctx());
        assert!(!out.is_error);
        assert_eq!(out.body["success"], true);
        assert_eq!(out.body["branch"], "main");
        assert_eq!(out.body["changedFilesCount"], 2);
        let files = out.body["changedFiles"].as_array().unwrap();
        assert!(files.iter().any(|f| f["path"] == "extra.txt" && f["classification"] == "untracked"));
        assert!(files.iter().any(|f| f["path"] == "file1.txt" && f["code"] == " M"));
    }

    #[test]
    fn test_file_diff_envelope() {
        let repo = ScratchRepo::with_commits(1);
        repo.write("file1.txt", "content 1\nmore\n");

        let out = file_diff(&repo.ctx(), "file1.txt", DiffScope::All);
        assert!(!out.is_error);
        assert_eq!(out.body["filename"], "file1.txt");
        assert_eq!(out.body["fileStatus"], "modified");
        let section = &out.body["detailedChanges"][0];
        assert_eq!(section["changeType"], "unstaged");
        assert_eq!(section["added"][0], json!({ "kind": "added", "content": "more", "lineNumber": 2 }));
        assert!(section["removed"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_commit_history_envelope() {
        let repo = ScratchRepo::with_commits(3);
        let out = commit_history(&repo.ctx(), &HistoryRequest { count: 2, ..Default::default() });
        assert!(!out.is_error);
        assert_eq!(out.body["commitCount"], 2);
        assert_eq!(out.body["commits"][0]["message"], "Commit number 3");
        assert!(out.body["commits"][0]["authorName"].is_string());
    }

    #[test]
    fn test_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let out = changed_files(&RepoContext::local(dir.path()));
        assert!(out.is_error);
        assert_eq!(out.body["success"], false);
        assert!(out.body["error"].as_str().unwrap().contains("Not inside a git repository"));
    }

    #[test]
    fn test_no_changes_envelope() {
        let repo = ScratchRepo::with_commits(1);
        let out = file_diff(&repo.ctx(), "file1.txt", DiffScope::All);
        assert!(out.is_error);
        assert_eq!(out.body["error"], "File file1.txt has no changes");
    }
}
