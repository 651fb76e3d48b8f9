//! Commit history, from the local repository or a shallow clone of a remote.

use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::types::{CommitHistory, CommitRecord};
use super::{RepoContext, current_branch, ensure_repository};
use crate::error::GitError;

pub const DEFAULT_COUNT: usize = 10;

/// Extra commits fetched by a shallow clone beyond the requested count.
const CLONE_DEPTH_MARGIN: usize = 5;

const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ae|%ad|%s";

const WORKSPACE_PREFIX: &str = "gitscope-clone-";

/// Parameters of a history query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRequest {
    pub count: usize,
    pub branch: Option<String>,
    /// Clone URL; the local repository is used when `None`
    pub remote: Option<String>,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self { count: DEFAULT_COUNT, branch: None, remote: None }
    }
}

impl HistoryRequest {
    /// Reject arguments git would read as options, before anything is spawned.
    pub fn validate(&self) -> Result<(), GitError> {
        if self.count == 0 {
            return Err(GitError::InvalidArgs("count must be at least 1".to_string()));
        }
        if let Some(branch) = &self.branch {
            if branch.is_empty() || branch.starts_with('-') {
                return Err(GitError::InvalidArgs(format!("Invalid branch name '{}'", branch)));
            }
        }
        if let Some(remote) = &self.remote {
            if remote.is_empty() || remote.starts_with('-') {
                return Err(GitError::InvalidArgs(format!("Invalid repository URL '{}'", remote)));
            }
            self.clone_depth()?;
        }
        Ok(())
    }

    /// `--depth` of the shallow clone: the requested count plus a margin.
    fn clone_depth(&self) -> Result<usize, GitError> {
        self.count
            .checked_add(CLONE_DEPTH_MARGIN)
            .ok_or_else(|| GitError::InvalidArgs(format!("count {} is too large for a clone", self.count)))
    }
}

/// Most recent commits, newest first, at most `request.count`.
pub fn get_history(ctx: &RepoContext, request: &HistoryRequest) -> Result<CommitHistory, GitError> {
    request.validate()?;
    match &request.remote {
        Some(remote) => remote_history(ctx, remote, request),
        None => local_history(ctx, request),
    }
}

fn remote_history(ctx: &RepoContext, remote: &str, request: &HistoryRequest) -> Result<CommitHistory, GitError> {
    let workspace = create_workspace(ctx)?;
    info!(remote, workspace = %workspace.path().display(), "Cloning for history");

    let result = clone_into(ctx, remote, request, workspace.path())
        .and_then(|()| local_history(&ctx.with_root(workspace.path()), request));

    let path = workspace.path().to_path_buf();
    if let Err(e) = workspace.close() {
        warn!(workspace = %path.display(), error = %e, "Failed to remove clone workspace");
    }
    result
}

fn create_workspace(ctx: &RepoContext) -> Result<TempDir, GitError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(WORKSPACE_PREFIX);
    let dir = match &ctx.settings.workspace_dir {
        Some(parent) => builder.tempdir_in(parent)?,
        None => builder.tempdir()?,
    };
    Ok(dir)
}

/// Shallow clone `remote` into `dest`. Any failure, including a timeout or
/// cancellation, is reported as `CloneFailed`.
fn clone_into(ctx: &RepoContext, remote: &str, request: &HistoryRequest, dest: &Path) -> Result<(), GitError> {
    let depth = request.clone_depth()?.to_string();
    let dest = dest.to_string_lossy().into_owned();

    let mut args = vec!["clone", "--quiet", "--depth", depth.as_str()];
    if let Some(branch) = &request.branch {
        args.extend(["--branch", branch.as_str()]);
    }
    args.extend(["--", remote, dest.as_str()]);

    let output = ctx
        .git_with_timeout(&args, ctx.settings.clone_timeout)
        .map_err(|e| GitError::CloneFailed { stderr: e.to_string() })?;

    if !output.success() {
        return Err(GitError::CloneFailed {
            stderr: output.stderr.trim().to_string(),
        });
    }
    debug!(remote, depth = %depth, "Clone finished");
    Ok(())
}

fn local_history(ctx: &RepoContext, request: &HistoryRequest) -> Result<CommitHistory, GitError> {
    ensure_repository(ctx)?;

    let limit = format!("-{}", request.count);
    let mut args = vec!["log", limit.as_str(), LOG_FORMAT, "--date=iso-strict"];
    if let Some(branch) = &request.branch {
        args.extend([branch.as_str(), "--"]);
    }

    let stdout = ctx.git_checked(&args)?;
    let mut commits = parse_log(&stdout);
    commits.truncate(request.count);

    let branch = current_branch(ctx)?;
    Ok(CommitHistory { branch, commits })
}

/// Parse `%H|%an|%ae|%ad|%s` lines. A `|` in the subject stays in the
/// message; short lines and lines without a hex hash are dropped.
pub fn parse_log(text: &str) -> Vec<CommitRecord> {
    text.lines().filter_map(parse_log_line).collect()
}

fn parse_log_line(line: &str) -> Option<CommitRecord> {
    let mut fields = line.splitn(5, '|');
    let hash = fields.next()?.trim();
    let author_name = fields.next()?;
    let author_email = fields.next()?;
    let date = fields.next()?;
    let message = fields.next()?;

    if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        debug!(line, "Skipping log line without a commit hash");
        return None;
    }

    Some(CommitRecord {
        hash: hash.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        date: date.to_string(),
        message: message.to_string(),
    })
}
