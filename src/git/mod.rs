//! Git inspection module: calls the `git` CLI and reshapes its output.
//!
//! Every operation takes an explicit [`RepoContext`] (working directory,
//! settings, cancellation) instead of relying on the process working
//! directory, so independent requests can run side by side.

pub mod diff;
pub mod file_diff;
pub mod history;
pub mod status;
pub mod types;

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::error::GitError;
use crate::exec::{self, CancelToken, ProcessOutput};

pub use types::{
    ChangeState, ChangeType, ChangedFiles, Classification, CommitHistory, CommitRecord,
    DiffHunkLine, DiffLineKind, DiffScope, DiffSection, FileDiff, FileStatus,
};

/// Branch name reported when it cannot be determined (detached HEAD, failure).
pub const UNKNOWN_BRANCH: &str = "unknown";

// ─── Settings ───────────────────────────────────────────────────────

/// How `git` is invoked. Built once from CLI flags and passed down.
#[derive(Clone, Debug)]
pub struct GitSettings {
    /// git executable
    pub program: PathBuf,
    /// Deadline for every local command
    pub command_timeout: Duration,
    /// Deadline for `git clone`
    pub clone_timeout: Duration,
    /// Time between SIGTERM and SIGKILL when a command has to be stopped
    pub kill_grace: Duration,
    /// Parent directory for temporary clone workspaces (system temp dir if None)
    pub workspace_dir: Option<PathBuf>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            command_timeout: Duration::from_secs(30),
            clone_timeout: Duration::from_secs(300),
            kill_grace: Duration::from_secs(2),
            workspace_dir: None,
        }
    }
}

// ─── Repository context ─────────────────────────────────────────────

/// Directory an operation runs against, plus how to run git there.
#[derive(Clone, Debug)]
pub struct RepoContext {
    pub root: PathBuf,
    pub settings: GitSettings,
    pub cancel: CancelToken,
}

impl RepoContext {
    pub fn new(root: impl Into<PathBuf>, settings: GitSettings, cancel: CancelToken) -> Self {
        Self { root: root.into(), settings, cancel }
    }

    /// Context with default settings and a fresh token.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(root, GitSettings::default(), CancelToken::new())
    }

    /// Same settings and token, different directory.
    pub fn with_root(&self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: self.settings.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run git in the context directory with the local command timeout.
    pub fn git(&self, args: &[&str]) -> Result<ProcessOutput, GitError> {
        self.git_with_timeout(args, self.settings.command_timeout)
    }

    pub fn git_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<ProcessOutput, GitError> {
        let label = command_label(args);
        debug!(repo = %self.root.display(), command = %label, args = ?args, "Running git");

        let mut cmd = Command::new(&self.settings.program);
        cmd.current_dir(&self.root)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0");

        exec::run(&mut cmd, &label, timeout, self.settings.kill_grace, &self.cancel)
    }

    /// Run git and return stdout, mapping a nonzero exit to `CommandFailed`.
    pub fn git_checked(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.git(args)?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: command_label(args),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Subcommand name for logs and errors, skipping leading `-c key=value` pairs.
fn command_label(args: &[&str]) -> String {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "-c" {
            iter.next();
            continue;
        }
        return arg.to_string();
    }
    String::new()
}

// ─── Shared queries ─────────────────────────────────────────────────

/// Fail with `NotARepository` unless the context directory is inside a work tree.
pub fn ensure_repository(ctx: &RepoContext) -> Result<(), GitError> {
    let not_a_repo = || GitError::NotARepository {
        path: ctx.root.display().to_string(),
    };

    if !ctx.root.is_dir() {
        return Err(not_a_repo());
    }

    let output = ctx.git(&["rev-parse", "--is-inside-work-tree"])?;
    if output.success() && output.stdout.trim() == "true" {
        Ok(())
    } else {
        debug!(repo = %ctx.root.display(), stderr = %output.stderr.trim(), "Not a work tree");
        Err(not_a_repo())
    }
}

/// Current branch name, or [`UNKNOWN_BRANCH`] when detached or unavailable.
/// Only cancellation is propagated.
pub fn current_branch(ctx: &RepoContext) -> Result<String, GitError> {
    match ctx.git(&["branch", "--show-current"]) {
        Ok(output) if output.success() => {
            let name = output.stdout.trim();
            if name.is_empty() {
                Ok(UNKNOWN_BRANCH.to_string())
            } else {
                Ok(name.to_string())
            }
        }
        Ok(_) => Ok(UNKNOWN_BRANCH.to_string()),
        Err(GitError::Cancelled) => Err(GitError::Cancelled),
        Err(e) => {
            debug!(error = %e, "Could not resolve current branch");
            Ok(UNKNOWN_BRANCH.to_string())
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
