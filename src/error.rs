//! Unified error type for the git inspection tools.

use thiserror::Error;

/// All errors that can occur in git inspection operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// The working directory is not inside a git work tree
    #[error("Not inside a git repository: {path}")]
    NotARepository { path: String },

    /// git exited with a nonzero status
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The requested path has no entry in `git status`
    #[error("File {path} has no changes")]
    NoChanges { path: String },

    /// Reading an untracked file's content failed
    #[error("Failed to read untracked file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Shallow clone of a remote repository failed or timed out
    #[error("Failed to clone repository: {stderr}")]
    CloneFailed { stderr: String },

    /// Hunk header whose new-file start is not an integer.
    /// Recovered inside the diff parser; never returned by an operation.
    #[error("Malformed hunk header: '{0}'")]
    MalformedHunkHeader(String),

    /// The git executable could not be started
    #[error("Failed to execute {program}: {source}. Is git installed and in PATH?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A git invocation ran past its deadline and was killed
    #[error("git {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    /// The caller cancelled the operation; the child process was killed
    #[error("Operation cancelled")]
    Cancelled,

    /// Argument validation error
    #[error("{0}")]
    InvalidArgs(String),

    /// I/O error (temporary workspace creation, pipes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
