//! # gitscope — git working-tree, diff and history inspection
//!
//! Three stateless operations over the `git` CLI, each returning a normalized
//! structured result instead of raw text:
//!
//! - [`git::status::list_changed_files`] — porcelain status of every touched path
//! - [`git::file_diff::get_file_diff`] — staged/unstaged/untracked changes of one file
//! - [`git::history::get_history`] — recent commits, locally or from a shallow clone
//!
//! The operations are exposed as tools through [`tools`] (plain JSON envelopes),
//! the MCP stdio server in [`mcp`], and the `gitscope` CLI in [`cli`].

pub mod cli;
pub mod error;
pub mod exec;
pub mod git;
pub mod mcp;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::GitError;
pub use exec::CancelToken;
pub use git::{
    ChangeState, ChangeType, ChangedFiles, Classification, CommitHistory, CommitRecord,
    DiffHunkLine, DiffLineKind, DiffScope, DiffSection, FileDiff, FileStatus, GitSettings,
    RepoContext,
};

/// Read a file as a String, using lossy UTF-8 conversion for non-UTF8 files.
/// Returns `(content, was_lossy)` where `was_lossy` is true if replacement characters
/// were inserted.
pub fn read_file_lossy(path: &std::path::Path) -> std::io::Result<(String, bool)> {
    let raw = std::fs::read(path)?;
    match String::from_utf8(raw) {
        Ok(s) => Ok((s, false)),
        Err(e) => Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), true)),
    }
}

#[cfg(test)]
mod lib_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_file_lossy_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plain.txt");
        std::fs::write(&path, "héllo\n").unwrap();
        let (content, lossy) = read_file_lossy(&path).unwrap();
        assert_eq!(content, "héllo\n");
        assert!(!lossy);
    }

    #[test]
    fn test_read_file_lossy_windows_1252() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("smart_quotes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        // 0x93/0x94 are Windows-1252 smart quotes, invalid as UTF-8
        file.write_all(b"say \x93hi\x94\n").unwrap();
        drop(file);
        let (content, lossy) = read_file_lossy(&path).unwrap();
        assert!(lossy);
        assert!(content.starts_with("say "));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_file_lossy_missing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_file_lossy(&tmp.path().join("missing.txt")).is_err());
    }
}
