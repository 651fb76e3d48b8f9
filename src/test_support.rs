//! Scratch git repositories for tests. Requires `git` in PATH.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::git::RepoContext;

/// A throwaway repository with a fixed identity and no user/system config.
pub struct ScratchRepo {
    dir: TempDir,
}

impl ScratchRepo {
    /// Empty repository on branch `main`.
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("gitscope-test-")
            .tempdir()
            .expect("create scratch dir");
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Repository with `n` commits, each adding `file<i>.txt`.
    pub fn with_commits(n: usize) -> Self {
        let repo = Self::new();
        for i in 1..=n {
            repo.write(&format!("file{}.txt", i), &format!("content {}\n", i));
            repo.git(&["add", "."]);
            repo.commit(&format!("Commit number {}", i));
        }
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn ctx(&self) -> RepoContext {
        RepoContext::local(self.path())
    }

    /// `file://` URL usable as a clone remote.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn commit(&self, message: &str) {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
    }

    /// Run git in the repository, panicking on failure. Returns stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Test Author")
            .env("GIT_AUTHOR_EMAIL", "author@example.com")
            .env("GIT_COMMITTER_NAME", "Test Author")
            .env("GIT_COMMITTER_EMAIL", "author@example.com")
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
