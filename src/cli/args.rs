//! CLI argument structs for all subcommands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};

use crate::git::{DiffScope, GitSettings};
use crate::git::history::DEFAULT_COUNT;

/// Options shared by every subcommand: where the repository is and how git runs.
#[derive(Args, Debug, Clone)]
pub struct GitArgs {
    /// Repository directory
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// git executable to run
    #[arg(long, global = true, default_value = "git")]
    pub git: PathBuf,

    /// Timeout in seconds for each local git command
    #[arg(long, global = true, default_value = "30")]
    pub timeout_secs: u64,

    /// Timeout in seconds for cloning a remote repository
    #[arg(long, global = true, default_value = "300")]
    pub clone_timeout_secs: u64,

    /// Grace period in ms between SIGTERM and SIGKILL for a git process that has to be stopped
    #[arg(long, global = true, default_value = "2000")]
    pub grace_ms: u64,

    /// Parent directory for temporary clone workspaces (default: system temp dir)
    #[arg(long, global = true)]
    pub workspace_dir: Option<PathBuf>,
}

impl GitArgs {
    pub fn settings(&self) -> GitSettings {
        GitSettings {
            program: self.git.clone(),
            command_timeout: Duration::from_secs(self.timeout_secs),
            clone_timeout: Duration::from_secs(self.clone_timeout_secs),
            kill_grace: Duration::from_millis(self.grace_ms),
            workspace_dir: self.workspace_dir.clone(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging and output format.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Log level for stderr output (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print the JSON tool response instead of the human-readable view
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTypeArg {
    All,
    Staged,
    Unstaged,
}

impl From<DiffTypeArg> for DiffScope {
    fn from(arg: DiffTypeArg) -> Self {
        match arg {
            DiffTypeArg::All => DiffScope::All,
            DiffTypeArg::Staged => DiffScope::Staged,
            DiffTypeArg::Unstaged => DiffScope::Unstaged,
        }
    }
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"EXAMPLES:
  gitscope diff src/main.rs                  Staged and unstaged changes
  gitscope diff src/main.rs --type staged    Only what is in the index
  gitscope diff notes.txt                    Untracked file, every line as added
  gitscope -d ../other diff README.md --json"#)]
pub struct DiffArgs {
    /// File path relative to the repository root
    pub file: String,

    /// Which changes to show
    #[arg(short = 't', long = "type", value_enum, default_value_t = DiffTypeArg::All)]
    pub diff_type: DiffTypeArg,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"EXAMPLES:
  gitscope history                                     Last 10 commits of the current branch
  gitscope history -n 3 --branch develop               Last 3 commits of develop
  gitscope history --repo https://github.com/o/r.git   Shallow-clones into a temp dir, removed afterwards"#)]
pub struct HistoryArgs {
    /// Remote repository URL to clone instead of using the local repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Number of commits to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Branch to list instead of the current one
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Parser, Debug)]
#[command(after_long_help = r#"Speaks JSON-RPC 2.0 over stdio: one request per line on stdin, one response
per line on stdout, logs on stderr. Tools: get_changed_files, get_file_diff,
get_commit_history.

EXAMPLE (MCP client configuration):
  { "command": "gitscope", "args": ["serve", "--dir", "/path/to/repo", "--log-level", "info"] }"#)]
pub struct ServeArgs {}
