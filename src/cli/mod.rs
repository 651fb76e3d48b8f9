//! CLI layer: argument parsing, logging setup and command dispatch.

pub mod args;
mod render;
mod serve;

pub use args::*;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::exec::CancelToken;
use crate::git::RepoContext;
use crate::git::file_diff::get_file_diff;
use crate::git::history::{HistoryRequest, get_history};
use crate::git::status::list_changed_files;
use crate::tools::{self, ToolOutput};

// ─── CLI ─────────────────────────────────────────────────────────────

/// Structured git status, per-file diffs and commit history
#[derive(Parser, Debug)]
#[command(
    name = "gitscope",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATETIME"), ")"),
    about,
    after_help = "\
Run 'gitscope <COMMAND> --help' for detailed options and examples.\n\
Common options: -d <DIR> (repository), --json (machine-readable output)"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub git: GitArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// List changed files in the working tree and index
    Status,

    /// Show the staged, unstaged or untracked changes of one file
    Diff(DiffArgs),

    /// List recent commits, locally or from a remote repository
    History(HistoryArgs),

    /// Start MCP (Model Context Protocol) server over stdio.
    Serve(ServeArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.output);

    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel);

    let result = match cli.command {
        Commands::Status => cmd_status(&cli.git, &cli.output, cancel),
        Commands::Diff(args) => cmd_diff(args, &cli.git, &cli.output, cancel),
        Commands::History(args) => cmd_history(args, &cli.git, &cli.output, cancel),
        Commands::Serve(args) => serve::cmd_serve(args, &cli.git, cancel),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout is reserved for results and JSON-RPC.
fn init_logging(output: &OutputArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&output.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match output.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// First Ctrl-C stops the running git process; a second one exits.
fn install_interrupt_handler(cancel: &CancelToken) {
    let token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        if token.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("Interrupted, stopping git (press Ctrl-C again to exit)");
        token.cancel();
    });
    if let Err(e) = installed {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }
}

// ─── Commands ───────────────────────────────────────────────────────

fn repo_context(git: &GitArgs, cancel: CancelToken) -> RepoContext {
    RepoContext::new(git.dir.clone(), git.settings(), cancel)
}

fn cmd_status(git: &GitArgs, output: &OutputArgs, cancel: CancelToken) -> Result<(), String> {
    let ctx = repo_context(git, cancel);
    if output.json {
        return print_json(tools::changed_files(&ctx));
    }
    let changed = list_changed_files(&ctx).map_err(|e| e.to_string())?;
    print!("{}", render::render_changed_files(&changed));
    Ok(())
}

fn cmd_diff(args: DiffArgs, git: &GitArgs, output: &OutputArgs, cancel: CancelToken) -> Result<(), String> {
    let ctx = repo_context(git, cancel);
    let scope = args.diff_type.into();
    if output.json {
        return print_json(tools::file_diff(&ctx, &args.file, scope));
    }
    let diff = get_file_diff(&ctx, &args.file, scope).map_err(|e| e.to_string())?;
    print!("{}", render::render_file_diff(&diff));
    Ok(())
}

fn cmd_history(args: HistoryArgs, git: &GitArgs, output: &OutputArgs, cancel: CancelToken) -> Result<(), String> {
    let ctx = repo_context(git, cancel);
    let request = HistoryRequest {
        count: args.count,
        branch: args.branch,
        remote: args.repo,
    };
    debug!(?request, "History request");
    if output.json {
        return print_json(tools::commit_history(&ctx, &request));
    }
    let history = get_history(&ctx, &request).map_err(|e| e.to_string())?;
    print!("{}", render::render_history(&history));
    Ok(())
}

/// Print a tool envelope on stdout; a failure envelope also fails the command.
fn print_json(output: ToolOutput) -> Result<(), String> {
    println!("{}", crate::mcp::handlers::utils::json_to_string(&output.body));
    if output.is_error {
        let message = output.body["error"].as_str().unwrap_or("operation failed");
        return Err(message.to_string());
    }
    Ok(())
}
