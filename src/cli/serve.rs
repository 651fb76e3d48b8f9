//! MCP server startup.

use tracing::{info, warn};

use crate::exec::CancelToken;
use crate::mcp;
use crate::mcp::handlers::HandlerContext;

use super::args::{GitArgs, ServeArgs};

pub fn cmd_serve(_args: ServeArgs, git: &GitArgs, cancel: CancelToken) -> Result<(), String> {
    let settings = git.settings();
    let repo_root = match std::fs::canonicalize(&git.dir) {
        Ok(path) => path,
        Err(e) => {
            warn!(dir = %git.dir.display(), error = %e, "Cannot resolve directory, using it as given");
            git.dir.clone()
        }
    };

    info!(
        dir = %repo_root.display(),
        git = %settings.program.display(),
        timeout_secs = settings.command_timeout.as_secs(),
        clone_timeout_secs = settings.clone_timeout.as_secs(),
        "Starting MCP server"
    );

    mcp::server::run_server(HandlerContext::new(repo_root, settings, cancel));
    Ok(())
}
