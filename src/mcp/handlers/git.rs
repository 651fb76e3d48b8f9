//! MCP handlers for the git tools.
//!
//! Thin layer: parse JSON arguments, call the tool functions, return the envelope.

use serde_json::Value;

use crate::git::DiffScope;
use crate::git::history::{DEFAULT_COUNT, HistoryRequest};
use crate::tools::{self, ToolOutput};

use super::HandlerContext;
use super::utils::{str_arg, u64_arg};

pub(crate) fn handle_changed_files(ctx: &HandlerContext, args: &Value) -> ToolOutput {
    let repo = ctx.repo_context(str_arg(args, &["repo"]));
    tools::changed_files(&repo)
}

pub(crate) fn handle_file_diff(ctx: &HandlerContext, args: &Value) -> ToolOutput {
    let path = match str_arg(args, &["filePath", "file_path"]) {
        Some(p) if !p.trim().is_empty() => p,
        _ => return ToolOutput::failure("Missing required parameter: filePath"),
    };
    let scope = match str_arg(args, &["diffType", "diff_type"]) {
        Some(raw) => match raw.parse::<DiffScope>() {
            Ok(scope) => scope,
            Err(e) => return ToolOutput::failure(&e),
        },
        None => DiffScope::All,
    };

    let repo = ctx.repo_context(str_arg(args, &["repo"]));
    tools::file_diff(&repo, path, scope)
}

pub(crate) fn handle_commit_history(ctx: &HandlerContext, args: &Value) -> ToolOutput {
    let count = match u64_arg(args, "count") {
        Ok(count) => count.map(|c| usize::try_from(c).unwrap_or(usize::MAX)).unwrap_or(DEFAULT_COUNT),
        Err(e) => return ToolOutput::failure(&e),
    };
    let request = HistoryRequest {
        count,
        branch: str_arg(args, &["branch"]).map(str::to_string),
        remote: str_arg(args, &["repoUrl", "repo_url"]).map(str::to_string),
    };

    let repo = ctx.repo_context(str_arg(args, &["repo"]));
    tools::commit_history(&repo, &request)
}
