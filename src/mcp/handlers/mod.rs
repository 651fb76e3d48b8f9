//! MCP tool handlers: tool definitions and dispatch.

mod git;
pub(crate) mod utils;

use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::info;

use crate::exec::CancelToken;
use crate::git::{GitSettings, RepoContext};
use crate::mcp::protocol::{ToolCallResult, ToolDefinition};
use crate::tools::ToolOutput;

/// Return all tool definitions for tools/list
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let repo_property = json!({
        "type": "string",
        "description": "Local repository directory. Defaults to the server's --dir."
    });

    vec![
        ToolDefinition {
            name: "get_changed_files".to_string(),
            description: "List every changed path in the working tree and index with its classification (modified, staged_added, untracked, renamed, ...), the raw porcelain code, the current branch and a short status summary.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "repo": repo_property.clone()
                }
            }),
        },
        ToolDefinition {
            name: "get_file_diff".to_string(),
            description: "Get the added and removed lines of one changed file, split into staged and unstaged sections (staged first). Added lines carry their line number in the new file. Untracked files are returned whole as added lines.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePath": {
                        "type": "string",
                        "description": "Path relative to the repository root, as listed by get_changed_files. Example: 'src/main.rs'"
                    },
                    "diffType": {
                        "type": "string",
                        "enum": ["all", "staged", "unstaged"],
                        "description": "Which changes to include (default: all)"
                    },
                    "repo": repo_property.clone()
                },
                "required": ["filePath"]
            }),
        },
        ToolDefinition {
            name: "get_commit_history".to_string(),
            description: "List the most recent commits (hash, author, email, ISO-8601 date, subject), newest first. With repoUrl, the remote repository is shallow-cloned into a temporary directory that is removed afterwards.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "repoUrl": {
                        "type": "string",
                        "description": "Clone URL of a remote repository. Omit to use the local repository."
                    },
                    "count": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of commits to return (default: 10)"
                    },
                    "branch": {
                        "type": "string",
                        "description": "Branch to list instead of the current one"
                    },
                    "repo": repo_property.clone()
                }
            }),
        },
    ]
}

/// Context for tool handlers: where to run git and how.
pub struct HandlerContext {
    /// Repository used when a call does not pass `repo`
    pub repo_root: PathBuf,
    pub settings: GitSettings,
    pub cancel: CancelToken,
}

impl HandlerContext {
    pub fn new(repo_root: impl Into<PathBuf>, settings: GitSettings, cancel: CancelToken) -> Self {
        Self { repo_root: repo_root.into(), settings, cancel }
    }

    /// Repository context for one call, honoring an optional `repo` override.
    pub(crate) fn repo_context(&self, repo: Option<&str>) -> RepoContext {
        let root = repo.map(PathBuf::from).unwrap_or_else(|| self.repo_root.clone());
        RepoContext::new(root, self.settings.clone(), self.cancel.clone())
    }
}

/// Dispatch a tool call to the right handler.
pub fn dispatch_tool(ctx: &HandlerContext, tool_name: &str, arguments: &Value) -> ToolCallResult {
    info!(tool = tool_name, "Tool call");
    let output = match tool_name {
        "get_changed_files" => git::handle_changed_files(ctx, arguments),
        "get_file_diff" => git::handle_file_diff(ctx, arguments),
        "get_commit_history" => git::handle_commit_history(ctx, arguments),
        _ => return ToolCallResult::error(format!("Unknown tool: {}", tool_name)),
    };
    to_call_result(output)
}

/// Wrap a tool envelope as MCP text content.
fn to_call_result(output: ToolOutput) -> ToolCallResult {
    let text = utils::json_to_string(&output.body);
    if output.is_error {
        ToolCallResult::error(text)
    } else {
        ToolCallResult::success(text)
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
