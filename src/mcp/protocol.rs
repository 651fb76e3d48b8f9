//! JSON-RPC 2.0 and MCP message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-03-26";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;

// ─── JSON-RPC 2.0 ───────────────────────────────────────────────────

/// Incoming request. A missing `id` makes it a notification.
#[derive(Deserialize, Debug)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Serialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub result: Value,
}

#[derive(Serialize, Debug)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: JsonRpcError,
}

#[derive(Serialize, Debug)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn new(id: Value, result: Value) -> Self {
        Self { jsonrpc: JSONRPC_VERSION, id, result }
    }
}

impl JsonRpcErrorResponse {
    pub fn new(id: Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: JsonRpcError { code, message },
        }
    }
}

// ─── initialize ─────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: Value,
    pub server_info: ServerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'static str>,
}

#[derive(Serialize, Debug)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

const INSTRUCTIONS: &str = concat!(
    "gitscope MCP server: structured git status, diff and history.\n",
    "\n",
    "1. Start with get_changed_files to see which paths are touched and how they are classified ",
    "('modified', 'staged_added', 'untracked', 'renamed', ...).\n",
    "2. get_file_diff takes a path exactly as listed by get_changed_files. diffType='staged' or ",
    "'unstaged' narrows the result; 'all' returns staged changes before unstaged ones. Untracked files ",
    "come back whole, as added lines numbered from 1.\n",
    "3. Line numbers refer to the new version of the file. Removed lines carry no lineNumber.\n",
    "4. get_commit_history lists recent commits (subject line only). With repoUrl the remote is ",
    "shallow-cloned into a temporary directory; keep count small.\n",
    "5. Every tool answers with JSON: success=true, or success=false plus an error message.\n",
);

impl InitializeResult {
    pub fn new() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: serde_json::json!({ "tools": { "listChanged": false } }),
            server_info: ServerInfo {
                name: "gitscope",
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: Some(INSTRUCTIONS),
        }
    }
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self::new()
    }
}

// ─── tools ──────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result of `tools/call`: a single text block, flagged when the tool failed.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Serialize, Debug)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ToolCallResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent { kind: "text", text }],
            is_error,
        }
    }

    pub fn success(text: String) -> Self {
        Self::text(text, false)
    }

    pub fn error(text: String) -> Self {
        Self::text(text, true)
    }
}
