use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::mcp::handlers::{self, HandlerContext};
use crate::mcp::protocol::*;

/// Run the MCP server event loop over stdio
pub fn run_server(ctx: HandlerContext) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    info!(repo = %ctx.repo_root.display(), "MCP server ready, waiting for JSON-RPC requests on stdin");
    serve(&ctx, stdin.lock(), stdout.lock());
    info!("Shutting down");
}

/// Read one request per line from `reader`, write one response per line to `writer`.
/// Returns when input ends or the context's cancel token trips.
pub fn serve<R: BufRead, W: Write>(ctx: &HandlerContext, reader: R, mut writer: W) {
    for line in reader.lines() {
        if ctx.cancel.is_cancelled() {
            info!("Cancelled, stopping request loop");
            break;
        }

        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "Error reading stdin");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(request = %line, "Incoming JSON-RPC");

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Failed to parse JSON-RPC request");
                let err = JsonRpcErrorResponse::new(Value::Null, PARSE_ERROR, format!("Parse error: {}", e));
                write_message(&mut writer, &to_value(&err));
                continue;
            }
        };

        // Notifications have no id, don't send a response
        let Some(id) = request.id else {
            debug!(method = %request.method, "Received notification");
            continue;
        };

        let response = handle_request(ctx, &request.method, &request.params, id);
        write_message(&mut writer, &response);
    }
}

fn write_message<W: Write>(writer: &mut W, message: &Value) {
    let text = message.to_string();
    debug!(response = %text, "Outgoing JSON-RPC");
    if let Err(e) = writeln!(writer, "{}", text).and_then(|()| writer.flush()) {
        error!(error = %e, "Failed to write response");
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize message");
        Value::Null
    })
}

fn respond<T: Serialize>(id: Value, result: &T) -> Value {
    to_value(&JsonRpcResponse::new(id, to_value(result)))
}

fn handle_request(ctx: &HandlerContext, method: &str, params: &Option<Value>, id: Value) -> Value {
    match method {
        "initialize" => respond(id, &InitializeResult::new()),
        "tools/list" => respond(id, &ToolsListResult { tools: handlers::tool_definitions() }),
        "tools/call" => {
            let Some(params) = params else {
                return respond(id, &ToolCallResult::error("Missing params".to_string()));
            };

            let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or(Value::Object(serde_json::Map::new()));

            respond(id, &handlers::dispatch_tool(ctx, tool_name, &arguments))
        }
        "ping" => respond(id, &json!({})),
        _ => to_value(&JsonRpcErrorResponse::new(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )),
    }
}
