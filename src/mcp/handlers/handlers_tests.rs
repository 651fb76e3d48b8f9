//! Tests for MCP tool handlers: definitions, argument parsing and dispatch.
//! Uses `#[path = "handlers_tests.rs"]` in mod.rs to include as the tests module.

use super::*;
use crate::test_support::ScratchRepo;

fn make_ctx(repo: &ScratchRepo) -> HandlerContext {
    HandlerContext::new(repo.path(), GitSettings::default(), CancelToken::new())
}

/// Parse the JSON text content of a tool result.
fn body(result: &ToolCallResult) -> Value {
    serde_json::from_str(&result.content[0].text).unwrap()
}

// ─── Definitions ────────────────────────────────────────────────────

#[test]
fn test_tool_definitions_names() {
    let tools = tool_definitions();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["get_changed_files", "get_file_diff", "get_commit_history"]);
}

#[test]
fn test_tool_definitions_have_schemas() {
    for tool in tool_definitions() {
        assert_eq!(tool.input_schema["type"], "object", "{} schema", tool.name);
        assert!(tool.input_schema["properties"]["repo"].is_object(), "{} lacks repo", tool.name);
        assert!(!tool.description.is_empty());
    }
}

#[test]
fn test_file_diff_requires_file_path() {
    let tools = tool_definitions();
    let diff = tools.iter().find(|t| t.name == "get_file_diff").unwrap();
    assert_eq!(diff.input_schema["required"], json!(["filePath"]));
}

// ─── Dispatch ───────────────────────────────────────────────────────

#[test]
fn test_dispatch_unknown_tool() {
    let repo = ScratchRepo::new();
    let result = dispatch_tool(&make_ctx(&repo), "search_grep", &json!({}));
    assert!(result.is_error);
    assert!(result.content[0].text.contains("Unknown tool"));
}

#[test]
fn test_dispatch_changed_files() {
    let repo = ScratchRepo::with_commits(1);
    repo.write("new.txt", "x\n");

    let result = dispatch_tool(&make_ctx(&repo), "get_changed_files", &json!({}));
    assert!(!result.is_error);
    let value = body(&result);
    assert_eq!(value["success"], true);
    assert_eq!(value["changedFilesCount"], 1);
    assert_eq!(value["changedFiles"][0]["path"], "new.txt");
}

#[test]
fn test_dispatch_repo_override() {
    let repo = ScratchRepo::with_commits(1);
    repo.write("other.txt", "x\n");
    let elsewhere = tempfile::tempdir().unwrap();
    let ctx = HandlerContext::new(elsewhere.path(), GitSettings::default(), CancelToken::new());

    let without = dispatch_tool(&ctx, "get_changed_files", &json!({}));
    assert!(without.is_error);

    let repo_dir = repo.path().to_string_lossy().to_string();
    let with = dispatch_tool(&ctx, "get_changed_files", &json!({ "repo": repo_dir }));
    assert!(!with.is_error);
    assert_eq!(body(&with)["changedFilesCount"], 1);
}

#[test]
fn test_dispatch_file_diff_camel_and_snake_case() {
    let repo = ScratchRepo::with_commits(1);
    repo.write("file1.txt", "content 1\nadded\n");
    repo.git(&["add", "file1.txt"]);
    let ctx = make_ctx(&repo);

    let camel = body(&dispatch_tool(&ctx, "get_file_diff", &json!({ "filePath": "file1.txt", "diffType": "staged" })));
    let snake = body(&dispatch_tool(&ctx, "get_file_diff", &json!({ "file_path": "file1.txt", "diff_type": "staged" })));
    assert_eq!(camel, snake);
    assert_eq!(camel["fileStatus"], "staged_modified");
    assert_eq!(camel["detailedChanges"][0]["changeType"], "staged");
    assert_eq!(camel["detailedChanges"][0]["added"][0]["lineNumber"], 2);
}

#[test]
fn test_dispatch_file_diff_missing_path() {
    let repo = ScratchRepo::new();
    let result = dispatch_tool(&make_ctx(&repo), "get_file_diff", &json!({}));
    assert!(result.is_error);
    let value = body(&result);
    assert_eq!(value["success"], false);
    assert!(value["error"].as_str().unwrap().contains("filePath"));
}

#[test]
fn test_dispatch_file_diff_bad_type() {
    let repo = ScratchRepo::new();
    let args = json!({ "filePath": "a.txt", "diffType": "everything" });
    let result = dispatch_tool(&make_ctx(&repo), "get_file_diff", &args);
    assert!(result.is_error);
    assert!(body(&result)["error"].as_str().unwrap().contains("Invalid diff type"));
}

#[test]
fn test_dispatch_commit_history_default_count() {
    let repo = ScratchRepo::with_commits(12);
    let result = dispatch_tool(&make_ctx(&repo), "get_commit_history", &json!({}));
    assert!(!result.is_error);
    let value = body(&result);
    assert_eq!(value["commitCount"], 10);
    assert_eq!(value["branch"], "main");
}

#[test]
fn test_dispatch_commit_history_count_and_invalid() {
    let repo = ScratchRepo::with_commits(3);
    let ctx = make_ctx(&repo);

    let value = body(&dispatch_tool(&ctx, "get_commit_history", &json!({ "count": 2 })));
    assert_eq!(value["commitCount"], 2);

    let zero = dispatch_tool(&ctx, "get_commit_history", &json!({ "count": 0 }));
    assert!(zero.is_error);

    let bad = dispatch_tool(&ctx, "get_commit_history", &json!({ "count": "many" }));
    assert!(bad.is_error);
}

#[test]
fn test_dispatch_commit_history_remote_alias() {
    let origin = ScratchRepo::with_commits(2);
    let workspaces = tempfile::tempdir().unwrap();
    let settings = GitSettings {
        workspace_dir: Some(workspaces.path().to_path_buf()),
        ..GitSettings::default()
    };
    let ctx = HandlerContext::new(workspaces.path(), settings, CancelToken::new());

    let result = dispatch_tool(&ctx, "get_commit_history", &json!({ "repo_url": origin.url(), "count": 1 }));
    assert!(!result.is_error, "{}", result.content[0].text);
    assert_eq!(body(&result)["commits"][0]["message"], "Commit number 2");
    assert!(std::fs::read_dir(workspaces.path()).unwrap().next().is_none());
}

#[test]
fn test_dispatch_commit_history_huge_remote_count() {
    let origin = ScratchRepo::with_commits(1);
    let workspaces = tempfile::tempdir().unwrap();
    let settings = GitSettings {
        workspace_dir: Some(workspaces.path().to_path_buf()),
        ..GitSettings::default()
    };
    let ctx = HandlerContext::new(workspaces.path(), settings, CancelToken::new());

    let result = dispatch_tool(&ctx, "get_commit_history", &json!({ "repoUrl": origin.url(), "count": u64::MAX }));
    assert!(result.is_error);
    let value = body(&result);
    assert_eq!(value["success"], false);
    assert!(value["error"].as_str().unwrap().contains("too large"), "{}", value);
}
