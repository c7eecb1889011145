//! End-to-end tests for the `safari-mcp` binary over stdio.
//!
//! Only messages that never reach Safari are sent, so these run on any
//! platform.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn server_cmd() -> Command {
    Command::cargo_bin("safari-mcp").expect("Failed to find safari-mcp binary")
}

fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect()
}

const HANDSHAKE: &str = concat!(
    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"stdio-test","version":"1.0"}}}"#,
    "\n",
    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    "\n",
);

#[test]
fn test_handshake_and_tools_list() {
    let input = format!(
        "{HANDSHAKE}{}\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#
    );

    let output = server_cmd().write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let replies = responses(&output.stdout);
    assert_eq!(replies.len(), 2, "the notification gets no reply");
    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "safari-mcp");
    assert_eq!(replies[1]["id"], 2);
    assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 23);
}

#[test]
fn test_unknown_tool_over_stdio() {
    let input = format!(
        "{HANDSHAKE}{}\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"__not_a_real_tool__","arguments":{}}}"#
    );

    let output = server_cmd().write_stdin(input).output().unwrap();
    let replies = responses(&output.stdout);

    let reply = replies.last().unwrap();
    assert_eq!(reply["id"], 3);
    assert_eq!(reply["result"]["isError"], true);
    assert_eq!(
        reply["result"]["content"][0]["text"],
        "Unknown tool: __not_a_real_tool__"
    );
}

#[test]
fn test_bad_line_does_not_end_session() {
    let input = concat!(
        "this is not json\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#,
        "\n",
    );

    let output = server_cmd().write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let replies = responses(&output.stdout);
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[1]["id"], 4);
}

#[test]
fn test_invalid_utf8_line_does_not_end_session() {
    let mut input = b"\xff\xfe not utf-8\n".to_vec();
    input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
    input.push(b'\n');

    let output = server_cmd().write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let replies = responses(&output.stdout);
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert!(replies[0]["id"].is_null());
    assert_eq!(replies[1]["id"], 1);
    assert_eq!(replies[1]["result"], serde_json::json!({}));
}

#[test]
fn test_logs_stay_off_stdout() {
    server_cmd()
        .env("RUST_LOG", "safari_mcp=debug")
        .write_stdin(HANDSHAKE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting safari-mcp").not())
        .stderr(predicate::str::contains("Starting safari-mcp"));
}

#[test]
fn test_config_file_is_applied() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("safari-mcp.toml");
    fs::write(&config, "plutil = \"/nonexistent/plutil\"\n").unwrap();

    let input = format!(
        "{HANDSHAKE}{}\n",
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"safari_get_bookmarks","arguments":{}}}"#
    );

    let output = server_cmd()
        .arg("--config")
        .arg(&config)
        .write_stdin(input)
        .output()
        .unwrap();
    let replies = responses(&output.stdout);

    let reply = replies.last().unwrap();
    assert_eq!(reply["result"]["isError"], true);
    let text = reply["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error: failed to run /nonexistent/plutil"), "{text}");
}

#[test]
fn test_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();

    server_cmd()
        .env("SAFARI_MCP_CONFIG", temp.path().join("absent.toml"))
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn test_unknown_config_key_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("safari-mcp.toml");
    fs::write(&config, "timeout_secs = 5\n").unwrap();

    server_cmd()
        .arg("-c")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure();
}
