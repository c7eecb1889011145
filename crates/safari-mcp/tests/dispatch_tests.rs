//! Dispatcher behaviour with a scripted command runner.
//!
//! No test here spawns a process: every invocation goes to a `FakeRunner`,
//! which records the rendered script for inspection.

use std::path::PathBuf;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use safari_mcp::handlers::{Dispatcher, NO_RETURN_VALUE};
use safari_mcp::{ServerConfig, ToolResult, get_tool_definitions};
use safari_test_utils::bookmarks::{
    folder, leaf, numbered_reading_items, reading_list, root,
};
use safari_test_utils::{FakeResponse, FakeRunner};
use serde_json::{Value, json};

fn dispatcher(runner: &Arc<FakeRunner>) -> Dispatcher {
    Dispatcher::new(runner.clone(), ServerConfig::default())
}

/// Smallest argument object each tool accepts
fn valid_arguments(tool: &str) -> Value {
    match tool {
        "safari_open_url" => json!({"url": "https://example.com"}),
        "safari_switch_tab" | "safari_close_tab" => json!({"tabIndex": 1}),
        "safari_execute_javascript" => json!({"script": "1 + 1"}),
        "safari_search_tabs" => json!({"query": "rust"}),
        _ => json!({}),
    }
}

fn text(result: &ToolResult) -> &str {
    assert_eq!(result.content.len(), 1, "envelope must hold exactly one item");
    result.first_text()
}

// ==========================================================================
// Envelope guarantees
// ==========================================================================

#[test]
fn test_every_tool_returns_single_item_envelope_for_empty_arguments() {
    let runner = Arc::new(FakeRunner::new());
    let dispatcher = dispatcher(&runner);

    for tool in get_tool_definitions() {
        for arguments in [json!({}), Value::Null] {
            let result = dispatcher.handle(&tool.name, arguments);
            assert_eq!(result.content.len(), 1, "tool {}", tool.name);
        }
    }
}

#[test]
fn test_every_tool_succeeds_with_valid_arguments() {
    let runner = Arc::new(FakeRunner::replying("ok"));
    let dispatcher = dispatcher(&runner);

    for tool in get_tool_definitions() {
        let result = dispatcher.handle(&tool.name, valid_arguments(&tool.name));
        assert!(!result.is_error(), "tool {} failed: {}", tool.name, result.first_text());
    }
    assert_eq!(runner.call_count(), 23);
}

#[test]
fn test_unknown_tool() {
    let runner = Arc::new(FakeRunner::new());
    let result = dispatcher(&runner).handle("__not_a_real_tool__", json!({}));

    assert!(result.is_error());
    assert_eq!(text(&result), "Unknown tool: __not_a_real_tool__");
    assert_eq!(runner.call_count(), 0, "no process for an unknown tool");
}

#[test]
fn test_process_failure_reported_for_every_tool() {
    let runner = Arc::new(FakeRunner::failing("Safari is not running"));
    let dispatcher = dispatcher(&runner);

    for tool in get_tool_definitions() {
        let result = dispatcher.handle(&tool.name, valid_arguments(&tool.name));
        assert!(result.is_error(), "tool {}", tool.name);
        assert_eq!(text(&result), "Error: Safari is not running", "tool {}", tool.name);
    }
}

#[test]
fn test_spawn_failure_reported() {
    let runner = Arc::new(FakeRunner::with_fallback(FakeResponse::SpawnError));
    let result = dispatcher(&runner).handle("safari_list_tabs", json!({}));

    assert!(result.is_error());
    assert!(text(&result).starts_with("Error: failed to run osascript"));
}

#[rstest]
#[case("safari_switch_tab", json!({}))]
#[case("safari_switch_tab", json!({"tabIndex": "two"}))]
#[case("safari_close_window", json!({"windowIndex": -1}))]
#[case("safari_open_url", json!({"newTab": false}))]
#[case("safari_execute_javascript", json!({"script": 42}))]
#[case("safari_get_reading_list", json!({"limit": "many"}))]
fn test_invalid_arguments_do_not_spawn(#[case] tool: &str, #[case] arguments: Value) {
    let runner = Arc::new(FakeRunner::new());
    let result = dispatcher(&runner).handle(tool, arguments);

    assert!(result.is_error());
    assert!(
        text(&result).starts_with(&format!("Error: invalid arguments for {tool}")),
        "{}",
        text(&result)
    );
    assert_eq!(runner.call_count(), 0);
}

// ==========================================================================
// Zero-argument and indexed tools
// ==========================================================================

#[test]
fn test_state_query_returns_stdout() {
    let runner = Arc::new(FakeRunner::replying(
        "Title: Rust\nURL: https://rust-lang.org\n",
    ));
    let result = dispatcher(&runner).handle("safari_get_current_tab", json!({}));

    assert_eq!(text(&result), "Title: Rust\nURL: https://rust-lang.org");
    let invocation = &runner.invocations()[0];
    assert_eq!(invocation.program, "osascript");
    assert_eq!(invocation.args[0], "-e");
}

#[test]
fn test_no_windows_sentinel_passes_through() {
    let runner = Arc::new(FakeRunner::replying("No windows open"));
    let result = dispatcher(&runner).handle("safari_list_tabs", json!({}));

    assert!(!result.is_error());
    assert_eq!(text(&result), "No windows open");
}

#[test]
fn test_indices_substituted_as_numbers() {
    let runner = Arc::new(FakeRunner::new());
    dispatcher(&runner).handle("safari_switch_tab", json!({"windowIndex": 2, "tabIndex": 3}));

    let script = runner.last_script().unwrap();
    assert!(script.contains("tell window 2"));
    assert!(script.contains("set current tab to tab 3"));
    assert!(script.contains(r#"return "Window 2 does not exist""#));
}

#[test]
fn test_window_index_defaults_to_front_window() {
    let runner = Arc::new(FakeRunner::new());
    dispatcher(&runner).handle("safari_close_tab", json!({"tabIndex": 4}));

    let script = runner.last_script().unwrap();
    assert!(script.contains("tell window 1"));
    assert!(script.contains("close tab 4"));
}

#[test]
fn test_out_of_range_message_from_script_is_not_an_error() {
    let runner = Arc::new(FakeRunner::replying("Window 9 does not exist"));
    let result = dispatcher(&runner).handle("safari_close_window", json!({"windowIndex": 9}));

    assert!(!result.is_error());
    assert_eq!(text(&result), "Window 9 does not exist");
}

// ==========================================================================
// URL-bearing tools
// ==========================================================================

#[test]
fn test_open_url_with_quotes() {
    let url = r#"https://example.com/?t="x""#;
    let runner = Arc::new(FakeRunner::new());
    let result = dispatcher(&runner).handle("safari_open_url", json!({"url": url}));

    assert!(!result.is_error());
    assert_eq!(text(&result), format!("Opened {url} in new tab"));

    let script = runner.last_script().unwrap();
    assert!(script.contains(r#"{URL:"https://example.com/?t=\"x\""}"#));
    assert!(!script.contains(r#"t="x""#));
}

#[rstest]
#[case(json!({}), "new tab")]
#[case(json!({"newTab": true}), "new tab")]
#[case(json!({"newTab": false}), "current tab")]
#[case(json!({"newWindow": true}), "new window")]
#[case(json!({"newTab": true, "newWindow": true}), "new window")]
#[case(json!({"newTab": false, "newWindow": true}), "new window")]
fn test_open_url_target(#[case] flags: Value, #[case] target: &str) {
    let mut arguments = flags;
    arguments["url"] = json!("https://example.com");

    let runner = Arc::new(FakeRunner::new());
    let result = dispatcher(&runner).handle("safari_open_url", arguments);

    assert_eq!(text(&result), format!("Opened https://example.com in {target}"));
}

#[test]
fn test_new_window_confirmation() {
    let runner = Arc::new(FakeRunner::new());
    let dispatcher = dispatcher(&runner);

    let with_url = dispatcher.handle("safari_new_window", json!({"url": "https://a.example"}));
    let without_url = dispatcher.handle("safari_new_window", json!({}));

    assert_eq!(text(&with_url), "Opened new window with https://a.example");
    assert_eq!(text(&without_url), "Opened new window");
}

// ==========================================================================
// JavaScript and search
// ==========================================================================

#[test]
fn test_execute_javascript_multiline_is_single_line_literal() {
    let source = "const s = \"a\\\\b\";\nconsole.log(s);\nreturn \"done\";";
    let runner = Arc::new(FakeRunner::replying("42"));
    let result = dispatcher(&runner).handle("safari_execute_javascript", json!({"script": source}));

    assert_eq!(text(&result), "42");

    let script = runner.last_script().unwrap();
    let js_line = script.lines().find(|l| l.contains("do JavaScript")).unwrap();
    assert!(js_line.contains(r#"const s = \"a\\\\b\";\nconsole.log(s);\nreturn \"done\";"#));
    // The source's own newlines must not split the statement
    assert_eq!(script.lines().filter(|l| l.contains("console.log")).count(), 1);
}

#[test]
fn test_execute_javascript_without_result() {
    let runner = Arc::new(FakeRunner::new());
    let result = dispatcher(&runner).handle("safari_execute_javascript", json!({"script": "void 0"}));

    assert!(!result.is_error());
    assert_eq!(text(&result), NO_RETURN_VALUE);
}

#[test]
fn test_search_tabs_lowercases_query() {
    let runner = Arc::new(FakeRunner::replying("Window 1, Tab 2: GitHub\n  https://github.com"));
    let result = dispatcher(&runner).handle("safari_search_tabs", json!({"query": "GitHub \"PR\""}));

    assert_eq!(text(&result), "Window 1, Tab 2: GitHub\n  https://github.com");
    let script = runner.last_script().unwrap();
    assert!(script.contains(r#"set needle to "github \"pr\"""#));
    assert!(script.contains("ignoring case"));
}

// ==========================================================================
// Bookmarks and Reading List
// ==========================================================================

fn bookmark_runner(tree: Value) -> Arc<FakeRunner> {
    Arc::new(FakeRunner::replying(&tree.to_string()))
}

#[test]
fn test_get_bookmarks_reads_plist_as_json() {
    let runner = bookmark_runner(root(vec![]));
    let config = ServerConfig {
        bookmarks_plist: PathBuf::from("/Users/test/Library/Safari/Bookmarks.plist"),
        ..ServerConfig::default()
    };
    Dispatcher::new(runner.clone(), config).handle("safari_get_bookmarks", json!({}));

    let invocation = &runner.invocations()[0];
    assert_eq!(invocation.program, "plutil");
    assert_eq!(
        invocation.args,
        vec!["-convert", "json", "-o", "-", "/Users/test/Library/Safari/Bookmarks.plist"]
    );
}

#[test]
fn test_get_bookmarks_for_folder() {
    let runner = bookmark_runner(root(vec![folder(
        "Favorites Bar",
        vec![leaf("Google", "https://google.com")],
    )]));
    let dispatcher = dispatcher(&runner);

    let found = dispatcher.handle("safari_get_bookmarks", json!({"folder": "Favorites Bar"}));
    assert!(!found.is_error());
    assert_eq!(text(&found).lines().count(), 1);
    assert!(text(&found).contains("Favorites Bar"));
    assert!(text(&found).contains("Google"));
    assert!(text(&found).contains("https://google.com"));

    let missing = dispatcher.handle("safari_get_bookmarks", json!({"folder": "Travel"}));
    assert!(!missing.is_error());
    assert_eq!(text(&missing), "No bookmarks found in folder 'Travel'");
}

#[test]
fn test_get_bookmarks_defaults_to_all_folders() {
    let runner = bookmark_runner(root(vec![
        folder("Favorites Bar", vec![leaf("Google", "https://google.com")]),
        folder("Work", vec![leaf("CI", "https://ci.example")]),
    ]));
    let result = dispatcher(&runner).handle("safari_get_bookmarks", json!({}));

    assert_eq!(
        text(&result),
        "[Favorites Bar] Google: https://google.com\n[Work] CI: https://ci.example"
    );
}

#[test]
fn test_get_reading_list_limit() {
    let runner = bookmark_runner(root(vec![reading_list(numbered_reading_items(5))]));
    let result = dispatcher(&runner).handle("safari_get_reading_list", json!({"limit": 2}));

    let output = text(&result);
    assert_eq!(output.matches("URL:").count(), 2);
    let first = output.find("Item 1").unwrap();
    let second = output.find("Item 2").unwrap();
    assert!(first < second);
    assert!(!output.contains("Item 3"));
}

#[test]
fn test_get_reading_list_default_limit_from_config() {
    let runner = bookmark_runner(root(vec![reading_list(numbered_reading_items(5))]));
    let config = ServerConfig {
        reading_list_limit: 3,
        ..ServerConfig::default()
    };
    let result = Dispatcher::new(runner.clone(), config).handle("safari_get_reading_list", json!({}));

    assert_eq!(text(&result).matches("URL:").count(), 3);
}

#[test]
fn test_get_reading_list_empty() {
    let runner = bookmark_runner(root(vec![reading_list(vec![])]));
    let result = dispatcher(&runner).handle("safari_get_reading_list", json!({}));

    assert!(!result.is_error());
    assert_eq!(text(&result), "Reading list is empty");
}

#[rstest]
#[case("safari_get_bookmarks")]
#[case("safari_get_reading_list")]
fn test_malformed_json_returned_verbatim(#[case] tool: &str) {
    let raw = "Bookmarks.plist: Property List error: Unexpected character";
    let runner = Arc::new(FakeRunner::replying(raw));
    let result = dispatcher(&runner).handle(tool, json!({}));

    assert!(!result.is_error());
    assert_eq!(result.is_error, None);
    assert_eq!(text(&result), raw);
}

#[test]
fn test_add_bookmark_confirms_initiation() {
    let runner = Arc::new(FakeRunner::new());
    let dispatcher = dispatcher(&runner);

    let current = dispatcher.handle("safari_add_bookmark", json!({}));
    assert_eq!(text(&current), "Bookmark dialog opened for current page");

    let with_url = dispatcher.handle("safari_add_bookmark", json!({"url": "https://a.example"}));
    assert_eq!(text(&with_url), "Bookmark dialog opened for https://a.example");
    assert!(runner.last_script().unwrap().contains("delay 1"));
}

#[test]
fn test_add_to_reading_list() {
    let runner = Arc::new(FakeRunner::new());
    let dispatcher = dispatcher(&runner);

    let added = dispatcher.handle(
        "safari_add_to_reading_list",
        json!({"url": "https://a.example/\"q\"", "title": "A"}),
    );
    assert_eq!(text(&added), "Added https://a.example/\"q\" to Reading List");
    assert!(runner
        .last_script()
        .unwrap()
        .contains(r#"add reading list item "https://a.example/\"q\"" with title "A""#));

    let current = dispatcher.handle("safari_add_to_reading_list", json!({}));
    assert_eq!(text(&current), "Add to Reading List initiated for current page");
}

#[test]
fn test_configured_interpreter_is_used() {
    let runner = Arc::new(FakeRunner::new());
    let config = ServerConfig {
        osascript: "/usr/bin/osascript".to_string(),
        ..ServerConfig::default()
    };
    Dispatcher::new(runner.clone(), config).handle("safari_reload", json!({}));

    assert_eq!(runner.invocations()[0].program, "/usr/bin/osascript");
}
