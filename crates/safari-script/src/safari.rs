//! Safari script renderers
//!
//! One function per browser operation. Each returns a [`Script`] ready to be
//! passed to `osascript`; none of them run anything.
//!
//! Window and tab indices are 1-based and substituted as numeric literals.
//! Range checks happen inside the generated script, which answers with a
//! "does not exist" message instead of letting AppleScript raise.
//!
//! Action scripts end with `return ""` so `osascript` does not print the
//! value of their last statement (usually an object reference); the caller
//! composes its own confirmation for an empty result.

use crate::builder::Script;
use crate::literal::Literal;

pub const SAFARI: &str = "Safari";
pub const SYSTEM_EVENTS: &str = "System Events";

/// Returned by scripts that need a window when Safari has none
pub const NO_WINDOWS: &str = "No windows open";

pub const NO_SELECTION: &str = "No text selected";

const CURRENT_TAB: &str = "current tab of front window";

/// Where `open_url` loads the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    NewTab,
    CurrentTab,
    NewWindow,
}

impl OpenTarget {
    /// `new_window` wins over `new_tab` when both are set
    pub fn from_flags(new_tab: bool, new_window: bool) -> Self {
        if new_window {
            OpenTarget::NewWindow
        } else if new_tab {
            OpenTarget::NewTab
        } else {
            OpenTarget::CurrentTab
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            OpenTarget::NewTab => "new tab",
            OpenTarget::CurrentTab => "current tab",
            OpenTarget::NewWindow => "new window",
        }
    }
}

fn safari(body: impl FnOnce(Script) -> Script) -> Script {
    Script::new().tell_application(SAFARI, body)
}

fn do_javascript(source: &str) -> String {
    format!("do JavaScript {} in {CURRENT_TAB}", Literal::new(source))
}

/// Launch Safari, making sure it has a window
pub fn open() -> Script {
    safari(|s| {
        s.line("launch")
            .if_then("(count of windows) is 0", |s| s.line("make new document"))
            .return_text("Safari opened")
    })
}

/// Bring Safari to the front
pub fn activate() -> Script {
    safari(|s| s.line("activate").return_text("Safari activated"))
}

pub fn current_tab() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("set t to {CURRENT_TAB}"))
            .line(r#"return "Title: " & (name of t as text) & linefeed & "URL: " & (URL of t as text)"#)
    })
}

/// Every tab of every window, the current tab of each window marked with `*`
pub fn list_tabs() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(r#"set output to """#)
            .line("set winNum to 1")
            .repeat_with("w", "windows", |s| {
                s.line(r#"set output to output & "Window " & winNum & ":" & linefeed"#)
                    .line("set tabNum to 1")
                    .repeat_with("t", "tabs of w", |s| {
                        s.line(r#"set marker to """#)
                            .if_then("t is current tab of w", |s| s.line(r#"set marker to " *""#))
                            .line(r#"set output to output & "  " & tabNum & ". " & (name of t as text) & marker & linefeed"#)
                            .line(r#"set output to output & "     " & (URL of t as text) & linefeed"#)
                            .line("set tabNum to tabNum + 1")
                    })
                    .line("set winNum to winNum + 1")
            })
            .line("return output")
    })
}

pub fn list_windows() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(r#"set output to """#)
            .line("set winNum to 1")
            .repeat_with("w", "windows", |s| {
                s.line(r#"set output to output & "Window " & winNum & ": " & (name of w as text) & " (" & (count of tabs of w) & " tabs)" & linefeed"#)
                    .line("set winNum to winNum + 1")
            })
            .line("return output")
    })
}

pub fn open_url(url: &str, target: OpenTarget) -> Script {
    let url = Literal::new(url);
    let new_document = format!("make new document with properties {{URL:{url}}}");

    safari(|s| {
        let s = s.line("activate");
        let s = match target {
            OpenTarget::NewWindow => s.line(&new_document),
            OpenTarget::NewTab => s.if_else(
                "(count of windows) is 0",
                |s| s.line(&new_document),
                |s| {
                    s.tell("front window", |s| {
                        s.line(format!(
                            "set current tab to (make new tab with properties {{URL:{url}}})"
                        ))
                    })
                },
            ),
            OpenTarget::CurrentTab => s.if_else(
                "(count of windows) is 0",
                |s| s.line(&new_document),
                |s| s.line(format!("set URL of {CURRENT_TAB} to {url}")),
            ),
        };
        s.return_text("")
    })
}

pub fn new_window(url: Option<&str>) -> Script {
    let statement = match url {
        Some(url) => format!("make new document with properties {{URL:{}}}", Literal::new(url)),
        None => "make new document".to_string(),
    };
    safari(|s| s.line("activate").line(statement).return_text(""))
}

fn require_window_index(script: Script, window: u32) -> Script {
    script
        .require_windows(NO_WINDOWS)
        .if_then(format!("{window} > (count of windows)"), |s| {
            s.return_text(&format!("Window {window} does not exist"))
        })
}

fn require_tab_index(script: Script, window: u32, tab: u32) -> Script {
    script.if_then(format!("{tab} > (count of tabs)"), |s| {
        s.return_text(&format!("Tab {tab} does not exist in window {window}"))
    })
}

pub fn switch_tab(window: u32, tab: u32) -> Script {
    safari(|s| {
        require_window_index(s, window).tell(format!("window {window}"), |s| {
            require_tab_index(s, window, tab)
                .line(format!("set current tab to tab {tab}"))
                .line(format!(
                    r#"return "Switched to tab {tab} in window {window}: " & (name of tab {tab} as text)"#
                ))
        })
    })
}

pub fn close_tab(window: u32, tab: u32) -> Script {
    safari(|s| {
        require_window_index(s, window).tell(format!("window {window}"), |s| {
            require_tab_index(s, window, tab)
                .line(format!("set tabName to name of tab {tab} as text"))
                .line(format!("close tab {tab}"))
                .line(r#"return "Closed tab: " & tabName"#)
        })
    })
}

pub fn close_current_tab() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("set tabName to name of {CURRENT_TAB} as text"))
            .line(format!("close {CURRENT_TAB}"))
            .line(r#"return "Closed tab: " & tabName"#)
    })
}

pub fn close_window(window: u32) -> Script {
    safari(|s| {
        require_window_index(s, window)
            .line(format!("close window {window}"))
            .return_text(&format!("Closed window {window}"))
    })
}

pub fn reload() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(do_javascript("location.reload()"))
            .return_text("Page reloaded")
    })
}

pub fn go_back() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(do_javascript("history.back()"))
            .return_text("Navigated back")
    })
}

pub fn go_forward() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(do_javascript("history.forward()"))
            .return_text("Navigated forward")
    })
}

/// Visible text of the current page
pub fn page_content() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("return {}", do_javascript("document.body.innerText")))
    })
}

/// HTML source of the current page
pub fn page_source() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("return source of {CURRENT_TAB}"))
    })
}

pub fn selected_text() -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!(
                "set selectedText to {}",
                do_javascript("window.getSelection().toString()")
            ))
            .if_then(r#"selectedText is missing value or selectedText is """#, |s| {
                s.return_text(NO_SELECTION)
            })
            .line("return selectedText")
    })
}

/// Run `source` in the current tab. A `missing value` result prints nothing.
pub fn execute_javascript(source: &str) -> Script {
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("set jsResult to {}", do_javascript(source)))
            .if_then("jsResult is missing value", |s| s.return_text(""))
            .line("return jsResult as text")
    })
}

/// Tabs whose title or URL contains `query`, ignoring case on both sides
pub fn search_tabs(query: &str) -> Script {
    let needle = Literal::lowercase(query);
    safari(|s| {
        s.require_windows(NO_WINDOWS)
            .line(format!("set needle to {needle}"))
            .line(r#"set output to """#)
            .line("set winNum to 1")
            .repeat_with("w", "windows", |s| {
                s.line("set tabNum to 1")
                    .repeat_with("t", "tabs of w", |s| {
                        s.line("set tabName to name of t as text")
                            .line("set tabUrl to URL of t as text")
                            .ignoring_case(|s| {
                                s.if_then("tabName contains needle or tabUrl contains needle", |s| {
                                    s.line(r#"set output to output & "Window " & winNum & ", Tab " & tabNum & ": " & tabName & linefeed & "  " & tabUrl & linefeed"#)
                                })
                            })
                            .line("set tabNum to tabNum + 1")
                    })
                    .line("set winNum to winNum + 1")
            })
            .if_then(r#"output is """#, |s| {
                s.line(r#"return "No tabs found matching: " & needle"#)
            })
            .line("return output")
    })
}

/// Open Safari's Add Bookmark dialog (⌘D), optionally after loading `url`.
///
/// Safari's scripting dictionary has no bookmark command, so this only gets
/// as far as showing the dialog.
pub fn add_bookmark(url: Option<&str>, load_delay_secs: f64) -> Script {
    let script = safari(|s| {
        let s = s.line("activate");
        match url {
            Some(url) => {
                let url = Literal::new(url);
                s.if_else(
                    "(count of windows) is 0",
                    |s| s.line(format!("make new document with properties {{URL:{url}}}")),
                    |s| s.line(format!("set URL of {CURRENT_TAB} to {url}")),
                )
                .line(format!("delay {load_delay_secs}"))
            }
            None => s.require_windows(NO_WINDOWS),
        }
    });
    script
        .tell_application(SYSTEM_EVENTS, |s| s.line(r#"keystroke "d" using command down"#))
        .return_text("")
}

/// Add `url` to the Reading List, or the current page when `url` is absent.
///
/// With a URL this uses Safari's own `add reading list item` command. The
/// current page has no such handle, so that case falls back to ⌘⇧D.
pub fn add_to_reading_list(url: Option<&str>, title: Option<&str>) -> Script {
    match url {
        Some(url) => {
            let mut command = format!("add reading list item {}", Literal::new(url));
            if let Some(title) = title {
                command.push_str(&format!(" with title {}", Literal::new(title)));
            }
            safari(|s| s.line(command).return_text(""))
        }
        None => safari(|s| s.line("activate").require_windows(NO_WINDOWS))
            .tell_application(SYSTEM_EVENTS, |s| {
                s.line(r#"keystroke "d" using {command down, shift down}"#)
            })
            .return_text(""),
    }
}
