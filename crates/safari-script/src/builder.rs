//! Indented AppleScript builder
//!
//! Scripts are assembled line by line. Block helpers (`tell`, `if`,
//! `repeat`, `ignoring case`) take a closure for their body so that every
//! opened block is closed and indentation always matches nesting.
//!
//! ```
//! use safari_script::{Literal, Script};
//!
//! let script = Script::new().tell_application("Safari", |s| {
//!     s.if_then("(count of windows) is 0", |s| s.return_text("No windows open"))
//!         .line(format!("set URL of front document to {}", Literal::new("https://example.com")))
//! });
//! assert!(script.render().starts_with("tell application \"Safari\""));
//! ```

use std::fmt;

use crate::literal::Literal;

const INDENT: &str = "    ";

/// An AppleScript program under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
    depth: usize,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one statement at the current nesting depth.
    ///
    /// Any caller-supplied text in `text` must already have gone through
    /// [`Literal`].
    pub fn line(mut self, text: impl AsRef<str>) -> Self {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.depth), text.as_ref()));
        self
    }

    /// Emit `open`, the body one level deeper, then `close`
    pub fn block(
        self,
        open: impl AsRef<str>,
        close: &str,
        body: impl FnOnce(Script) -> Script,
    ) -> Self {
        let mut inner = self.line(open);
        inner.depth += 1;
        let mut inner = body(inner);
        inner.depth -= 1;
        inner.line(close)
    }

    /// `tell application "<name>" ... end tell`
    pub fn tell_application(self, name: &str, body: impl FnOnce(Script) -> Script) -> Self {
        self.block(
            format!("tell application {}", Literal::new(name)),
            "end tell",
            body,
        )
    }

    /// `tell <object> ... end tell` for an object reference such as `front window`
    pub fn tell(self, object: impl AsRef<str>, body: impl FnOnce(Script) -> Script) -> Self {
        self.block(format!("tell {}", object.as_ref()), "end tell", body)
    }

    pub fn if_then(self, condition: impl AsRef<str>, body: impl FnOnce(Script) -> Script) -> Self {
        self.block(format!("if {} then", condition.as_ref()), "end if", body)
    }

    /// `if <condition> then ... else ... end if`
    pub fn if_else(
        self,
        condition: impl AsRef<str>,
        then: impl FnOnce(Script) -> Script,
        otherwise: impl FnOnce(Script) -> Script,
    ) -> Self {
        let mut script = self.line(format!("if {} then", condition.as_ref()));
        script.depth += 1;
        let mut script = then(script);
        script.depth -= 1;
        let mut script = script.line("else");
        script.depth += 1;
        let mut script = otherwise(script);
        script.depth -= 1;
        script.line("end if")
    }

    /// `repeat with <var> in <collection> ... end repeat`
    pub fn repeat_with(
        self,
        var: &str,
        collection: &str,
        body: impl FnOnce(Script) -> Script,
    ) -> Self {
        self.block(
            format!("repeat with {var} in {collection}"),
            "end repeat",
            body,
        )
    }

    pub fn ignoring_case(self, body: impl FnOnce(Script) -> Script) -> Self {
        self.block("ignoring case", "end ignoring", body)
    }

    /// `return "<text>"` with `text` escaped
    pub fn return_text(self, text: &str) -> Self {
        self.line(format!("return {}", Literal::new(text)))
    }

    /// Bail out with `sentinel` when the application has no open windows
    pub fn require_windows(self, sentinel: &str) -> Self {
        self.if_then("(count of windows) is 0", |s| s.return_text(sentinel))
    }

    /// The script source, one statement per line
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
