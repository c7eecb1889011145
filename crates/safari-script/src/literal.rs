//! AppleScript string literals
//!
//! Every piece of caller-supplied text (URLs, search queries, JavaScript
//! source) is embedded in a generated script as a double-quoted literal.
//! [`Literal`] owns the escaping so that no caller ever concatenates raw
//! text into a script.

use std::fmt;

/// Escape `raw` for use between AppleScript double quotes.
///
/// Passes run in a fixed order: backslashes first, then double quotes, then
/// line breaks. Escaping quotes before backslashes would double the
/// backslash introduced for each quote.
pub fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// A double-quoted, already-escaped AppleScript string literal.
///
/// `Display` renders the literal including its surrounding quotes, so it can
/// be dropped straight into a `format!` when building a script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(String);

impl Literal {
    /// Build a literal from unescaped text
    pub fn new(raw: &str) -> Self {
        Self(escape(raw))
    }

    /// Build a literal from the lower-cased form of `raw`
    pub fn lowercase(raw: &str) -> Self {
        Self(escape(&raw.to_lowercase()))
    }

    /// The escaped body, without the surrounding quotes
    pub fn escaped(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}
