//! Safari automation primitives
//!
//! This crate holds everything needed to drive Safari from the outside:
//! generating AppleScript, running it through an external interpreter, and
//! making sense of Safari's exported bookmark data.
//!
//! # Layers
//!
//! ```text
//! [ safari ]     per-operation script renderers (open_url, switch_tab, ...)
//!      |
//!      v
//! [ builder ]    indented Script builder, the only place scripts are assembled
//! [ literal ]    escaped AppleScript string literals
//!      |
//!      v
//! [ runner ]     CommandRunner trait + ProcessRunner (osascript, plutil)
//!
//! [ bookmarks ]  Bookmarks.plist tree parsing and text rendering
//! ```
//!
//! Untrusted text only enters a script through [`Literal`], so the escaping
//! rules live in exactly one place.

pub mod bookmarks;
pub mod builder;
pub mod error;
pub mod literal;
pub mod runner;
pub mod safari;

pub use bookmarks::{BookmarkNode, NodeKind, format_bookmarks, format_reading_list};
pub use builder::Script;
pub use error::{Error, Result};
pub use literal::Literal;
pub use runner::{CommandRunner, DEFAULT_OUTPUT_LIMIT, Invocation, ProcessRunner};
