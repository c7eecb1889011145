//! Shared test utilities for the safari-mcp workspace.
//!
//! This crate provides standardised test doubles so no test suite has to
//! spawn `osascript` or read a real `Bookmarks.plist`. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`runner`]: [`FakeRunner`], a scripted [`safari_script::CommandRunner`]
//! - [`bookmarks`]: builders for plist-shaped bookmark JSON

pub mod bookmarks;
pub mod runner;

pub use runner::{FakeResponse, FakeRunner};
