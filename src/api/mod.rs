//! Storybook reader WASM API
//!
//! This module provides the JavaScript-facing API for the reader. The core
//! (loading, composition, reconciliation, read-aloud) is plain Rust; this
//! layer binds it to the browser.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error conversion and logging
//! - `browser`: Browser implementations of the widget, speech and fetch capabilities
//! - `book`: Stateless loading, library and composition functions
//! - `reader`: `StorybookReader`, the stateful reading session

pub mod helpers;
pub mod browser;
pub mod book;
pub mod reader;

// Re-export the public API
pub use book::{
    book_from_query, classify_viewport, compose_pages, current_book, display_name, empty_library_message,
    fetch_book, fetch_book_list, parse_book, render_pages_html,
};
pub use reader::StorybookReader;
