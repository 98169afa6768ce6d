//! Storybook Reader WASM Module
//!
//! Turns a book document (title, subtitle, story entries) into a page-flip
//! sequence sized for the current viewport, keeps it in sync as the viewport
//! changes, and narrates visible pages with the browser's speech engine.
//!
//! The core modules are plain Rust over capability traits and run natively;
//! `api` binds them to the browser.

pub mod models;
pub mod config;
pub mod loader;
pub mod library;
pub mod composer;
pub mod viewport;
pub mod widget;
pub mod reconcile;
pub mod read_aloud;
pub mod renderers;
pub mod session;
pub mod api;

// Re-export commonly used types
pub use models::*;
pub use config::ReaderConfig;
pub use composer::{compose, compose_with, ComposeOptions};
pub use loader::{BookLoader, FetchResponse, LoadFailure, LoadFailureReason, ResourceFetcher};
pub use session::{ReaderSession, ReconcileOutcome};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        wasm_warn!("logger already initialized");
    }

    log::info!("Storybook reader WASM module initialized");
}
