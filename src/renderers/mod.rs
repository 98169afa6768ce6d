//! Renderers for composed pages
//!
//! The reader does not own styling; renderers only turn page descriptors into
//! the markup the presentation surface displays.

pub mod html;

pub use html::{render_pages, HtmlPageRenderer, RenderError, IMAGE_FALLBACK_SRC};
