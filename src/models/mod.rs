//! Models module for the storybook reader
//!
//! This module contains the data models shared by the loader, the page
//! composer, the widget adapter and the read-aloud controller.

pub mod book;
pub mod layout;
pub mod page;

// Re-export commonly used types
pub use book::*;
pub use layout::*;
pub use page::*;
