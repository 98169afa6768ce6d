//! Viewport classifier
//!
//! Maps the live viewport to a `LayoutMode`. Classification is pure and keeps
//! no memory of earlier calls; the reconciliation loop re-runs it on every
//! settled resize.

use crate::config::MOBILE_BREAKPOINT_PX;
use crate::models::{LayoutMode, Viewport};

/// Classify a viewport using the stock mobile breakpoint
pub fn classify(width: f64, height: f64) -> LayoutMode {
    classify_with_breakpoint(width, height, MOBILE_BREAKPOINT_PX)
}

/// Classify a viewport: widths at or below `breakpoint` are Compact.
///
/// Height does not affect the mode; it only sizes the Compact widget.
pub fn classify_with_breakpoint(width: f64, _height: f64, breakpoint: f64) -> LayoutMode {
    if width <= breakpoint {
        LayoutMode::Compact
    } else {
        LayoutMode::Standard
    }
}

/// Classify a `Viewport` value
pub fn classify_viewport(viewport: Viewport, breakpoint: f64) -> LayoutMode {
    classify_with_breakpoint(viewport.width, viewport.height, breakpoint)
}
