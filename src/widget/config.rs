//! Flip widget construction settings
//!
//! Serialized with the page-flip widget's own option names so the JS side can
//! pass the object straight to the widget constructor.

use serde::{Deserialize, Serialize};

use crate::models::{LayoutMode, Viewport};

use super::WidgetError;

pub const STANDARD_WIDTH: f64 = 543.0;
pub const STANDARD_HEIGHT: f64 = 768.0;
pub const STANDARD_MIN_WIDTH: f64 = 315.0;
pub const STANDARD_MAX_WIDTH: f64 = 1000.0;
pub const STANDARD_MIN_HEIGHT: f64 = 420.0;
pub const STANDARD_MAX_HEIGHT: f64 = 1350.0;

pub const COMPACT_WIDTH: f64 = 400.0;
pub const COMPACT_MIN_WIDTH: f64 = 300.0;
pub const COMPACT_MAX_WIDTH: f64 = 500.0;

pub const MAX_SHADOW_OPACITY: f64 = 0.5;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SizingMode {
    Fixed,
    #[default]
    Stretch,
}

/// Options handed to the widget constructor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "size")]
    pub sizing_mode: SizingMode,
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub max_shadow_opacity: f64,
    pub show_cover: bool,
    pub mobile_scroll_support: bool,
}

impl WidgetConfig {
    /// Sizing for a layout mode
    ///
    /// Standard uses a fixed aspect-ratio box with min/max clamps. Compact pins
    /// every height bound to the live viewport height so the book fills the
    /// screen.
    pub fn for_layout(mode: LayoutMode, viewport: Viewport) -> Self {
        match mode {
            LayoutMode::Standard => Self {
                width: STANDARD_WIDTH,
                height: STANDARD_HEIGHT,
                sizing_mode: SizingMode::Stretch,
                min_width: STANDARD_MIN_WIDTH,
                max_width: STANDARD_MAX_WIDTH,
                min_height: STANDARD_MIN_HEIGHT,
                max_height: STANDARD_MAX_HEIGHT,
                max_shadow_opacity: MAX_SHADOW_OPACITY,
                show_cover: true,
                mobile_scroll_support: false,
            },
            LayoutMode::Compact => Self {
                width: COMPACT_WIDTH,
                height: viewport.height,
                sizing_mode: SizingMode::Stretch,
                min_width: COMPACT_MIN_WIDTH,
                max_width: COMPACT_MAX_WIDTH,
                min_height: viewport.height,
                max_height: viewport.height,
                max_shadow_opacity: MAX_SHADOW_OPACITY,
                show_cover: true,
                mobile_scroll_support: false,
            },
        }
    }

    /// Reject sizes the widget cannot lay out
    pub fn validate(&self) -> Result<(), WidgetError> {
        let dims = [
            ("width", self.width),
            ("height", self.height),
            ("minWidth", self.min_width),
            ("maxWidth", self.max_width),
            ("minHeight", self.min_height),
            ("maxHeight", self.max_height),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(WidgetError::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.min_width > self.max_width {
            return Err(WidgetError::InvalidConfig(format!(
                "minWidth {} exceeds maxWidth {}",
                self.min_width, self.max_width
            )));
        }
        if self.min_height > self.max_height {
            return Err(WidgetError::InvalidConfig(format!(
                "minHeight {} exceeds maxHeight {}",
                self.min_height, self.max_height
            )));
        }
        Ok(())
    }
}
