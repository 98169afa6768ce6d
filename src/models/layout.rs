//! Layout models: viewport dimensions and the discrete layout mode

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Discrete page-composition mode derived from the viewport
#[wasm_bindgen]
#[repr(u8)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Image and text share one leaf; fixed aspect-ratio widget
    #[default]
    Standard = 0,
    /// Image and text on separate leaves; widget fills the viewport height
    Compact = 1,
}

/// Live viewport size in CSS pixels
#[wasm_bindgen]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[wasm_bindgen]
impl Viewport {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl LayoutMode {
    pub fn is_compact(self) -> bool {
        self == LayoutMode::Compact
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::Standard => write!(f, "standard"),
            LayoutMode::Compact => write!(f, "compact"),
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
