//! Reader configuration
//!
//! Every field has a default, so an empty JS object or `{}` JSON yields the
//! stock reader behavior. Partial objects override only what they name.

use serde::{Deserialize, Serialize};

use crate::read_aloud::tone::Tone;

/// Viewports at or below this width use the Compact layout
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Quiet interval before a resize burst is reconciled
pub const RESIZE_QUIET_INTERVAL_MS: f64 = 300.0;

pub const DEFAULT_SUBTITLE: &str = "A Digital Story";
pub const END_OF_BOOK_HEADING: &str = "End of Book";
pub const END_OF_BOOK_MESSAGE: &str = "Thank you for reading!";

/// Flip index page plus the one after it
pub const DEFAULT_VISIBLE_PAGE_COUNT: usize = 2;

pub const DEFAULT_SPEECH_RATE: f32 = 1.0;
pub const DEFAULT_SPEECH_PITCH: f32 = 1.0;
pub const DEFAULT_VOICE_LANG: &str = "en";

/// When a settled resize triggers recomposition
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReconcilePolicy {
    /// Recompose and reinitialize on every settled resize
    #[default]
    Always,
    /// Only when the classified layout mode differs from the current one
    OnModeChange,
}

/// Reader-wide configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderConfig {
    pub mobile_breakpoint_px: f64,
    pub resize_quiet_interval_ms: f64,
    pub reconcile_policy: ReconcilePolicy,
    pub default_subtitle: String,
    pub end_heading: String,
    pub end_message: String,
    pub visible_page_count: usize,
    pub speech_rate: f32,
    pub speech_pitch: f32,
    pub tone: Tone,
    pub voice_lang: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            resize_quiet_interval_ms: RESIZE_QUIET_INTERVAL_MS,
            reconcile_policy: ReconcilePolicy::Always,
            default_subtitle: DEFAULT_SUBTITLE.to_string(),
            end_heading: END_OF_BOOK_HEADING.to_string(),
            end_message: END_OF_BOOK_MESSAGE.to_string(),
            visible_page_count: DEFAULT_VISIBLE_PAGE_COUNT,
            speech_rate: DEFAULT_SPEECH_RATE,
            speech_pitch: DEFAULT_SPEECH_PITCH,
            tone: Tone::Neutral,
            voice_lang: DEFAULT_VOICE_LANG.to_string(),
        }
    }
}

impl ReaderConfig {
    /// Parse a (possibly partial) JSON configuration object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp values that would break the reader into usable ranges
    pub fn normalized(mut self) -> Self {
        if self.visible_page_count == 0 {
            log::warn!("visible_page_count of 0 raised to 1");
            self.visible_page_count = 1;
        }
        if self.resize_quiet_interval_ms.is_nan() || self.resize_quiet_interval_ms < 0.0 {
            self.resize_quiet_interval_ms = RESIZE_QUIET_INTERVAL_MS;
        }
        self
    }
}
