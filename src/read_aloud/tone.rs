//! Narration tone presets
//!
//! A tone is a pure adjustment of a base (rate, pitch) pair. Results are
//! clamped to the range speech engines accept.

use serde::{Deserialize, Serialize};

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 2.0;
pub const MIN_PITCH: f32 = 0.1;
pub const MAX_PITCH: f32 = 2.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    #[default]
    Neutral,
    Calm,
    Happy,
    Excited,
}

impl Tone {
    /// (rate multiplier, pitch multiplier)
    fn multipliers(self) -> (f32, f32) {
        match self {
            Tone::Neutral => (1.0, 1.0),
            Tone::Calm => (0.85, 0.9),
            Tone::Happy => (1.1, 1.2),
            Tone::Excited => (1.25, 1.4),
        }
    }

    /// Adjust a base rate/pitch pair for this tone
    pub fn apply(self, rate: f32, pitch: f32) -> (f32, f32) {
        let (rate_mul, pitch_mul) = self.multipliers();
        (
            clamp_or(rate * rate_mul, MIN_RATE, MAX_RATE),
            clamp_or(pitch * pitch_mul, MIN_PITCH, MAX_PITCH),
        )
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "" => Ok(Tone::Neutral),
            "calm" => Ok(Tone::Calm),
            "happy" => Ok(Tone::Happy),
            "excited" => Ok(Tone::Excited),
            other => Err(format!("Unknown tone: '{}'", other)),
        }
    }
}

// NaN falls back to the neutral 1.0
fn clamp_or(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(min, max)
    }
}
