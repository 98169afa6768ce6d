//! Voice descriptions and selection

use serde::{Deserialize, Serialize};

/// A synthesis voice as reported by the speech service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag, e.g. "en-US"
    pub lang: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            is_default: false,
        }
    }
}

/// Pick a voice for narration
///
/// Prefers the engine default among voices matching `lang_prefix`, then any
/// matching voice, then the engine default, then the first voice.
pub fn select_voice<'a>(voices: &'a [Voice], lang_prefix: &str) -> Option<&'a Voice> {
    let prefix = lang_prefix.to_ascii_lowercase();
    let in_lang = |v: &&Voice| !prefix.is_empty() && v.lang.to_ascii_lowercase().starts_with(&prefix);

    voices
        .iter()
        .filter(in_lang)
        .find(|v| v.is_default)
        .or_else(|| voices.iter().find(in_lang))
        .or_else(|| voices.iter().find(|v| v.is_default))
        .or_else(|| voices.first())
}
