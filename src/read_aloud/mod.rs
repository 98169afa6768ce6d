//! Read-aloud controller
//!
//! A three-state machine (Idle, Speaking, Paused) over a speech service.
//!
//! ```text
//! Idle --play--> Speaking --pause--> Paused --resume--> Speaking
//! Speaking|Paused --stop--> Idle
//! Speaking --utterance end--> Idle
//! any --flip--> Idle
//! ```
//!
//! The speech handle is process-wide and may have been used by someone else,
//! so the controller always cancels it before starting an utterance. Each
//! utterance carries an id; an end notification for anything but the current
//! utterance is ignored, which keeps a cancelled utterance's late `onend` from
//! stopping its replacement.

pub mod tone;
pub mod voice;

pub use tone::Tone;
pub use voice::{select_voice, Voice};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ReaderConfig, DEFAULT_SPEECH_PITCH, DEFAULT_SPEECH_RATE, DEFAULT_VISIBLE_PAGE_COUNT, DEFAULT_VOICE_LANG};
use crate::models::PageDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadAloudError {
    /// No speech capability; the read-aloud control should be disabled
    #[error("speech synthesis is not available")]
    SynthesisUnavailable,

    #[error("no text to read")]
    NothingToRead,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReadAloudState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// One synthesis request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    /// Voice name; `None` lets the engine choose
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
}

/// Speech synthesis capability
pub trait SpeechService {
    fn is_available(&self) -> bool;
    /// Start speaking. Completion is reported later through
    /// `ReadAloudController::on_utterance_end` with the utterance id.
    fn speak(&mut self, utterance: &Utterance);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
    /// Currently known voices; may be empty until the engine populates them
    fn voices(&self) -> Vec<Voice>;
}

/// Speech service for environments without synthesis
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechService for NullSpeech {
    fn is_available(&self) -> bool {
        false
    }
    fn speak(&mut self, _utterance: &Utterance) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn cancel(&mut self) {}
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }
}

/// Visual "speaking" indicator
pub trait SpeakingIndicator {
    fn set_speaking(&mut self, speaking: bool);
}

/// Indicator that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl SpeakingIndicator for NoIndicator {
    fn set_speaking(&mut self, _speaking: bool) {}
}

/// Narration settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAloudSettings {
    pub tone: Tone,
    pub base_rate: f32,
    pub base_pitch: f32,
    pub voice_lang: String,
    /// Pages read starting at the flip index
    pub visible_page_count: usize,
}

impl Default for ReadAloudSettings {
    fn default() -> Self {
        Self {
            tone: Tone::Neutral,
            base_rate: DEFAULT_SPEECH_RATE,
            base_pitch: DEFAULT_SPEECH_PITCH,
            voice_lang: DEFAULT_VOICE_LANG.to_string(),
            visible_page_count: DEFAULT_VISIBLE_PAGE_COUNT,
        }
    }
}

impl From<&ReaderConfig> for ReadAloudSettings {
    fn from(config: &ReaderConfig) -> Self {
        Self {
            tone: config.tone,
            base_rate: config.speech_rate,
            base_pitch: config.speech_pitch,
            voice_lang: config.voice_lang.clone(),
            visible_page_count: config.visible_page_count.max(1),
        }
    }
}

/// Text of the `count` pages starting at `current_index`
pub fn visible_text(pages: &[PageDescriptor], current_index: usize, count: usize) -> Option<String> {
    join_text(pages.iter().skip(current_index).take(count.max(1)))
}

/// Text of every page in order
pub fn all_text(pages: &[PageDescriptor]) -> Option<String> {
    join_text(pages.iter())
}

/// Visible text, falling back to the whole book when the visible pages are silent
pub fn narration_text(pages: &[PageDescriptor], current_index: usize, count: usize) -> Option<String> {
    visible_text(pages, current_index, count).or_else(|| {
        log::debug!("no text on visible pages at {}, reading whole book", current_index);
        all_text(pages)
    })
}

fn join_text<'a>(pages: impl Iterator<Item = &'a PageDescriptor>) -> Option<String> {
    let parts: Vec<String> = pages.filter_map(PageDescriptor::speakable_text).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Read-aloud state machine over a speech service
pub struct ReadAloudController<S: SpeechService, I: SpeakingIndicator> {
    speech: S,
    indicator: I,
    settings: ReadAloudSettings,
    state: ReadAloudState,
    current_utterance: Option<u64>,
    last_utterance_id: u64,
}

impl<S: SpeechService, I: SpeakingIndicator> ReadAloudController<S, I> {
    pub fn new(speech: S, indicator: I, settings: ReadAloudSettings) -> Self {
        Self {
            speech,
            indicator,
            settings,
            state: ReadAloudState::Idle,
            current_utterance: None,
            last_utterance_id: 0,
        }
    }

    pub fn state(&self) -> ReadAloudState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.speech.is_available()
    }

    pub fn settings(&self) -> &ReadAloudSettings {
        &self.settings
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.settings.tone = tone;
    }

    pub fn current_utterance(&self) -> Option<u64> {
        self.current_utterance
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    /// Start narrating the visible pages
    ///
    /// From Paused this resumes; from Speaking it does nothing.
    pub fn play(&mut self, pages: &[PageDescriptor], current_index: usize) -> Result<ReadAloudState, ReadAloudError> {
        match self.state {
            ReadAloudState::Speaking => return Ok(self.state),
            ReadAloudState::Paused => return Ok(self.resume()),
            ReadAloudState::Idle => {}
        }

        if !self.speech.is_available() {
            log::warn!("read-aloud requested but speech synthesis is unavailable");
            return Err(ReadAloudError::SynthesisUnavailable);
        }

        let text = narration_text(pages, current_index, self.settings.visible_page_count)
            .ok_or(ReadAloudError::NothingToRead)?;

        let utterance = self.build_utterance(text);
        self.speech.cancel();
        self.speech.speak(&utterance);
        log::info!(
            "read-aloud #{} started ({} chars, rate {}, pitch {})",
            utterance.id,
            utterance.text.len(),
            utterance.rate,
            utterance.pitch
        );

        self.current_utterance = Some(utterance.id);
        self.enter(ReadAloudState::Speaking);
        Ok(self.state)
    }

    /// Play from Idle, pause while Speaking, resume while Paused
    pub fn toggle(&mut self, pages: &[PageDescriptor], current_index: usize) -> Result<ReadAloudState, ReadAloudError> {
        match self.state {
            ReadAloudState::Idle => self.play(pages, current_index),
            ReadAloudState::Speaking => Ok(self.pause()),
            ReadAloudState::Paused => Ok(self.resume()),
        }
    }

    pub fn pause(&mut self) -> ReadAloudState {
        if self.state == ReadAloudState::Speaking {
            self.speech.pause();
            self.enter(ReadAloudState::Paused);
        }
        self.state
    }

    pub fn resume(&mut self) -> ReadAloudState {
        if self.state == ReadAloudState::Paused {
            self.speech.resume();
            self.enter(ReadAloudState::Speaking);
        }
        self.state
    }

    /// Cancel any narration and return to Idle
    pub fn stop(&mut self) -> ReadAloudState {
        if self.state != ReadAloudState::Idle {
            self.speech.cancel();
            self.current_utterance = None;
            self.enter(ReadAloudState::Idle);
            log::debug!("read-aloud stopped");
        }
        self.state
    }

    /// A page flip happened; never keep narrating a page that left the screen
    pub fn on_flip(&mut self) -> ReadAloudState {
        self.stop()
    }

    /// Speech service reports that utterance `id` finished on its own
    pub fn on_utterance_end(&mut self, id: u64) -> ReadAloudState {
        if self.state == ReadAloudState::Speaking && self.current_utterance == Some(id) {
            self.current_utterance = None;
            self.enter(ReadAloudState::Idle);
        } else {
            log::debug!("ignoring end of utterance #{}", id);
        }
        self.state
    }

    fn build_utterance(&mut self, text: String) -> Utterance {
        self.last_utterance_id += 1;
        let (rate, pitch) = self
            .settings
            .tone
            .apply(self.settings.base_rate, self.settings.base_pitch);
        let voices = self.speech.voices();
        let voice = select_voice(&voices, &self.settings.voice_lang).map(|v| v.name.clone());

        Utterance {
            id: self.last_utterance_id,
            text,
            voice,
            rate,
            pitch,
        }
    }

    fn enter(&mut self, next: ReadAloudState) {
        let was_speaking = self.state == ReadAloudState::Speaking;
        let is_speaking = next == ReadAloudState::Speaking;
        self.state = next;
        if was_speaking != is_speaking {
            self.indicator.set_speaking(is_speaking);
        }
    }
}
