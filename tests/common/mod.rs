// Shared doubles for the integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use storybook_wasm::models::{BookDocument, LayoutMode, PageDescriptor, StoryEntry};
use storybook_wasm::read_aloud::{SpeakingIndicator, SpeechService, Utterance, Voice};
use storybook_wasm::widget::{FlipWidget, FlipWidgetFactory, WidgetConfig, WidgetError};

/// Everything the doubles were asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Create { generation: u64, width: f64, height: f64 },
    Load { generation: u64, pages: usize },
    Next { generation: u64 },
    Prev { generation: u64 },
    Destroy { generation: u64 },
    Speak { id: u64, text: String },
    Pause,
    Resume,
    Cancel,
    Indicator(bool),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(log: &Log, pred: impl Fn(&Event) -> bool) -> usize {
    log.borrow().iter().filter(|e| pred(e)).count()
}

/// Widget factory that records lifecycle calls and can be told to fail
#[derive(Clone)]
pub struct RecordingFactory {
    pub log: Log,
    pub fail_create: Rc<Cell<bool>>,
    /// Number of upcoming widgets whose `load_pages` fails
    pub fail_loads: Rc<Cell<usize>>,
}

impl RecordingFactory {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            fail_create: Rc::new(Cell::new(false)),
            fail_loads: Rc::new(Cell::new(0)),
        }
    }

    pub fn creates(&self) -> usize {
        count(&self.log, |e| matches!(e, Event::Create { .. }))
    }

    pub fn destroys(&self) -> usize {
        count(&self.log, |e| matches!(e, Event::Destroy { .. }))
    }
}

pub struct RecordingWidget {
    log: Log,
    generation: u64,
    fail_load: bool,
}

impl FlipWidget for RecordingWidget {
    fn load_pages(&mut self, pages: &[PageDescriptor]) -> Result<(), WidgetError> {
        if self.fail_load {
            return Err(WidgetError::LoadPages("rejected".to_string()));
        }
        self.log.borrow_mut().push(Event::Load {
            generation: self.generation,
            pages: pages.len(),
        });
        Ok(())
    }

    fn flip_next(&mut self) {
        self.log.borrow_mut().push(Event::Next { generation: self.generation });
    }

    fn flip_prev(&mut self) {
        self.log.borrow_mut().push(Event::Prev { generation: self.generation });
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(Event::Destroy { generation: self.generation });
    }
}

impl FlipWidgetFactory for RecordingFactory {
    type Widget = RecordingWidget;

    fn create(&mut self, config: &WidgetConfig, generation: u64) -> Result<RecordingWidget, WidgetError> {
        if self.fail_create.get() {
            return Err(WidgetError::Construction("no surface".to_string()));
        }
        self.log.borrow_mut().push(Event::Create {
            generation,
            width: config.width,
            height: config.height,
        });
        let pending = self.fail_loads.get();
        self.fail_loads.set(pending.saturating_sub(1));
        Ok(RecordingWidget {
            log: Rc::clone(&self.log),
            generation,
            fail_load: pending > 0,
        })
    }
}

/// Speech service that records requests
pub struct RecordingSpeech {
    pub log: Log,
    pub available: bool,
}

impl SpeechService for RecordingSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: &Utterance) {
        self.log.borrow_mut().push(Event::Speak {
            id: utterance.id,
            text: utterance.text.clone(),
        });
    }

    fn pause(&mut self) {
        self.log.borrow_mut().push(Event::Pause);
    }

    fn resume(&mut self) {
        self.log.borrow_mut().push(Event::Resume);
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(Event::Cancel);
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "Test Voice".to_string(),
            lang: "en-US".to_string(),
            is_default: true,
        }]
    }
}

pub struct RecordingIndicator {
    pub log: Log,
}

impl SpeakingIndicator for RecordingIndicator {
    fn set_speaking(&mut self, speaking: bool) {
        self.log.borrow_mut().push(Event::Indicator(speaking));
    }
}

pub fn entry(image: Option<&str>, text: Option<&str>) -> StoryEntry {
    StoryEntry {
        image: image.map(str::to_string),
        image_alt: None,
        text: text.map(str::to_string),
    }
}

/// Two-entry book used by most scenarios
pub fn sample_book() -> BookDocument {
    BookDocument::new("Moon Walk")
        .with_entry(entry(Some("moon.png"), Some("Up we go.")))
        .with_entry(entry(None, Some("Down we come.")))
}

pub fn modes() -> [LayoutMode; 2] {
    [LayoutMode::Standard, LayoutMode::Compact]
}
