//! `StorybookReader`: the JavaScript-facing reading session
//!
//! Owns a `ReaderSession` over browser capabilities and the single-fire resize
//! timer. JS forwards DOM events to it:
//!
//! ```js
//! const reader = new StorybookReader(widgetFactory, { }, "read-aloud-button");
//! reader.openDocument(await fetchBook(bookId), innerWidth, innerHeight);
//! addEventListener("resize", () => reader.onResize(innerWidth, innerHeight));
//! next.onclick = () => reader.next();
//! // inside the widget's flip listener:
//! reader.onFlip(generation, event.data);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::ReaderConfig;
use crate::loader::parse_book;
use crate::models::{BookDocument, LayoutMode, Viewport};
use crate::read_aloud::{ReadAloudError, ReadAloudState, Tone};
use crate::session::{ReaderSession, ReconcileOutcome};
use crate::widget::NavDirection;
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

use super::browser::{BrowserSpeech, DomIndicator, JsWidgetFactory};
use super::helpers::{deserialize, deserialize_or_default, serialize, to_js_error};

type BrowserSession = ReaderSession<JsWidgetFactory, BrowserSpeech, DomIndicator>;

/// Resize timer: the timeout id and the callback it invokes. Kept until the
/// next resize or close replaces it, so the callback outlives its firing.
struct ResizeTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
pub struct StorybookReader {
    session: Rc<RefCell<BrowserSession>>,
    resize_timer: Rc<RefCell<Option<ResizeTimer>>>,
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn read_aloud_result(result: Result<ReadAloudState, ReadAloudError>) -> Result<JsValue, JsValue> {
    match result {
        Ok(state) => serialize(&state, "Read-aloud state serialization error"),
        Err(ReadAloudError::SynthesisUnavailable) => {
            wasm_warn!("read-aloud unavailable");
            Err(JsValue::from_str("unavailable"))
        }
        Err(e) => Err(to_js_error(e)),
    }
}

#[wasm_bindgen]
impl StorybookReader {
    /// Create a reader
    ///
    /// - `widget_factory`: `{ create(config, generation) }` returning a widget
    ///   with `loadPages(html, pages)`, `flipNext()`, `flipPrev()`, `destroy()`
    /// - `config`: partial `ReaderConfig` object, or `undefined`
    /// - `indicator_id`: element that receives `data-speaking`
    #[wasm_bindgen(constructor)]
    pub fn new(widget_factory: JsValue, config: JsValue, indicator_id: String) -> Result<StorybookReader, JsValue> {
        let config: ReaderConfig = deserialize_or_default(config, "Reader config deserialization error")?;
        let factory = JsWidgetFactory::new(widget_factory)?;

        let session = Rc::new_cyclic(|weak: &Weak<RefCell<BrowserSession>>| {
            let weak = weak.clone();
            RefCell::new(ReaderSession::with_read_aloud(factory, config, move || {
                let weak = weak.clone();
                let on_end: Rc<dyn Fn(u64)> = Rc::new(move |id| {
                    let Some(session) = weak.upgrade() else {
                        return;
                    };
                    match session.try_borrow_mut() {
                        Ok(mut session) => {
                            session.on_utterance_end(id);
                        }
                        Err(_) => wasm_log!("utterance #{} ended during another call; ignored", id),
                    };
                });
                (BrowserSpeech::new(on_end), DomIndicator::new(indicator_id.clone()))
            }))
        });

        wasm_info!("StorybookReader created");
        Ok(StorybookReader {
            session,
            resize_timer: Rc::new(RefCell::new(None)),
        })
    }

    /// Open an already validated document object (from `fetchBook`)
    #[wasm_bindgen(js_name = openDocument)]
    pub fn open_document(&self, document_js: JsValue, width: f64, height: f64) -> Result<(), JsValue> {
        let document: BookDocument = deserialize(document_js, "Book deserialization error")?;
        self.open(document, width, height)
    }

    /// Validate and open a book from its JSON text
    #[wasm_bindgen(js_name = openJson)]
    pub fn open_json(&self, json: &str, width: f64, height: f64) -> Result<(), JsValue> {
        let document = parse_book(json).map_err(to_js_error)?;
        self.open(document, width, height)
    }

    fn open(&self, document: BookDocument, width: f64, height: f64) -> Result<(), JsValue> {
        self.clear_resize_timer();
        let mut session = self.session.borrow_mut();
        session
            .open(document, Viewport::new(width, height))
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Close the book and release the widget
    pub fn close(&self) {
        self.clear_resize_timer();
        self.session.borrow_mut().close();
    }

    /// Raw resize event; reconciliation runs once the viewport is quiet
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        let now = now_ms();
        let deadline = self.session.borrow_mut().on_resize(Viewport::new(width, height), now);
        self.schedule_poll((deadline - now).max(0.0))
    }

    /// Run a due reconciliation now (normally invoked by the resize timer)
    pub fn poll(&self) -> Result<JsValue, JsValue> {
        let outcome = reconcile_session(&self.session, |session| session.poll(now_ms()));
        match outcome {
            Some(outcome) => serialize(&describe_outcome(&outcome), "Outcome serialization error"),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn next(&self) -> bool {
        self.session.borrow_mut().navigate(NavDirection::Next)
    }

    pub fn prev(&self) -> bool {
        self.session.borrow_mut().navigate(NavDirection::Previous)
    }

    /// Flip notification from widget instance `generation`
    #[wasm_bindgen(js_name = onFlip)]
    pub fn on_flip(&self, generation: f64, current_index: usize) -> bool {
        self.session
            .borrow_mut()
            .on_flip(generation as u64, current_index)
            .is_some()
    }

    /// Start narration; rejects with "unavailable" when speech is missing
    pub fn play(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(self.session.borrow_mut().play())
    }

    /// Single-button read-aloud control
    #[wasm_bindgen(js_name = toggleReadAloud)]
    pub fn toggle_read_aloud(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(self.session.borrow_mut().toggle_read_aloud())
    }

    pub fn pause(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(Ok(self.session.borrow_mut().pause()))
    }

    pub fn resume(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(Ok(self.session.borrow_mut().resume()))
    }

    pub fn stop(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(Ok(self.session.borrow_mut().stop()))
    }

    #[wasm_bindgen(js_name = setTone)]
    pub fn set_tone(&self, tone: &str) -> Result<(), JsValue> {
        let tone: Tone = tone.parse().map_err(to_js_error)?;
        self.session.borrow_mut().set_tone(tone);
        Ok(())
    }

    #[wasm_bindgen(js_name = readAloudState)]
    pub fn read_aloud_state(&self) -> Result<JsValue, JsValue> {
        read_aloud_result(Ok(self.session.borrow().read_aloud_state()))
    }

    /// Composed page descriptors currently displayed
    pub fn pages(&self) -> Result<JsValue, JsValue> {
        serialize(&self.session.borrow().pages(), "Page serialization error")
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> Option<String> {
        self.session.borrow().title().map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> LayoutMode {
        self.session.borrow().mode()
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.session.borrow().current_index()
    }

    fn schedule_poll(&self, delay_ms: f64) -> Result<(), JsValue> {
        self.clear_resize_timer();

        let window = web_sys::window().ok_or_else(|| to_js_error("no window"))?;
        let session = Rc::downgrade(&self.session);
        let callback = Closure::<dyn FnMut()>::new(move || {
            // The timer was armed for this burst's deadline; a later resize
            // would have replaced it, so settle without rechecking the clock
            if let Some(session) = session.upgrade() {
                reconcile_session(&session, BrowserSession::settle);
            }
        });

        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms.ceil() as i32,
        )?;
        *self.resize_timer.borrow_mut() = Some(ResizeTimer {
            handle,
            _callback: callback,
        });
        Ok(())
    }

    fn clear_resize_timer(&self) {
        if let Some(timer) = self.resize_timer.borrow_mut().take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timer.handle);
            }
        }
    }
}

fn reconcile_session(
    session: &Rc<RefCell<BrowserSession>>,
    pass: impl FnOnce(&mut BrowserSession) -> Option<ReconcileOutcome>,
) -> Option<ReconcileOutcome> {
    let mut session = match session.try_borrow_mut() {
        Ok(session) => session,
        Err(_) => {
            wasm_warn!("resize settled during another reader call; skipped");
            return None;
        }
    };
    let outcome = pass(&mut *session)?;
    match &outcome {
        ReconcileOutcome::Recomposed { generation, mode } => {
            wasm_info!("recomposed for {} layout (widget #{})", mode, generation)
        }
        ReconcileOutcome::Failed { error, restored } => {
            wasm_error!("resize reconciliation failed: {} (previous layout kept: {})", error, restored)
        }
        ReconcileOutcome::Unchanged | ReconcileOutcome::NoDocument => {}
    }
    Some(outcome)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeSummary {
    recomposed: bool,
    mode: Option<LayoutMode>,
    error: Option<String>,
}

fn describe_outcome(outcome: &ReconcileOutcome) -> OutcomeSummary {
    match outcome {
        ReconcileOutcome::Recomposed { mode, .. } => OutcomeSummary {
            recomposed: true,
            mode: Some(*mode),
            error: None,
        },
        ReconcileOutcome::Failed { error, .. } => OutcomeSummary {
            recomposed: false,
            mode: None,
            error: Some(error.to_string()),
        },
        ReconcileOutcome::Unchanged | ReconcileOutcome::NoDocument => OutcomeSummary {
            recomposed: false,
            mode: None,
            error: None,
        },
    }
}
