//! Browser implementations of the reader's capability traits
//!
//! - `JsWidgetFactory` / `JsFlipWidget`: duck-typed JS objects wrapping the
//!   page-flip widget
//! - `BrowserSpeech`: `window.speechSynthesis`
//! - `DomIndicator`: a `data-speaking` attribute on an element
//! - `fetch_resource`: `window.fetch`

use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

use crate::loader::FetchResponse;
use crate::models::PageDescriptor;
use crate::read_aloud::{SpeakingIndicator, SpeechService, Utterance, Voice};
use crate::renderers::HtmlPageRenderer;
use crate::widget::{FlipWidget, FlipWidgetFactory, WidgetConfig, WidgetError};

use super::helpers::serialize;

#[wasm_bindgen]
extern "C" {
    /// JS object that builds widget instances:
    /// `{ create(config, generation) -> JsFlipWidget }`
    pub type JsWidgetFactoryHandle;

    #[wasm_bindgen(method, catch)]
    fn create(this: &JsWidgetFactoryHandle, config: JsValue, generation: f64) -> Result<JsFlipWidgetHandle, JsValue>;

    /// One widget instance. It must report flips back through
    /// `StorybookReader.onFlip(generation, index)`.
    pub type JsFlipWidgetHandle;

    #[wasm_bindgen(method, catch, js_name = loadPages)]
    fn load_pages(this: &JsFlipWidgetHandle, html: Array, pages: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = flipNext)]
    fn flip_next(this: &JsFlipWidgetHandle);

    #[wasm_bindgen(method, js_name = flipPrev)]
    fn flip_prev(this: &JsFlipWidgetHandle);

    #[wasm_bindgen(method)]
    fn destroy(this: &JsFlipWidgetHandle);
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Widget factory backed by a JS object
pub struct JsWidgetFactory {
    handle: JsWidgetFactoryHandle,
    renderer: Rc<HtmlPageRenderer>,
}

impl JsWidgetFactory {
    pub fn new(handle: JsValue) -> Result<Self, JsValue> {
        let renderer = HtmlPageRenderer::new().map_err(super::helpers::to_js_error)?;
        Ok(Self {
            handle: handle.unchecked_into(),
            renderer: Rc::new(renderer),
        })
    }
}

impl FlipWidgetFactory for JsWidgetFactory {
    type Widget = JsFlipWidget;

    fn create(&mut self, config: &WidgetConfig, generation: u64) -> Result<JsFlipWidget, WidgetError> {
        let config_js = serialize(config, "Widget config serialization error")
            .map_err(|e| WidgetError::Construction(js_message(&e)))?;
        let handle = self
            .handle
            .create(config_js, generation as f64)
            .map_err(|e| WidgetError::Construction(js_message(&e)))?;
        Ok(JsFlipWidget {
            handle,
            renderer: Rc::clone(&self.renderer),
        })
    }
}

/// One live JS widget instance
pub struct JsFlipWidget {
    handle: JsFlipWidgetHandle,
    renderer: Rc<HtmlPageRenderer>,
}

impl FlipWidget for JsFlipWidget {
    fn load_pages(&mut self, pages: &[PageDescriptor]) -> Result<(), WidgetError> {
        let html = self
            .renderer
            .render_pages(pages)
            .map_err(|e| WidgetError::LoadPages(e.to_string()))?;
        let html: Array = html.into_iter().map(JsValue::from).collect();
        let pages_js = serialize(&pages, "Page serialization error")
            .map_err(|e| WidgetError::LoadPages(js_message(&e)))?;
        self.handle
            .load_pages(html, pages_js)
            .map_err(|e| WidgetError::LoadPages(js_message(&e)))
    }

    fn flip_next(&mut self) {
        self.handle.flip_next();
    }

    fn flip_prev(&mut self) {
        self.handle.flip_prev();
    }

    fn destroy(&mut self) {
        self.handle.destroy();
    }
}

/// `window.speechSynthesis`, if the browser has it
pub struct BrowserSpeech {
    synth: Option<SpeechSynthesis>,
    on_end: Rc<dyn Fn(u64)>,
}

impl BrowserSpeech {
    /// `on_end` receives the id of each utterance that finishes
    pub fn new(on_end: Rc<dyn Fn(u64)>) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            crate::wasm_warn!("speechSynthesis unavailable; read-aloud disabled");
        }
        Self { synth, on_end }
    }

    fn find_voice(synth: &SpeechSynthesis, name: &str) -> Option<SpeechSynthesisVoice> {
        synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .find(|v| v.name() == name)
    }
}

impl SpeechService for BrowserSpeech {
    fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    fn speak(&mut self, utterance: &Utterance) {
        let Some(synth) = self.synth.as_ref() else {
            return;
        };
        let js_utterance = match SpeechSynthesisUtterance::new_with_text(&utterance.text) {
            Ok(u) => u,
            Err(e) => {
                crate::wasm_error!("could not create utterance: {}", js_message(&e));
                return;
            }
        };
        js_utterance.set_rate(utterance.rate);
        js_utterance.set_pitch(utterance.pitch);
        if let Some(name) = utterance.voice.as_deref() {
            js_utterance.set_voice(Self::find_voice(synth, name).as_ref());
        }

        let id = utterance.id;
        let on_end = Rc::clone(&self.on_end);
        let callback = Closure::once_into_js(move || on_end(id));
        js_utterance.set_onend(Some(callback.unchecked_ref()));

        synth.speak(&js_utterance);
    }

    fn pause(&mut self) {
        if let Some(synth) = self.synth.as_ref() {
            synth.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(synth) = self.synth.as_ref() {
            synth.resume();
        }
    }

    fn cancel(&mut self) {
        if let Some(synth) = self.synth.as_ref() {
            synth.cancel();
        }
    }

    fn voices(&self) -> Vec<Voice> {
        let Some(synth) = self.synth.as_ref() else {
            return Vec::new();
        };
        synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .map(|v| Voice {
                name: v.name(),
                lang: v.lang(),
                is_default: v.default(),
            })
            .collect()
    }
}

/// Marks an element with `data-speaking="true|false"`
pub struct DomIndicator {
    element_id: String,
}

impl DomIndicator {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl SpeakingIndicator for DomIndicator {
    fn set_speaking(&mut self, speaking: bool) {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.element_id));
        match element {
            Some(el) => {
                let value = if speaking { "true" } else { "false" };
                if let Err(e) = el.set_attribute("data-speaking", value) {
                    crate::wasm_warn!("could not update indicator: {}", js_message(&e));
                }
            }
            None => crate::wasm_log!("indicator element '{}' not found", self.element_id),
        }
    }
}

/// Fetch a resource with `window.fetch`
///
/// A reachable resource is returned whatever its status; `Err` only when the
/// request itself failed.
pub async fn fetch_resource(identifier: &str) -> Result<FetchResponse, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(identifier))
        .await
        .map_err(|e| js_message(&e))?;
    let response: web_sys::Response = response.dyn_into().map_err(|e| js_message(&e))?;

    let text_promise = response.text().map_err(|e| js_message(&e))?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|e| js_message(&e))?
        .as_string()
        .unwrap_or_default();

    Ok(FetchResponse {
        status: response.status(),
        status_text: response.status_text(),
        body,
    })
}
