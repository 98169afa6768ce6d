//! Reader session
//!
//! Wires the pipeline together for one open book:
//!
//! ```text
//! open:    document -> classify -> compose -> adapter.initialize
//! resize:  debounce -> (settled) classify -> compose -> adapter.initialize
//! flip:    adapter.on_flip -> read-aloud stop
//! ```
//!
//! The session is the only owner of the current page sequence and widget
//! adapter. A reconciliation that fails leaves the previous sequence on
//! screen, rebuilding the widget from it if the failed attempt had already
//! torn the old instance down.

use crate::composer::{compose_with, ComposeOptions};
use crate::config::ReaderConfig;
use crate::models::{BookDocument, LayoutMode, PageDescriptor, Viewport};
use crate::read_aloud::{
    NoIndicator, NullSpeech, ReadAloudController, ReadAloudError, ReadAloudSettings, ReadAloudState,
    SpeakingIndicator, SpeechService, Tone,
};
use crate::reconcile::{ReconcilePlan, Reconciler};
use crate::viewport::classify_viewport;
use crate::widget::{FlipAdapter, FlipEvent, FlipWidgetFactory, NavDirection, WidgetError};

/// Result of one settled-resize pass
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Pages recomposed and a new widget instance loaded
    Recomposed { generation: u64, mode: LayoutMode },
    /// Policy decided nothing needed to change
    Unchanged,
    /// No book open; nothing to reconcile
    NoDocument,
    /// Reinitialization failed; the previous pages are still displayed
    Failed { error: WidgetError, restored: bool },
}

type ReadAloudFactory<S, I> = Box<dyn FnMut() -> (S, I)>;

/// One reading session over a widget factory and an optional speech service
pub struct ReaderSession<F, S = NullSpeech, I = NoIndicator>
where
    F: FlipWidgetFactory,
    S: SpeechService,
    I: SpeakingIndicator,
{
    config: ReaderConfig,
    compose_options: ComposeOptions,
    adapter: FlipAdapter<F>,
    reconciler: Reconciler,
    document: Option<BookDocument>,
    pages: Vec<PageDescriptor>,
    mode: LayoutMode,
    viewport: Viewport,
    read_aloud_factory: Option<ReadAloudFactory<S, I>>,
    read_aloud: Option<ReadAloudController<S, I>>,
    tone: Tone,
}

impl<F: FlipWidgetFactory> ReaderSession<F> {
    /// Session without read-aloud support
    pub fn new(factory: F, config: ReaderConfig) -> Self {
        Self::build(factory, config, None)
    }
}

impl<F, S, I> ReaderSession<F, S, I>
where
    F: FlipWidgetFactory,
    S: SpeechService,
    I: SpeakingIndicator,
{
    /// Session whose read-aloud controller is built on first use by `make_read_aloud`
    pub fn with_read_aloud(
        factory: F,
        config: ReaderConfig,
        make_read_aloud: impl FnMut() -> (S, I) + 'static,
    ) -> Self {
        Self::build(factory, config, Some(Box::new(make_read_aloud)))
    }

    fn build(factory: F, config: ReaderConfig, read_aloud_factory: Option<ReadAloudFactory<S, I>>) -> Self {
        let config = config.normalized();
        Self {
            compose_options: ComposeOptions::from(&config),
            reconciler: Reconciler::from_config(&config),
            tone: config.tone,
            config,
            adapter: FlipAdapter::new(factory),
            document: None,
            pages: Vec::new(),
            mode: LayoutMode::Standard,
            viewport: Viewport::new(0.0, 0.0),
            read_aloud_factory,
            read_aloud: None,
        }
    }

    /// Open a loaded book at the given viewport
    ///
    /// On error the session is left closed: no document, no pages, no widget.
    pub fn open(&mut self, document: BookDocument, viewport: Viewport) -> Result<u64, WidgetError> {
        self.drop_read_aloud();
        self.reconciler.cancel();

        let mode = classify_viewport(viewport, self.config.mobile_breakpoint_px);
        let pages = compose_with(&document, mode, &self.compose_options);
        log::info!("opening '{}' at {} ({} mode)", document.title, viewport, mode);

        match self.adapter.initialize(&pages, mode, viewport) {
            Ok(generation) => {
                self.document = Some(document);
                self.pages = pages;
                self.mode = mode;
                self.viewport = viewport;
                Ok(generation)
            }
            Err(e) => {
                log::error!("could not display '{}': {}", document.title, e);
                self.close();
                Err(e)
            }
        }
    }

    /// Close the book: widget torn down, narration stopped
    pub fn close(&mut self) {
        self.drop_read_aloud();
        self.reconciler.cancel();
        self.adapter.teardown();
        self.document = None;
        self.pages.clear();
    }

    /// Record a raw resize; returns when the burst may settle
    pub fn on_resize(&mut self, viewport: Viewport, now_ms: f64) -> f64 {
        self.reconciler.on_resize(viewport, now_ms)
    }

    /// Run reconciliation if a resize burst has settled by `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> Option<ReconcileOutcome> {
        let current = self.document.as_ref().map(|_| self.mode);
        let plan = self.reconciler.poll(now_ms, current)?;
        Some(self.reconcile(plan))
    }

    /// Run the pending reconciliation now, without checking the clock
    ///
    /// For timers armed from `on_resize`'s deadline, whose own clock may read
    /// slightly earlier than the one that set it.
    pub fn settle(&mut self) -> Option<ReconcileOutcome> {
        let current = self.document.as_ref().map(|_| self.mode);
        let plan = self.reconciler.flush(current)?;
        Some(self.reconcile(plan))
    }

    /// Apply a reconcile plan
    pub fn reconcile(&mut self, plan: ReconcilePlan) -> ReconcileOutcome {
        let Some(document) = self.document.as_ref() else {
            return ReconcileOutcome::NoDocument;
        };
        if !plan.recompose {
            log::debug!("settled resize at {} keeps {} layout", plan.viewport, self.mode);
            self.viewport = plan.viewport;
            return ReconcileOutcome::Unchanged;
        }

        let pages = compose_with(document, plan.mode, &self.compose_options);
        match self.adapter.initialize(&pages, plan.mode, plan.viewport) {
            Ok(generation) => {
                if plan.mode_changed {
                    log::info!("layout {} -> {}", self.mode, plan.mode);
                }
                self.drop_read_aloud();
                self.pages = pages;
                self.mode = plan.mode;
                self.viewport = plan.viewport;
                ReconcileOutcome::Recomposed {
                    generation,
                    mode: plan.mode,
                }
            }
            Err(error) => {
                log::error!("reconciliation at {} failed: {}", plan.viewport, error);
                let restored = self.restore_previous();
                ReconcileOutcome::Failed { error, restored }
            }
        }
    }

    fn restore_previous(&mut self) -> bool {
        if self.adapter.is_live() {
            return true;
        }
        match self.adapter.initialize(&self.pages, self.mode, self.viewport) {
            Ok(generation) => {
                log::warn!("restored previous {} layout as widget #{}", self.mode, generation);
                true
            }
            Err(e) => {
                log::error!("could not restore previous layout: {}", e);
                false
            }
        }
    }

    /// Forward navigation to the widget; false if none is live
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        self.adapter.navigate(direction)
    }

    /// Widget flip notification; stops and discards read-aloud when accepted
    pub fn on_flip(&mut self, generation: u64, current_index: usize) -> Option<FlipEvent> {
        let event = self.adapter.on_flip(generation, current_index)?;
        self.drop_read_aloud();
        Some(event)
    }

    pub fn play(&mut self) -> Result<ReadAloudState, ReadAloudError> {
        let index = self.current_index();
        let pages = &self.pages;
        let controller = Self::ensure_read_aloud(
            &mut self.read_aloud,
            &mut self.read_aloud_factory,
            &self.config,
            self.tone,
        )?;
        controller.play(pages, index)
    }

    /// Play, pause or resume depending on the current state
    pub fn toggle_read_aloud(&mut self) -> Result<ReadAloudState, ReadAloudError> {
        let index = self.current_index();
        let pages = &self.pages;
        let controller = Self::ensure_read_aloud(
            &mut self.read_aloud,
            &mut self.read_aloud_factory,
            &self.config,
            self.tone,
        )?;
        controller.toggle(pages, index)
    }

    pub fn pause(&mut self) -> ReadAloudState {
        self.read_aloud.as_mut().map_or(ReadAloudState::Idle, |c| c.pause())
    }

    pub fn resume(&mut self) -> ReadAloudState {
        self.read_aloud.as_mut().map_or(ReadAloudState::Idle, |c| c.resume())
    }

    pub fn stop(&mut self) -> ReadAloudState {
        self.read_aloud.as_mut().map_or(ReadAloudState::Idle, |c| c.stop())
    }

    pub fn on_utterance_end(&mut self, id: u64) -> ReadAloudState {
        self.read_aloud
            .as_mut()
            .map_or(ReadAloudState::Idle, |c| c.on_utterance_end(id))
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
        if let Some(controller) = self.read_aloud.as_mut() {
            controller.set_tone(tone);
        }
    }

    pub fn read_aloud_state(&self) -> ReadAloudState {
        self.read_aloud.as_ref().map_or(ReadAloudState::Idle, |c| c.state())
    }

    /// True if a controller exists (it is created on first use)
    pub fn has_read_aloud(&self) -> bool {
        self.read_aloud.is_some()
    }

    fn ensure_read_aloud<'a>(
        slot: &'a mut Option<ReadAloudController<S, I>>,
        factory: &mut Option<ReadAloudFactory<S, I>>,
        config: &ReaderConfig,
        tone: Tone,
    ) -> Result<&'a mut ReadAloudController<S, I>, ReadAloudError> {
        if slot.is_none() {
            let make = factory.as_mut().ok_or(ReadAloudError::SynthesisUnavailable)?;
            let (speech, indicator) = make();
            let settings = ReadAloudSettings {
                tone,
                ..ReadAloudSettings::from(config)
            };
            *slot = Some(ReadAloudController::new(speech, indicator, settings));
        }
        slot.as_mut().ok_or(ReadAloudError::SynthesisUnavailable)
    }

    fn drop_read_aloud(&mut self) {
        if let Some(mut controller) = self.read_aloud.take() {
            controller.stop();
        }
    }

    pub fn document(&self) -> Option<&BookDocument> {
        self.document.as_ref()
    }

    /// Title for the hosting page
    pub fn title(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.title.as_str())
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn current_index(&self) -> usize {
        self.adapter.current_index().unwrap_or(0)
    }

    pub fn resize_deadline(&self) -> Option<f64> {
        self.reconciler.deadline()
    }

    pub fn adapter(&self) -> &FlipAdapter<F> {
        &self.adapter
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}
