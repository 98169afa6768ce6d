//! Flip-widget adapter
//!
//! The page-turn widget is an external component with a replace-not-mutate
//! lifecycle. `FlipAdapter` owns at most one live instance: `initialize` tears
//! the old one down before building a new one from a freshly composed page
//! sequence, and there is no path that patches a live instance's pages.
//!
//! Each instance gets a generation number. Flip notifications carry the
//! generation of the instance that raised them, so late events from a
//! replaced instance are dropped instead of being attributed to the new one.

pub mod config;

pub use config::{SizingMode, WidgetConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{LayoutMode, PageDescriptor, Viewport};

/// Widget lifecycle failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("invalid widget configuration: {0}")]
    InvalidConfig(String),

    #[error("widget construction failed: {0}")]
    Construction(String),

    #[error("widget rejected pages: {0}")]
    LoadPages(String),
}

/// Navigation request
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NavDirection {
    Previous,
    Next,
}

/// Accepted page-flip notification
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlipEvent {
    pub generation: u64,
    pub current_index: usize,
}

/// One live page-flip widget instance
pub trait FlipWidget {
    /// Load the full page sequence into a freshly built instance
    fn load_pages(&mut self, pages: &[PageDescriptor]) -> Result<(), WidgetError>;
    fn flip_next(&mut self);
    fn flip_prev(&mut self);
    /// Release the instance and its rendering surface
    fn destroy(&mut self);
}

/// Builds widget instances
pub trait FlipWidgetFactory {
    type Widget: FlipWidget;

    /// Construct an instance. `generation` must be attached to every flip
    /// notification the instance raises.
    fn create(&mut self, config: &WidgetConfig, generation: u64) -> Result<Self::Widget, WidgetError>;
}

struct LiveWidget<W> {
    widget: W,
    generation: u64,
    mode: LayoutMode,
    config: WidgetConfig,
    page_count: usize,
    current_index: usize,
}

/// Owner of the single live widget instance
pub struct FlipAdapter<F: FlipWidgetFactory> {
    factory: F,
    live: Option<LiveWidget<F::Widget>>,
    last_generation: u64,
}

impl<F: FlipWidgetFactory> FlipAdapter<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            live: None,
            last_generation: 0,
        }
    }

    /// Replace the live instance with one built for `mode` and loaded with `pages`
    ///
    /// The old instance is destroyed first. On error no instance is live.
    pub fn initialize(
        &mut self,
        pages: &[PageDescriptor],
        mode: LayoutMode,
        viewport: Viewport,
    ) -> Result<u64, WidgetError> {
        let config = WidgetConfig::for_layout(mode, viewport);
        config.validate()?;

        self.teardown();

        self.last_generation += 1;
        let generation = self.last_generation;

        let mut widget = self.factory.create(&config, generation)?;
        if let Err(err) = widget.load_pages(pages) {
            widget.destroy();
            return Err(err);
        }

        log::info!(
            "flip widget #{} initialized: {} pages, {} mode, {}x{}",
            generation,
            pages.len(),
            mode,
            config.width,
            config.height
        );

        self.live = Some(LiveWidget {
            widget,
            generation,
            mode,
            config,
            page_count: pages.len(),
            current_index: 0,
        });
        Ok(generation)
    }

    /// Forward a navigation request; returns false when no instance is live
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        match self.live.as_mut() {
            Some(live) => {
                match direction {
                    NavDirection::Next => live.widget.flip_next(),
                    NavDirection::Previous => live.widget.flip_prev(),
                }
                true
            }
            None => {
                log::debug!("navigation {:?} ignored: no live widget", direction);
                false
            }
        }
    }

    /// Accept a flip notification from the widget
    ///
    /// Returns `None` for notifications raised by an instance that has since
    /// been replaced or destroyed.
    pub fn on_flip(&mut self, generation: u64, current_index: usize) -> Option<FlipEvent> {
        let live = self.live.as_mut().filter(|live| live.generation == generation);
        match live {
            Some(live) => {
                live.current_index = current_index.min(live.page_count.saturating_sub(1));
                Some(FlipEvent {
                    generation,
                    current_index: live.current_index,
                })
            }
            None => {
                log::debug!("stale flip from widget #{} dropped", generation);
                None
            }
        }
    }

    /// Destroy the live instance, if any
    pub fn teardown(&mut self) {
        if let Some(mut live) = self.live.take() {
            log::debug!("destroying flip widget #{}", live.generation);
            live.widget.destroy();
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.live.as_ref().map(|live| live.generation)
    }

    pub fn mode(&self) -> Option<LayoutMode> {
        self.live.as_ref().map(|live| live.mode)
    }

    pub fn config(&self) -> Option<&WidgetConfig> {
        self.live.as_ref().map(|live| &live.config)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.live.as_ref().map(|live| live.current_index)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: FlipWidgetFactory> Drop for FlipAdapter<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
