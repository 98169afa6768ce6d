//! Resize reconciliation
//!
//! Raw resize events only record the latest viewport and push a deadline
//! forward. Once the viewport has been quiet for the full interval, `poll`
//! hands back a single settled resize, and `plan` decides whether it needs a
//! recompose + widget reinitialize.
//!
//! Time is passed in explicitly (milliseconds, e.g. `performance.now()`), so
//! the loop can be driven by synthetic events in tests and by a single-fire
//! timer in the browser.

use crate::config::{ReconcilePolicy, MOBILE_BREAKPOINT_PX, RESIZE_QUIET_INTERVAL_MS};
use crate::models::{LayoutMode, Viewport};
use crate::viewport::classify_viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    viewport: Viewport,
    deadline_ms: f64,
    events: usize,
}

/// A resize burst that has gone quiet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledResize {
    /// Viewport from the last event of the burst
    pub viewport: Viewport,
    /// How many raw events the burst collapsed
    pub events: usize,
}

/// What a settled resize should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilePlan {
    pub viewport: Viewport,
    pub mode: LayoutMode,
    pub mode_changed: bool,
    /// Recompose and reinitialize the widget
    pub recompose: bool,
}

/// Collapses resize bursts into one settled event
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet_interval_ms: f64,
    pending: Option<PendingResize>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_QUIET_INTERVAL_MS)
    }
}

impl ResizeDebouncer {
    pub fn new(quiet_interval_ms: f64) -> Self {
        Self {
            quiet_interval_ms,
            pending: None,
        }
    }

    /// Record a raw resize event; returns the new firing deadline
    pub fn on_resize(&mut self, viewport: Viewport, now_ms: f64) -> f64 {
        let deadline_ms = now_ms + self.quiet_interval_ms;
        let events = self.pending.map_or(0, |p| p.events) + 1;
        self.pending = Some(PendingResize {
            viewport,
            deadline_ms,
            events,
        });
        deadline_ms
    }

    /// Take the settled resize once its quiet interval has elapsed
    pub fn poll(&mut self, now_ms: f64) -> Option<SettledResize> {
        match self.pending {
            Some(pending) if now_ms >= pending.deadline_ms => {
                self.pending = None;
                Some(SettledResize {
                    viewport: pending.viewport,
                    events: pending.events,
                })
            }
            _ => None,
        }
    }

    /// Take the pending resize regardless of its deadline
    pub fn flush(&mut self) -> Option<SettledResize> {
        self.pending.take().map(|pending| SettledResize {
            viewport: pending.viewport,
            events: pending.events,
        })
    }

    /// Deadline of the pending burst, if any
    pub fn deadline(&self) -> Option<f64> {
        self.pending.map(|p| p.deadline_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending burst without firing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn quiet_interval_ms(&self) -> f64 {
        self.quiet_interval_ms
    }
}

/// Debouncer plus the classification and policy applied to settled bursts
#[derive(Debug, Clone)]
pub struct Reconciler {
    debouncer: ResizeDebouncer,
    policy: ReconcilePolicy,
    breakpoint_px: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(RESIZE_QUIET_INTERVAL_MS, ReconcilePolicy::Always, MOBILE_BREAKPOINT_PX)
    }
}

impl Reconciler {
    pub fn new(quiet_interval_ms: f64, policy: ReconcilePolicy, breakpoint_px: f64) -> Self {
        Self {
            debouncer: ResizeDebouncer::new(quiet_interval_ms),
            policy,
            breakpoint_px,
        }
    }

    pub fn from_config(config: &crate::config::ReaderConfig) -> Self {
        Self::new(
            config.resize_quiet_interval_ms,
            config.reconcile_policy,
            config.mobile_breakpoint_px,
        )
    }

    pub fn on_resize(&mut self, viewport: Viewport, now_ms: f64) -> f64 {
        self.debouncer.on_resize(viewport, now_ms)
    }

    /// Settle the pending burst, if due, into a plan against `current_mode`
    pub fn poll(&mut self, now_ms: f64, current_mode: Option<LayoutMode>) -> Option<ReconcilePlan> {
        let settled = self.debouncer.poll(now_ms)?;
        log::debug!(
            "resize settled at {} after {} events",
            settled.viewport,
            settled.events
        );
        Some(self.plan(settled.viewport, current_mode))
    }

    /// Settle the pending burst now, whether or not its deadline has passed
    pub fn flush(&mut self, current_mode: Option<LayoutMode>) -> Option<ReconcilePlan> {
        let settled = self.debouncer.flush()?;
        log::debug!("resize flushed at {} after {} events", settled.viewport, settled.events);
        Some(self.plan(settled.viewport, current_mode))
    }

    /// Classify `viewport` and apply the reconcile policy
    pub fn plan(&self, viewport: Viewport, current_mode: Option<LayoutMode>) -> ReconcilePlan {
        let mode = classify_viewport(viewport, self.breakpoint_px);
        let mode_changed = current_mode != Some(mode);
        let recompose = match self.policy {
            ReconcilePolicy::Always => true,
            ReconcilePolicy::OnModeChange => mode_changed,
        };
        ReconcilePlan {
            viewport,
            mode,
            mode_changed,
            recompose,
        }
    }

    pub fn deadline(&self) -> Option<f64> {
        self.debouncer.deadline()
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn breakpoint_px(&self) -> f64 {
        self.breakpoint_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_collapses_to_one_settle() {
        let mut debouncer = ResizeDebouncer::default();
        for i in 0..10 {
            debouncer.on_resize(Viewport::new(1000.0 - i as f64 * 10.0, 700.0), i as f64 * 50.0);
        }
        // Last event at 450ms, so nothing fires before 750ms
        assert_eq!(debouncer.poll(700.0), None);
        let settled = debouncer.poll(750.0).unwrap();
        assert_eq!(settled.events, 10);
        assert_eq!(settled.viewport, Viewport::new(910.0, 700.0));
        assert_eq!(debouncer.poll(2000.0), None);
    }

    #[test]
    fn test_new_event_pushes_deadline() {
        let mut debouncer = ResizeDebouncer::default();
        assert_eq!(debouncer.on_resize(Viewport::new(800.0, 600.0), 0.0), 300.0);
        assert_eq!(debouncer.on_resize(Viewport::new(700.0, 600.0), 299.0), 599.0);
        assert_eq!(debouncer.poll(300.0), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = ResizeDebouncer::default();
        debouncer.on_resize(Viewport::new(800.0, 600.0), 0.0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(1000.0), None);
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let mut debouncer = ResizeDebouncer::default();
        debouncer.on_resize(Viewport::new(375.0, 812.0), 1000.4);
        // A coarser clock at firing can read just under the deadline
        assert_eq!(debouncer.poll(1299.9), None);

        let settled = debouncer.flush().unwrap();
        assert_eq!(settled.viewport, Viewport::new(375.0, 812.0));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_reconciler_flush_plans_pending_burst() {
        let mut reconciler = Reconciler::default();
        assert_eq!(reconciler.flush(Some(LayoutMode::Standard)), None);

        reconciler.on_resize(Viewport::new(375.0, 812.0), 0.0);
        let plan = reconciler.flush(Some(LayoutMode::Standard)).unwrap();
        assert_eq!(plan.mode, LayoutMode::Compact);
        assert!(plan.recompose);
        assert_eq!(reconciler.deadline(), None);
    }

    #[test]
    fn test_always_policy_recomposes_without_mode_change() {
        let reconciler = Reconciler::default();
        let plan = reconciler.plan(Viewport::new(1280.0, 800.0), Some(LayoutMode::Standard));
        assert!(!plan.mode_changed);
        assert!(plan.recompose);
    }

    #[test]
    fn test_mode_change_policy_skips_same_mode() {
        let reconciler = Reconciler::new(300.0, ReconcilePolicy::OnModeChange, 768.0);
        let same = reconciler.plan(Viewport::new(1280.0, 800.0), Some(LayoutMode::Standard));
        assert!(!same.recompose);

        let changed = reconciler.plan(Viewport::new(375.0, 812.0), Some(LayoutMode::Standard));
        assert_eq!(changed.mode, LayoutMode::Compact);
        assert!(changed.mode_changed);
        assert!(changed.recompose);
    }
}
