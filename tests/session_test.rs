// Reader session: open, resize reconciliation, navigation and flips

mod common;

use common::{count, new_log, sample_book, Event, RecordingFactory};
use storybook_wasm::config::{ReaderConfig, ReconcilePolicy};
use storybook_wasm::loader::{BookLoader, FetchResponse, ResourceFetcher};
use storybook_wasm::models::{BookDocument, LayoutMode, PageKind, Viewport};
use storybook_wasm::session::{ReaderSession, ReconcileOutcome};
use storybook_wasm::widget::NavDirection;

fn open_session(config: ReaderConfig, viewport: Viewport) -> (ReaderSession<RecordingFactory>, RecordingFactory) {
    let factory = RecordingFactory::new(new_log());
    let mut session = ReaderSession::new(factory.clone(), config);
    session.open(sample_book(), viewport).expect("book opens");
    (session, factory)
}

#[test]
fn test_open_builds_one_widget() {
    let (session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    assert_eq!(session.mode(), LayoutMode::Standard);
    assert_eq!(session.pages().len(), 2 + 6);
    assert_eq!(session.title(), Some("Moon Walk"));
    assert_eq!(factory.creates(), 1);
    assert_eq!(
        count(&factory.log, |e| matches!(e, Event::Load { pages: 8, .. })),
        1
    );
}

struct FixedFetcher(&'static str);

impl ResourceFetcher for FixedFetcher {
    fn fetch(&self, _identifier: &str) -> Result<FetchResponse, String> {
        Ok(FetchResponse::ok(self.0))
    }
}

/// Load then open, stopping at the first failure
fn load_and_open(
    session: &mut ReaderSession<RecordingFactory>,
    body: &'static str,
    viewport: Viewport,
) -> Result<u64, String> {
    let document = BookLoader::new(FixedFetcher(body))
        .load("book.json")
        .map_err(|e| e.to_string())?;
    session.open(document, viewport).map_err(|e| e.to_string())
}

#[test]
fn test_invalid_book_never_reaches_the_widget() {
    let factory = RecordingFactory::new(new_log());
    let mut session = ReaderSession::new(factory.clone(), ReaderConfig::default());

    let err = load_and_open(&mut session, r#"{"pages":[{"text":"orphan"}]}"#, Viewport::new(1024.0, 768.0))
        .expect_err("title missing");
    assert!(err.starts_with("Error loading book data: Invalid book format."));
    assert!(session.document().is_none());
    assert!(factory.log.borrow().is_empty());

    load_and_open(&mut session, r#"{"title":"Nuh","pages":[]}"#, Viewport::new(1024.0, 768.0))
        .expect("valid book opens");
    assert_eq!(factory.creates(), 1);
    assert_eq!(session.pages().len(), 6);
}

#[test]
fn test_failed_open_closes_previous_book() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    // Compact sizing pins the widget height to the viewport, so 0 is rejected
    let result = session.open(BookDocument::new("Other"), Viewport::new(375.0, 0.0));
    assert!(result.is_err());

    assert_eq!(session.title(), None);
    assert!(session.pages().is_empty());
    assert!(!session.adapter().is_live());
    assert_eq!(factory.destroys(), 1);
    assert!(!session.navigate(NavDirection::Next));
    assert!(session.on_flip(1, 3).is_none());
}

#[test]
fn test_failed_open_is_not_reconciled() {
    let config = ReaderConfig {
        reconcile_policy: ReconcilePolicy::OnModeChange,
        ..ReaderConfig::default()
    };
    let factory = RecordingFactory::new(new_log());
    let mut session = ReaderSession::new(factory.clone(), config);

    factory.fail_create.set(true);
    assert!(session.open(sample_book(), Viewport::new(1024.0, 768.0)).is_err());
    factory.fail_create.set(false);

    session.on_resize(Viewport::new(1200.0, 800.0), 0.0);
    assert_eq!(session.poll(400.0), Some(ReconcileOutcome::NoDocument));
    assert!(!session.adapter().is_live());

    // Reopening after the failure works normally
    session.open(sample_book(), Viewport::new(1200.0, 800.0)).expect("book opens");
    assert_eq!(session.mode(), LayoutMode::Standard);
    assert_eq!(session.viewport(), Viewport::new(1200.0, 800.0));
    assert!(session.adapter().is_live());
}

#[test]
fn test_settle_runs_pending_resize_before_deadline() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    session.on_resize(Viewport::new(375.0, 812.0), 1_000.4);
    // A timer clock reading just under the deadline would find nothing due
    assert_eq!(session.poll(1_299.9), None);

    let outcome = session.settle().expect("pending resize");
    assert!(matches!(outcome, ReconcileOutcome::Recomposed { mode: LayoutMode::Compact, .. }));
    assert_eq!(factory.creates(), 2);
    assert_eq!(session.resize_deadline(), None);
    assert_eq!(session.settle(), None);
}

#[test]
fn test_settled_resize_across_breakpoint_recomposes_once() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    session.on_resize(Viewport::new(375.0, 812.0), 1_000.0);
    assert_eq!(session.poll(1_100.0), None, "still inside the quiet interval");

    let outcome = session.poll(1_300.0).expect("settled");
    assert_eq!(
        outcome,
        ReconcileOutcome::Recomposed {
            generation: 2,
            mode: LayoutMode::Compact
        }
    );
    assert_eq!(session.mode(), LayoutMode::Compact);
    assert_eq!(session.pages().len(), 2 * 2 + 6);
    assert_eq!(session.pages()[2].kind, PageKind::Image);

    assert_eq!(factory.creates(), 2);
    assert_eq!(factory.destroys(), 1);
    assert_eq!(session.poll(5_000.0), None);
}

#[test]
fn test_resize_burst_reconciles_once() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    let mut now = 0.0;
    for width in [1000.0, 900.0, 800.0, 700.0, 600.0, 500.0, 400.0] {
        session.on_resize(Viewport::new(width, 800.0), now);
        assert_eq!(session.poll(now + 100.0), None);
        now += 100.0;
    }

    assert!(session.poll(now + 300.0).is_some());
    assert_eq!(factory.creates(), 2);
    assert_eq!(session.viewport(), Viewport::new(400.0, 800.0));
}

#[test]
fn test_policy_on_mode_change_skips_same_mode_resize() {
    let config = ReaderConfig {
        reconcile_policy: ReconcilePolicy::OnModeChange,
        ..ReaderConfig::default()
    };
    let (mut session, factory) = open_session(config, Viewport::new(1024.0, 768.0));

    session.on_resize(Viewport::new(1280.0, 900.0), 0.0);
    assert_eq!(session.poll(400.0), Some(ReconcileOutcome::Unchanged));
    assert_eq!(factory.creates(), 1);
    assert_eq!(session.viewport(), Viewport::new(1280.0, 900.0));
}

#[test]
fn test_policy_always_rebuilds_on_same_mode_resize() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    session.on_resize(Viewport::new(1280.0, 900.0), 0.0);
    let outcome = session.poll(400.0).expect("settled");
    assert!(matches!(outcome, ReconcileOutcome::Recomposed { mode: LayoutMode::Standard, .. }));
    assert_eq!(factory.creates(), 2);
}

#[test]
fn test_failed_reconcile_restores_previous_layout() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));
    let before = session.pages().to_vec();

    factory.fail_loads.set(1);
    session.on_resize(Viewport::new(375.0, 812.0), 0.0);

    match session.poll(400.0).expect("settled") {
        ReconcileOutcome::Failed { restored, .. } => assert!(restored),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(session.pages(), before.as_slice());
    assert_eq!(session.mode(), LayoutMode::Standard);
    assert!(session.adapter().is_live());
    assert_eq!(session.adapter().mode(), Some(LayoutMode::Standard));
    // original, failed attempt, restored instance
    assert_eq!(factory.creates(), 3);
}

#[test]
fn test_failed_restore_leaves_no_widget() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    factory.fail_loads.set(2);
    session.on_resize(Viewport::new(375.0, 812.0), 0.0);

    match session.poll(400.0).expect("settled") {
        ReconcileOutcome::Failed { restored, .. } => assert!(!restored),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!session.adapter().is_live());
    assert!(!session.navigate(NavDirection::Next));
}

#[test]
fn test_reconcile_without_document() {
    let factory = RecordingFactory::new(new_log());
    let mut session = ReaderSession::new(factory.clone(), ReaderConfig::default());

    session.on_resize(Viewport::new(375.0, 812.0), 0.0);
    assert_eq!(session.poll(400.0), Some(ReconcileOutcome::NoDocument));
    assert_eq!(factory.creates(), 0);
}

#[test]
fn test_navigation_and_stale_flips() {
    let (mut session, factory) = open_session(ReaderConfig::default(), Viewport::new(1024.0, 768.0));

    assert!(session.navigate(NavDirection::Next));
    assert_eq!(count(&factory.log, |e| *e == Event::Next { generation: 1 }), 1);

    assert!(session.on_flip(1, 2).is_some());
    assert_eq!(session.current_index(), 2);

    session.on_resize(Viewport::new(375.0, 812.0), 0.0);
    session.poll(400.0);

    assert!(session.on_flip(1, 5).is_none(), "event from the replaced widget");
    assert_eq!(session.current_index(), 0);

    session.close();
    assert!(!session.navigate(NavDirection::Previous));
    assert_eq!(factory.destroys(), 2);
}
