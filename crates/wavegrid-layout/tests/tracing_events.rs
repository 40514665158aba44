//! Structured logging emitted by the engine.
//!
//! Run with: `cargo test -p wavegrid-layout --test tracing_events`

use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use wavegrid_core::{GridPosition, Point, Rect, Size};
use wavegrid_layout::{FlowLayout, FlowLayoutConfig, SpringFlowLayout, SpringLayoutConfig};

// ============================================================================
// Capture layer
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<String>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn with_captured_tracing<F, R>(f: F) -> (R, Capture)
where
    F: FnOnce() -> R,
{
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

type Column = FlowLayout<fn(GridPosition) -> Size>;

fn square(_: GridPosition) -> Size {
    Size::square(100.0)
}

fn engine() -> SpringFlowLayout<Column> {
    let layout = FlowLayout::new(
        vec![20],
        square as fn(GridPosition) -> Size,
        FlowLayoutConfig::default(),
        140.0,
    );
    SpringFlowLayout::new(layout, Rect::new(0.0, 0.0, 140.0, 300.0), SpringLayoutConfig::default())
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn layout_pass_runs_in_span() {
    let (report, capture) = with_captured_tracing(|| engine().prepare_layout());
    assert!(report.added > 0);
    let spans = capture.spans.lock().unwrap();
    assert!(spans.iter().any(|name| name == "layout_pass"), "spans: {spans:?}");
    let events = capture.events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.level == Level::DEBUG && e.message.contains("springs reconciled"))
    );
}

#[test]
fn restore_logs_error() {
    let (result, capture) =
        with_captured_tracing(|| <SpringFlowLayout<Column>>::from_archive(b"state").is_err());
    assert!(result);
    let events = capture.events.lock().unwrap();
    assert!(events.iter().any(|e| e.level == Level::ERROR));
}

#[test]
fn idle_scroll_reports_static_fallback() {
    let ((), capture) = with_captured_tracing(|| {
        let mut engine = engine();
        engine.prepare_layout();
        assert!(engine.should_invalidate_for_bounds_change(
            Rect::new(0.0, 10.0, 140.0, 300.0),
            &None::<Point>,
        ));
    });
    let events = capture.events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.message.contains("host should relayout statically"))
    );
}

#[test]
fn drag_then_settle_logs_settle() {
    let ((), capture) = with_captured_tracing(|| {
        let mut engine = engine();
        engine.prepare_layout();
        assert!(!engine.should_invalidate_for_bounds_change(
            Rect::new(0.0, 25.0, 140.0, 300.0),
            &Point::new(70.0, 100.0),
        ));
        for _ in 0..60 * 20 {
            if engine.tick(std::time::Duration::from_millis(16)).settled {
                break;
            }
        }
    });
    let events = capture.events.lock().unwrap();
    assert!(events.iter().any(|e| e.message.contains("springs settled")));
}
