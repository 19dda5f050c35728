//! Lifecycle behaviour of the panel under simulated time: first fetch on
//! attach, repeated polling at the configured cadence, recovery after a
//! failed cycle, and silence after detach.

use async_trait::async_trait;
use serde_json::{json, Value};
use status_panel::render::{render, Node};
use status_panel::{
    FetchError, PanelConfig, PanelError, PanelState, RawPanelConfig, StatusPanel, StatusSource,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source that replays queued responses, then repeats a final one, while
/// counting every fetch issued against it.
struct ScriptedSource {
    calls: AtomicUsize,
    queued: Mutex<VecDeque<Result<Value, FetchError>>>,
    repeat: Result<Value, FetchError>,
}

impl ScriptedSource {
    fn repeating(repeat: Result<Value, FetchError>) -> Arc<Self> {
        Self::sequence(Vec::new(), repeat)
    }

    fn sequence(
        queued: Vec<Result<Value, FetchError>>,
        repeat: Result<Value, FetchError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            queued: Mutex::new(queued.into()),
            repeat,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut queued = self.queued.lock().expect("queue lock");
        queued.pop_front().unwrap_or_else(|| self.repeat.clone())
    }
}

fn one_minute_panel(source: Arc<ScriptedSource>) -> StatusPanel {
    let config = PanelConfig::try_from(RawPanelConfig {
        endpoint: Some("https://x/api".to_string()),
        poll_interval_minutes: None,
    })
    .expect("config should be accepted");
    StatusPanel::with_source(config, source)
}

/// Let the paused runtime drive the spawned poll task.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[test]
fn missing_endpoint_fails_before_any_network_activity() {
    let result = PanelConfig::try_from(RawPanelConfig::default());
    assert!(matches!(result, Err(PanelError::Configuration(_))));
}

#[tokio::test(start_paused = true)]
async fn first_fetch_is_issued_immediately_on_attach() {
    let source = ScriptedSource::repeating(Ok(json!([])));
    let mut panel = one_minute_panel(Arc::clone(&source));
    assert_eq!(source.call_count(), 0);

    panel.attach();
    settle().await;

    assert_eq!(source.call_count(), 1);
    assert_eq!(panel.state(), PanelState::Empty);
}

#[tokio::test(start_paused = true)]
async fn polls_once_per_interval_tick() {
    let source = ScriptedSource::repeating(Ok(json!([])));
    let mut panel = one_minute_panel(Arc::clone(&source));
    panel.attach();
    settle().await;
    assert_eq!(source.call_count(), 1);

    // Three further minutes pass: three further cycles.
    tokio::time::sleep(Duration::from_secs(185)).await;
    assert_eq!(source.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn detach_stops_all_polling() {
    let source = ScriptedSource::repeating(Ok(json!([])));
    let mut panel = one_minute_panel(Arc::clone(&source));
    panel.attach();
    settle().await;
    assert_eq!(source.call_count(), 1);

    panel.detach();
    assert!(!panel.is_attached());

    // Several poll intervals later, no further request was issued.
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(source.call_count(), 1);

    // Detach is idempotent.
    panel.detach();
}

#[tokio::test(start_paused = true)]
async fn failed_cycle_shows_error_and_next_tick_recovers() {
    let source = ScriptedSource::sequence(
        vec![Err(FetchError::HttpStatus(500))],
        Ok(json!([{"tracking_number": "A1", "status": "in transit"}])),
    );
    let mut panel = one_minute_panel(Arc::clone(&source));
    panel.attach();
    settle().await;

    let PanelState::Failed(message) = panel.state() else {
        panic!("expected failed state, got {:?}", panel.state());
    };
    assert!(message.contains("HTTP error: 500"));

    // No backoff: the next tick simply retries.
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(matches!(panel.state(), PanelState::Rendered(_)));
}

#[tokio::test(start_paused = true)]
async fn transport_failure_surfaces_the_underlying_message() {
    let source = ScriptedSource::repeating(Err(FetchError::Transport(
        "connection refused".to_string(),
    )));
    let mut panel = one_minute_panel(source);
    panel.attach();
    settle().await;

    assert_eq!(
        panel.state(),
        PanelState::Failed("connection refused".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn end_to_end_single_record_renders_one_plain_row() {
    let source = ScriptedSource::repeating(Ok(
        json!([{"tracking_number": "A1", "status": "in transit"}]),
    ));
    let mut panel = one_minute_panel(source);
    panel.attach();
    settle().await;

    let tree = render(&panel.state());
    let Node::Rows(rows) = tree.body() else {
        panic!("expected rows, got {:?}", tree.body());
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "A1");
    assert_eq!(rows[0].status, "in transit");
    assert_eq!(rows[0].progress_percent, None);
}

#[tokio::test(start_paused = true)]
async fn non_array_payload_degrades_to_fallback_display() {
    let source = ScriptedSource::repeating(Ok(json!({"detail": "maintenance"})));
    let mut panel = one_minute_panel(source);
    panel.attach();
    settle().await;

    let tree = render(&panel.state());
    let Node::Preformatted(text) = tree.body() else {
        panic!("expected preformatted block, got {:?}", tree.body());
    };
    assert!(text.contains("maintenance"));
}

#[tokio::test(start_paused = true)]
async fn reattach_after_detach_resumes_polling() {
    let source = ScriptedSource::repeating(Ok(json!([])));
    let mut panel = one_minute_panel(Arc::clone(&source));
    panel.attach();
    settle().await;
    panel.detach();

    panel.attach();
    settle().await;
    assert_eq!(source.call_count(), 2);
    assert!(panel.is_attached());
}
