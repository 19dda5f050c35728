use crate::config::PanelConfig;
use crate::source::{HttpSource, StatusSource};
use crate::state::PanelState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Shared handle onto a panel's current display state.
pub type SharedPanelState = Arc<Mutex<PanelState>>;

/// A shipment status panel.
///
/// Owns a validated configuration and, while attached, exactly one
/// repeating timer driving fetch-and-classify cycles. Instances are
/// fully independent of each other.
pub struct StatusPanel {
    config: PanelConfig,
    source: Arc<dyn StatusSource>,
    state: SharedPanelState,
    poll_task: Option<JoinHandle<()>>,
}

impl StatusPanel {
    pub fn new(config: PanelConfig) -> Self {
        let source = Arc::new(HttpSource::new(config.endpoint()));
        Self::with_source(config, source)
    }

    /// Construct against an alternative data source implementation.
    pub fn with_source(config: PanelConfig, source: Arc<dyn StatusSource>) -> Self {
        Self {
            config,
            source,
            state: Arc::new(Mutex::new(PanelState::Loading)),
            poll_task: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> PanelState {
        self.state
            .lock()
            .expect("should be able to lock panel state")
            .clone()
    }

    /// Handle for observers that redraw on their own cadence.
    pub fn state_handle(&self) -> SharedPanelState {
        Arc::clone(&self.state)
    }

    pub fn is_attached(&self) -> bool {
        self.poll_task.is_some()
    }

    /// Enter the active lifecycle: show the loading placeholder, issue
    /// the first fetch at once, then poll at the configured cadence.
    ///
    /// Cycles are single-flight; a tick that would fire while a fetch is
    /// still outstanding is skipped rather than queued.
    pub fn attach(&mut self) {
        if self.poll_task.is_some() {
            return;
        }

        *self
            .state
            .lock()
            .expect("should be able to lock panel state") = PanelState::Loading;

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let poll_interval = self.config.poll_interval();
        self.poll_task = Some(tokio::spawn(poll_loop(source, state, poll_interval)));
    }

    /// Disarm the timer. No further fetches occur afterwards; an
    /// in-flight response is discarded. Idempotent.
    pub fn detach(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

impl Drop for StatusPanel {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn poll_loop(
    source: Arc<dyn StatusSource>,
    state: SharedPanelState,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // The first tick completes immediately.
        ticker.tick().await;
        run_cycle(source.as_ref(), &state).await;
    }
}

/// One fetch-and-render attempt. Every runtime error is converted into
/// the failed display state here; nothing propagates.
async fn run_cycle(source: &dyn StatusSource, state: &Mutex<PanelState>) {
    let next = match source.fetch().await {
        Ok(payload) => {
            debug!("poll cycle succeeded");
            PanelState::from_payload(payload)
        }
        Err(error) => {
            warn!("poll cycle failed: {error}");
            PanelState::Failed(error.to_string())
        }
    };

    *state.lock().expect("should be able to lock panel state") = next;
}
