// Common test utilities and helpers
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use trade_dashboard::core::{PriceTick, SyncEvent};
use trade_dashboard::{
    Clock, Config, ControlView, DashboardApi, DashboardView, Position, StatusMessage,
    StrategyKind, Synchronizer,
};

pub const NOW: f64 = 1_700_000_000.0;

/// Clock the test moves by hand
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: f64) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock().unwrap() += secs;
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Price(PriceTick),
    Account(Position, Option<f64>),
    Controls(ControlView),
    Countdown(u64),
    Status(StatusMessage),
    ClearStatus,
    AutoTrading(bool),
    Strategy(StrategyKind),
}

/// View that remembers everything it was asked to show
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn controls(&self) -> Vec<ControlView> {
        self.events.iter().filter_map(|e| match e {
            ViewEvent::Controls(c) => Some(*c),
            _ => None,
        }).collect()
    }

    pub fn statuses(&self) -> Vec<StatusMessage> {
        self.events.iter().filter_map(|e| match e {
            ViewEvent::Status(s) => Some(s.clone()),
            _ => None,
        }).collect()
    }

    pub fn countdowns(&self) -> Vec<u64> {
        self.events.iter().filter_map(|e| match e {
            ViewEvent::Countdown(c) => Some(*c),
            _ => None,
        }).collect()
    }

    pub fn prices(&self) -> Vec<PriceTick> {
        self.events.iter().filter_map(|e| match e {
            ViewEvent::Price(p) => Some(p.clone()),
            _ => None,
        }).collect()
    }

    pub fn count_non_price(&self) -> usize {
        self.events.iter().filter(|e| !matches!(e, ViewEvent::Price(_))).count()
    }
}

impl DashboardView for RecordingView {
    fn render_price(&mut self, tick: &PriceTick) {
        self.events.push(ViewEvent::Price(tick.clone()));
    }

    fn render_account(&mut self, position: Position, balance: Option<f64>) {
        self.events.push(ViewEvent::Account(position, balance));
    }

    fn render_controls(&mut self, controls: &ControlView) {
        self.events.push(ViewEvent::Controls(*controls));
    }

    fn render_countdown(&mut self, remaining_secs: u64) {
        self.events.push(ViewEvent::Countdown(remaining_secs));
    }

    fn show_status(&mut self, status: &StatusMessage) {
        self.events.push(ViewEvent::Status(status.clone()));
    }

    fn clear_status(&mut self) {
        self.events.push(ViewEvent::ClearStatus);
    }

    fn render_auto_trading(&mut self, enabled: bool) {
        self.events.push(ViewEvent::AutoTrading(enabled));
    }

    fn render_strategy(&mut self, strategy: StrategyKind) {
        self.events.push(ViewEvent::Strategy(strategy));
    }
}

/// Create a test configuration pointing at a mock backend
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.backend.base_url = base_url.to_string();
    config.logging.log_price_ticks = false;
    config
}

pub fn create_synchronizer(base_url: &str, clock: Arc<ManualClock>) -> Synchronizer<RecordingView> {
    let config = create_test_config(base_url);
    let api = DashboardApi::new(base_url);
    Synchronizer::new(api, &config, RecordingView::default(), clock)
}

/// Base URL of a local port nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to read local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// JSON body in the backend's position/restore shape
pub fn position_body(position: Option<&str>, balance: f64, disabled: bool, until: Option<f64>) -> String {
    serde_json::json!({
        "position": position,
        "balance": balance,
        "disabled": disabled,
        "disabled_until": until,
    })
    .to_string()
}

/// Apply events until `done` holds
pub async fn pump_until<F>(sync: &mut Synchronizer<RecordingView>, done: F)
where
    F: Fn(&Synchronizer<RecordingView>) -> bool,
{
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        while !done(&*sync) {
            assert!(sync.pump().await, "event channel closed");
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for synchronizer state");
}

/// Receive the next non-price event without applying it; price events are
/// applied on the way since they touch disjoint fields.
pub async fn next_non_price_event(sync: &mut Synchronizer<RecordingView>) -> SyncEvent {
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match sync.next_event().await {
                Some(SyncEvent::Price(result)) => sync.handle_event(SyncEvent::Price(result)),
                Some(event) => return event,
                None => panic!("event channel closed"),
            }
        }
    })
    .await;
    result.expect("timed out waiting for event")
}
