// Trading-control synchronizer
//
// One task owns the model. Timers and operator commands run on that task;
// every backend request is spawned and posts its result back over a channel,
// so responses are applied in completion order, never concurrently.

use crate::clients::DashboardApi;
use crate::config::{Config, PollingConfig};
use crate::core::collaborators::{AutoTradingToggle, StrategySelector};
use crate::core::controls::{compute_controls, lockout_banner, remaining_secs, ControlState, ControlView};
use crate::core::countdown::{CountdownAction, DisableCountdownTimer};
use crate::core::dispatcher::OrderDispatcher;
use crate::core::model::{ModelSnapshot, PositionUpdate, TradeStatusModel};
use crate::core::position_status::PositionSource;
use crate::core::price_feed::{apply_sample, PriceSample};
use crate::core::types::{OrderSide, Position, Severity, StatusMessage, StrategyKind};
use crate::error::{DashboardError, DashboardResult};
use crate::view::DashboardView;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Wall-clock source in epoch seconds
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// Completed backend request
#[derive(Debug)]
pub enum SyncEvent {
    Price(DashboardResult<PriceSample>),
    Position {
        seq: u64,
        source: PositionSource,
        result: DashboardResult<PositionUpdate>,
    },
    Order {
        side: OrderSide,
        result: DashboardResult<Option<String>>,
    },
    AutoTrading {
        enabled: bool,
        result: DashboardResult<()>,
    },
    Strategy {
        strategy: StrategyKind,
        result: DashboardResult<Option<String>>,
    },
}

/// Operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Submit(OrderSide),
    ToggleAutoTrading,
    SelectStrategy(String),
    Shutdown,
}

pub struct Synchronizer<V: DashboardView> {
    api: DashboardApi,
    polling: PollingConfig,
    clock: Arc<dyn Clock>,
    view: V,
    model: TradeStatusModel,
    countdown: DisableCountdownTimer,
    dispatcher: OrderDispatcher,
    auto_trading: AutoTradingToggle,
    strategy: StrategySelector,
    published_controls: Option<ControlView>,
    published_account: Option<(Position, Option<f64>)>,
    position_seq: u64,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    events_rx: mpsc::UnboundedReceiver<SyncEvent>,
}

impl<V: DashboardView> Synchronizer<V> {
    pub fn new(api: DashboardApi, config: &Config, view: V, clock: Arc<dyn Clock>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let initial_strategy = config.trading.default_strategy
            .parse::<StrategyKind>()
            .unwrap_or(StrategyKind::Ma);

        Self {
            api,
            polling: config.polling.clone(),
            clock,
            view,
            model: TradeStatusModel::new(),
            countdown: DisableCountdownTimer::new(),
            dispatcher: OrderDispatcher::new(config.polling.status_dismiss()),
            auto_trading: AutoTradingToggle::default(),
            strategy: StrategySelector::new(initial_strategy),
            published_controls: None,
            published_account: None,
            position_seq: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        self.model.snapshot()
    }

    pub fn controls(&self) -> ControlView {
        compute_controls(&self.model.snapshot())
    }

    pub fn auto_trading_enabled(&self) -> bool {
        self.auto_trading.is_enabled()
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.current()
    }

    /// Seed the model from `/api/restore`
    pub fn start(&mut self) {
        info!("🔄 Restoring trading state from {}", self.api.base_url());
        self.publish_controls();
        self.view.render_strategy(self.strategy.current());
        self.view.render_auto_trading(self.auto_trading.is_enabled());
        self.spawn_position_fetch(PositionSource::Restore);
    }

    pub fn on_price_tick(&mut self) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_price().await;
            let _ = tx.send(SyncEvent::Price(result));
        });
    }

    pub fn on_position_tick(&mut self) {
        self.spawn_position_fetch(PositionSource::Poll);
    }

    pub fn on_countdown_tick(&mut self) {
        let now = self.clock.now_secs();
        match self.countdown.tick(&mut self.model, now) {
            CountdownAction::Idle | CountdownAction::AwaitingConfirmation => {}
            CountdownAction::Display { remaining } => self.view.render_countdown(remaining),
            CountdownAction::ForceRefresh => {
                self.view.render_countdown(0);
                self.spawn_position_fetch(PositionSource::Countdown);
            }
        }
    }

    /// Submit a manual order. Refused locally, without a request, when the
    /// derived controls do not allow `side`.
    pub fn submit(&mut self, side: OrderSide) -> DashboardResult<()> {
        if let Err(err) = self.dispatcher.begin(&mut self.model, side) {
            warn!("🚫 {}", err);
            self.view.show_status(&StatusMessage::error(&err, self.polling.status_dismiss()));
            return Err(err);
        }

        self.view.show_status(&StatusMessage::info("Processing..."));
        self.publish_controls();

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.quick_order(side).await;
            let _ = tx.send(SyncEvent::Order { side, result });
        });
        Ok(())
    }

    pub fn toggle_auto_trading(&mut self) -> bool {
        let enabled = self.auto_trading.toggle();
        self.view.render_auto_trading(enabled);
        self.view.show_status(&StatusMessage::success(
            self.auto_trading.status_text(),
            self.polling.status_dismiss(),
        ));

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.set_auto_trading(enabled).await;
            let _ = tx.send(SyncEvent::AutoTrading { enabled, result });
        });
        enabled
    }

    pub fn select_strategy(&mut self, name: &str) -> DashboardResult<StrategyKind> {
        let strategy = match self.strategy.select(name) {
            Ok(strategy) => strategy,
            Err(err) => {
                self.view.show_status(&StatusMessage::error(&err, self.polling.status_dismiss()));
                return Err(err);
            }
        };

        self.view.render_strategy(strategy);
        self.view.show_status(&StatusMessage::success(
            format!("Strategy updated to: {}", strategy.label()),
            self.polling.status_dismiss(),
        ));

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.update_strategy(strategy).await;
            let _ = tx.send(SyncEvent::Strategy { strategy, result });
        });
        Ok(strategy)
    }

    pub fn handle_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::Submit(side) => {
                let _ = self.submit(side);
            }
            OperatorCommand::ToggleAutoTrading => {
                self.toggle_auto_trading();
            }
            OperatorCommand::SelectStrategy(name) => {
                let _ = self.select_strategy(&name);
            }
            OperatorCommand::Shutdown => {}
        }
    }

    /// Apply one completed request to the model and the view
    pub fn handle_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Price(Ok(sample)) => {
                let tick = apply_sample(&mut self.model, sample);
                self.view.render_price(&tick);
            }
            SyncEvent::Price(Err(err)) => {
                warn!("⚠️  Price fetch failed [{}]: {}", err.category(), err);
                if matches!(err, DashboardError::Transport(_)) {
                    let status = StatusMessage {
                        text: "Failed to fetch price, check the network connection".to_string(),
                        severity: Severity::Error,
                        code: Some(err.view_code()),
                        dismiss_after: Some(self.polling.status_dismiss()),
                    };
                    self.view.show_status(&status);
                }
            }

            SyncEvent::Position { seq, source, result } => self.apply_position(seq, source, result),

            SyncEvent::Order { side, result } => {
                let outcome = self.dispatcher.complete(&mut self.model, side, result, self.position_seq);
                self.view.show_status(&outcome.status);
                if outcome.follow_up {
                    self.spawn_position_fetch(PositionSource::OrderFollowUp);
                }
                self.publish_controls();
            }

            SyncEvent::AutoTrading { enabled, result } => {
                if let Err(err) = result {
                    warn!("⚠️  Failed to set auto trading to {}: {}", enabled, err);
                }
            }
            SyncEvent::Strategy { strategy, result } => match result {
                Ok(_) => debug!("Strategy {} acknowledged", strategy.as_wire()),
                Err(err) => warn!("⚠️  Failed to update strategy to {}: {}", strategy.as_wire(), err),
            },
        }
    }

    /// Wait for the next completed request without applying it
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.events_rx.recv().await
    }

    /// Wait for and apply the next completed request
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Run until the command channel closes or `Shutdown` arrives
    pub async fn run(mut self, mut commands: mpsc::Receiver<OperatorCommand>) -> DashboardResult<V> {
        self.start();

        let start = Instant::now();
        let mut price_timer = interval_at(start + self.polling.price_interval(), self.polling.price_interval());
        let mut position_timer = interval_at(start + self.polling.position_interval(), self.polling.position_interval());
        let mut countdown_timer = interval_at(start + self.polling.countdown_tick(), self.polling.countdown_tick());
        for timer in [&mut price_timer, &mut position_timer, &mut countdown_timer] {
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        loop {
            tokio::select! {
                _ = price_timer.tick() => self.on_price_tick(),
                _ = position_timer.tick() => self.on_position_tick(),
                _ = countdown_timer.tick() => self.on_countdown_tick(),
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                command = commands.recv() => match command {
                    Some(OperatorCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
            }
        }

        info!("🛑 Synchronizer stopped");
        Ok(self.view)
    }

    fn spawn_position_fetch(&mut self, source: PositionSource) -> u64 {
        self.position_seq += 1;
        let seq = self.position_seq;
        debug!("Position read #{} ({})", seq, source);

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match source {
                PositionSource::Restore => api.restore().await,
                _ => api.fetch_position().await,
            };
            let _ = tx.send(SyncEvent::Position { seq, source, result });
        });
        seq
    }

    fn apply_position(&mut self, seq: u64, source: PositionSource, result: DashboardResult<PositionUpdate>) {
        let update = match result {
            Ok(update) => update,
            Err(err) => {
                // Keep the last merged state; the next tick is the retry
                warn!("⚠️  Position read #{} ({}) failed [{}]: {}", seq, source, err.category(), err);
                if source == PositionSource::Countdown {
                    self.model.clear_expiry_tentative();
                }
                return;
            }
        };

        // Nothing usable to merge: same as a failed read
        if update.is_empty() {
            warn!("⚠️  Position read #{} ({}) carried no usable fields, ignoring", seq, source);
            if source == PositionSource::Countdown {
                self.model.clear_expiry_tentative();
            }
            return;
        }

        let now = self.clock.now_secs();
        self.model.update(&update, seq, now);
        self.publish_account();
        self.publish_controls();

        if source == PositionSource::Restore {
            self.on_price_tick();
        }
    }

    fn publish_account(&mut self) {
        let snapshot = self.model.snapshot();
        let account = (snapshot.position, snapshot.balance);
        if self.published_account != Some(account) {
            self.view.render_account(account.0, account.1);
            self.published_account = Some(account);
        }
    }

    /// Recompute derived controls and push them to the view when they change
    fn publish_controls(&mut self) {
        let snapshot = self.model.snapshot();
        let controls = compute_controls(&snapshot);
        if self.published_controls == Some(controls) {
            return;
        }

        let was_locked = matches!(self.published_controls, Some(c) if c.state == ControlState::Locked);
        self.view.render_controls(&controls);

        if controls.state == ControlState::Locked && !was_locked {
            let now = self.clock.now_secs();
            let remaining = snapshot.lockout.until().map(|until| remaining_secs(until, now));
            info!("🔒 Trading locked out by backend");
            self.view.show_status(&StatusMessage {
                text: lockout_banner(remaining),
                severity: Severity::Error,
                code: None,
                dismiss_after: None,
            });
        } else if was_locked && controls.state != ControlState::Locked {
            info!("🔓 Lockout lifted");
            self.view.clear_status();
        }

        self.published_controls = Some(controls);
    }
}
