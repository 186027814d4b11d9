// View-facing outputs of the synchronizer

use crate::core::controls::{ControlState, ControlView};
use crate::core::types::{Position, PriceTick, Severity, StatusMessage, StrategyKind};
use tracing::{error, info};

/// Everything the synchronizer shows to the operator. Implementations must
/// not call back into the synchronizer.
pub trait DashboardView {
    fn render_price(&mut self, tick: &PriceTick);
    fn render_account(&mut self, position: Position, balance: Option<f64>);
    fn render_controls(&mut self, controls: &ControlView);
    fn render_countdown(&mut self, remaining_secs: u64);
    fn show_status(&mut self, status: &StatusMessage);
    fn clear_status(&mut self);
    fn render_auto_trading(&mut self, enabled: bool);
    fn render_strategy(&mut self, strategy: StrategyKind);
}

/// Renders every output as a log line; used by the terminal dashboard
#[derive(Debug, Clone)]
pub struct LogView {
    log_price_ticks: bool,
}

impl LogView {
    pub fn new(log_price_ticks: bool) -> Self {
        Self { log_price_ticks }
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DashboardView for LogView {
    fn render_price(&mut self, tick: &PriceTick) {
        if !self.log_price_ticks {
            return;
        }
        match &tick.change {
            Some(change) => info!("💰 Price {} ({} {})", tick.display, change.formatted(), change.direction.tag()),
            None => info!("💰 Price {}", tick.display),
        }
    }

    fn render_account(&mut self, position: Position, balance: Option<f64>) {
        match balance {
            Some(balance) => info!("📊 Position: {} | Balance: {:.2}", position, balance),
            None => info!("📊 Position: {}", position),
        }
    }

    fn render_controls(&mut self, controls: &ControlView) {
        let state = match controls.state {
            ControlState::Syncing => "syncing",
            ControlState::Locked => "locked",
            ControlState::InPosition => "in position",
            ControlState::Flat => "flat",
        };
        let flag = |on: bool| if on { "on" } else { "off" };
        info!(
            "🎛️  Controls [{}{}] buy={} sell={} close={}",
            state,
            if controls.order_locked { ", order in flight" } else { "" },
            flag(controls.flags.buy),
            flag(controls.flags.sell),
            flag(controls.flags.close),
        );
    }

    fn render_countdown(&mut self, remaining_secs: u64) {
        info!("⏳ Trading disabled, {}s remaining", remaining_secs);
    }

    fn show_status(&mut self, status: &StatusMessage) {
        match status.severity {
            Severity::Info => info!("ℹ️  {}", status.text),
            Severity::Success => info!("✅ {}", status.text),
            Severity::Error => match status.code {
                Some(code) => error!("❌ {} [{}]", status.text, code),
                None => error!("❌ {}", status.text),
            },
        }
    }

    fn clear_status(&mut self) {}

    fn render_auto_trading(&mut self, enabled: bool) {
        info!("🤖 Auto trading: {}", if enabled { "running" } else { "stopped" });
    }

    fn render_strategy(&mut self, strategy: StrategyKind) {
        info!("🧠 Strategy: {}", strategy.label());
    }
}
