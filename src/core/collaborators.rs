// Auto-trading toggle and strategy selector
//
// Both flip a local value and update the label straight away; the backend
// request that follows is fire-and-forget apart from a failure log.

use crate::core::types::StrategyKind;
use crate::error::DashboardResult;

#[derive(Debug, Clone, Default)]
pub struct AutoTradingToggle {
    enabled: bool,
}

impl AutoTradingToggle {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn status_text(&self) -> &'static str {
        if self.enabled {
            "Auto trading started, strategy signals will open positions"
        } else {
            "Auto trading stopped"
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrategySelector {
    current: StrategyKind,
}

impl StrategySelector {
    pub fn new(initial: StrategyKind) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> StrategyKind {
        self.current
    }

    /// Parse and select. Unknown names are refused before any request.
    pub fn select(&mut self, name: &str) -> DashboardResult<StrategyKind> {
        let strategy = name.parse::<StrategyKind>()?;
        self.current = strategy;
        Ok(strategy)
    }
}
