// Manual order dispatch with an optimistic lock on the controls

use crate::core::controls::{compute_controls, ControlState};
use crate::core::model::TradeStatusModel;
use crate::core::types::{OrderSide, StatusMessage};
use crate::error::{DashboardError, DashboardResult};
use std::time::Duration;
use tracing::{info, warn};

/// What the synchronizer must do once an order response is in
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub status: StatusMessage,
    /// Fetch authoritative position state; the lock is released by that read
    pub follow_up: bool,
}

#[derive(Debug, Clone)]
pub struct OrderDispatcher {
    status_dismiss: Duration,
}

impl OrderDispatcher {
    pub fn new(status_dismiss: Duration) -> Self {
        Self { status_dismiss }
    }

    /// Check `side` against the currently derived controls
    pub fn validate(&self, model: &TradeStatusModel, side: OrderSide) -> DashboardResult<()> {
        let controls = compute_controls(&model.snapshot());
        if controls.flags.allows(side) {
            return Ok(());
        }

        let reason = if controls.order_locked {
            "an order is already being processed"
        } else {
            match (controls.state, side) {
                (ControlState::Syncing, _) => "trading state not loaded yet",
                (ControlState::Locked, _) => "trading is locked out",
                (ControlState::InPosition, _) => "a position is already open, close it first",
                (ControlState::Flat, _) => "there is no open position",
            }
        };
        Err(DashboardError::NotPermitted(format!("{} refused: {}", side, reason)))
    }

    /// Validate and apply the optimistic lock. No request may be sent when
    /// this returns an error.
    pub fn begin(&self, model: &mut TradeStatusModel, side: OrderSide) -> DashboardResult<()> {
        self.validate(model, side)?;
        model.begin_order(side);
        info!("📤 Submitting {} order", side);
        Ok(())
    }

    /// Reconcile the order response. `latest_seq` is the newest position read
    /// issued so far; only reads issued after it may release the lock.
    pub fn complete(
        &self,
        model: &mut TradeStatusModel,
        side: OrderSide,
        result: DashboardResult<Option<String>>,
        latest_seq: u64,
    ) -> DispatchOutcome {
        match result {
            Ok(message) => {
                info!("✅ {} order accepted", side);
                model.order_accepted(latest_seq);
                let text = message.unwrap_or_else(|| format!("{} order placed", side));
                DispatchOutcome {
                    status: StatusMessage::success(text, self.status_dismiss),
                    follow_up: true,
                }
            }
            Err(err) => {
                warn!("❌ {} order failed [{}]: {}", side, err.view_code(), err);
                model.order_failed();
                DispatchOutcome {
                    status: StatusMessage::error(&err, self.status_dismiss),
                    follow_up: false,
                }
            }
        }
    }
}
