// Manual-control availability derived from the model
//
// Nothing here is stored: the synchronizer calls `compute_controls` after
// every model mutation and forwards the result to the view when it differs
// from what the view already shows.

use crate::core::model::ModelSnapshot;
use crate::core::types::OrderSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Syncing,     // No position read merged yet
    Locked,      // Backend lockout in force
    InPosition,  // Open position, only close allowed
    Flat,        // No position, buy/sell allowed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags {
    pub buy: bool,
    pub sell: bool,
    pub close: bool,
}

impl ControlFlags {
    pub const NONE: ControlFlags = ControlFlags { buy: false, sell: false, close: false };

    pub fn allows(&self, side: OrderSide) -> bool {
        match side {
            OrderSide::Buy => self.buy,
            OrderSide::Sell => self.sell,
            OrderSide::Close => self.close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub state: ControlState,
    pub flags: ControlFlags,
    pub order_locked: bool,
}

/// Derive control availability. Precedence: lockout, then position.
/// An order lock disables everything on top of whichever state applies.
pub fn compute_controls(snapshot: &ModelSnapshot) -> ControlView {
    let state = if !snapshot.synced {
        ControlState::Syncing
    } else if snapshot.lockout.is_active() {
        ControlState::Locked
    } else if snapshot.position.is_open() {
        ControlState::InPosition
    } else {
        ControlState::Flat
    };

    let order_locked = snapshot.order_lock.is_held();
    let flags = if order_locked {
        ControlFlags::NONE
    } else {
        match state {
            ControlState::Syncing | ControlState::Locked => ControlFlags::NONE,
            ControlState::InPosition => ControlFlags { buy: false, sell: false, close: true },
            ControlState::Flat => ControlFlags { buy: true, sell: true, close: false },
        }
    };

    ControlView { state, flags, order_locked }
}

/// Whole seconds left on a lockout, clamped at zero
pub fn remaining_secs(until: f64, now: f64) -> u64 {
    let remaining = (until - now).floor();
    if remaining > 0.0 {
        remaining as u64
    } else {
        0
    }
}

pub fn lockout_banner(remaining: Option<u64>) -> String {
    match remaining {
        Some(secs) => format!("Trading disabled, {}s remaining", secs),
        None => "Trading disabled".to_string(),
    }
}
