// Latest known trading state, owned by the synchronizer task
//
// Writers touch two disjoint field groups: the price feed owns
// `current_price`/`last_price`, the position reads own position, balance
// and lockout. The order lock is the only field the dispatcher writes.

use crate::core::types::{OrderSide, Position};
use tracing::{debug, warn};

/// Server-imposed trading lockout as last merged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lockout {
    Clear,
    /// `until` is epoch seconds; `None` when the backend gave no expiry
    Active { until: Option<f64> },
}

impl Lockout {
    pub fn is_active(&self) -> bool {
        matches!(self, Lockout::Active { .. })
    }

    pub fn until(&self) -> Option<f64> {
        match self {
            Lockout::Active { until } => *until,
            Lockout::Clear => None,
        }
    }
}

/// Optimistic lock applied by a manual order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLock {
    Idle,
    /// Request outstanding; no position read may release it
    Pending { side: OrderSide },
    /// Backend accepted the order; released by the first position read
    /// issued with a sequence number above `after_seq`
    AwaitingSync { side: OrderSide, after_seq: u64 },
}

impl OrderLock {
    pub fn is_held(&self) -> bool {
        !matches!(self, OrderLock::Idle)
    }
}

/// Partial position/lockout report. Absent fields leave the model untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionUpdate {
    pub position: Option<Position>,
    pub balance: Option<f64>,
    pub disabled: Option<bool>,
    /// Outer `None`: field absent. `Some(None)`: backend sent `null`.
    pub disabled_until: Option<Option<f64>>,
}

impl PositionUpdate {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.balance.is_none()
            && self.disabled.is_none()
            && self.disabled_until.is_none()
    }
}

/// Copy of every field, handed to the control derivation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSnapshot {
    pub synced: bool,
    pub position: Position,
    pub balance: Option<f64>,
    pub lockout: Lockout,
    pub expiry_tentative: bool,
    pub last_price: Option<f64>,
    pub current_price: Option<f64>,
    pub order_lock: OrderLock,
}

#[derive(Debug, Clone)]
pub struct TradeStatusModel {
    synced: bool,
    position: Position,
    balance: Option<f64>,
    lockout: Lockout,
    expiry_tentative: bool,
    last_price: Option<f64>,
    current_price: Option<f64>,
    order_lock: OrderLock,
}

impl Default for TradeStatusModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeStatusModel {
    pub fn new() -> Self {
        Self {
            synced: false,
            position: Position::None,
            balance: None,
            lockout: Lockout::Clear,
            expiry_tentative: false,
            last_price: None,
            current_price: None,
            order_lock: OrderLock::Idle,
        }
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            synced: self.synced,
            position: self.position,
            balance: self.balance,
            lockout: self.lockout,
            expiry_tentative: self.expiry_tentative,
            last_price: self.last_price,
            current_price: self.current_price,
            order_lock: self.order_lock,
        }
    }

    /// Merge an authoritative position read issued with sequence `seq`.
    /// `now` is the client time the response is applied at.
    pub fn update(&mut self, update: &PositionUpdate, seq: u64, now: f64) {
        self.synced = true;
        self.expiry_tentative = false;

        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(balance) = update.balance {
            self.balance = Some(balance);
        }

        match (update.disabled, update.disabled_until) {
            (Some(false), _) => self.lockout = Lockout::Clear,
            (Some(true), until) => {
                let until = until.unwrap_or_else(|| self.lockout.until());
                self.lockout = normalize_lockout(until, now);
            }
            (None, Some(until)) if self.lockout.is_active() => {
                self.lockout = normalize_lockout(until, now);
            }
            (None, _) => {}
        }

        if let OrderLock::AwaitingSync { side, after_seq } = self.order_lock {
            if seq > after_seq {
                debug!("🔓 Order lock for {} released by position read #{}", side, seq);
                self.order_lock = OrderLock::Idle;
            }
        }
    }

    /// Shift the current price into `last_price` and store the new sample.
    /// Returns the previous price.
    pub fn record_price(&mut self, price: f64) -> Option<f64> {
        self.last_price = self.current_price;
        self.current_price = Some(price);
        self.last_price
    }

    /// The countdown reached zero locally; the lockout stays active until a
    /// position read confirms it has lifted.
    pub fn mark_expiry_tentative(&mut self) {
        self.expiry_tentative = true;
    }

    /// A forced confirmation read failed; let the next tick request another
    pub fn clear_expiry_tentative(&mut self) {
        self.expiry_tentative = false;
    }

    pub fn begin_order(&mut self, side: OrderSide) {
        self.order_lock = OrderLock::Pending { side };
    }

    pub fn order_accepted(&mut self, after_seq: u64) {
        if let OrderLock::Pending { side } = self.order_lock {
            self.order_lock = OrderLock::AwaitingSync { side, after_seq };
        }
    }

    pub fn order_failed(&mut self) {
        self.order_lock = OrderLock::Idle;
    }
}

fn normalize_lockout(until: Option<f64>, now: f64) -> Lockout {
    match until {
        Some(until) if until <= now => {
            warn!("⏱️  Backend reported a lockout that expired at {:.0}; treating as clear", until);
            Lockout::Clear
        }
        until => Lockout::Active { until },
    }
}
