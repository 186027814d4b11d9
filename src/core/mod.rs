// Client-side trading-control synchronizer

pub mod types;
pub mod model;
pub mod controls;
pub mod price_feed;
pub mod position_status;
pub mod countdown;
pub mod dispatcher;
pub mod collaborators;
pub mod synchronizer;

// Re-export commonly used types
pub use types::{OrderSide, Position, PriceDirection, PriceTick, Severity, StatusMessage, StrategyKind};
pub use model::{Lockout, ModelSnapshot, OrderLock, PositionUpdate, TradeStatusModel};
pub use controls::{compute_controls, remaining_secs, ControlFlags, ControlState, ControlView};
pub use countdown::{CountdownAction, DisableCountdownTimer};
pub use dispatcher::OrderDispatcher;
pub use position_status::PositionSource;
pub use synchronizer::{Clock, OperatorCommand, SyncEvent, Synchronizer, SystemClock};
