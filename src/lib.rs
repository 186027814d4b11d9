// Trading Dashboard Library
//
// Client-side synchronizer for a semi-automated trading bot: polls price and
// position/lockout state, derives which manual orders are allowed, and
// dispatches orders under an optimistic lock.

pub mod core;
pub mod clients;
pub mod config;
pub mod error;  // Unified error handling
pub mod view;

// Re-export core types
pub use core::{
    compute_controls, Clock, ControlFlags, ControlState, ControlView, OperatorCommand, OrderSide,
    Position, PositionUpdate, Severity, StatusMessage, StrategyKind, Synchronizer, SystemClock,
    TradeStatusModel,
};

// Re-export error types
pub use error::{DashboardError, DashboardResult};

// Re-export client types
pub use clients::{DashboardApi, TradeRecord};

// Re-export configuration
pub use config::{Config, BackendConfig, PollingConfig, LoggingConfig, TradingConfig, ConfigError};

// Re-export view types
pub use view::{DashboardView, LogView};
