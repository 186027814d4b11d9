// Backend API clients

pub mod dashboard_api;

// Re-export client types
pub use dashboard_api::{DashboardApi, TradeRecord, parse_command_response};
