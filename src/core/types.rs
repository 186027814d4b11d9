// Common types shared by the synchronizer, the API client and the view

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Server-authoritative position direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    None,   // Flat, no open position
    Long,   // Opened with BUY
    Short,  // Opened with SELL
}

impl Position {
    pub fn is_open(&self) -> bool {
        !matches!(self, Position::None)
    }

    /// Map the backend's position string; `None` means the value is not recognised
    pub fn from_backend(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => Some(Position::Long),
            "SELL" | "SHORT" => Some(Position::Short),
            "" | "NONE" => Some(Position::None),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::None => write!(f, "none"),
            Position::Long => write!(f, "long"),
            Position::Short => write!(f, "short"),
        }
    }
}

/// Manual order action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
    Close,
}

impl OrderSide {
    pub fn as_wire(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
            OrderSide::Close => "CLOSE",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl FromStr for OrderSide {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            "CLOSE" => Ok(OrderSide::Close),
            other => Err(DashboardError::NotPermitted(format!("unknown order side '{}'", other))),
        }
    }
}

/// Direction of the latest price move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

impl PriceDirection {
    pub fn classify(change: f64) -> Self {
        if change > 0.0 {
            PriceDirection::Up
        } else if change < 0.0 {
            PriceDirection::Down
        } else {
            PriceDirection::Flat
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PriceDirection::Up => "up",
            PriceDirection::Down => "down",
            PriceDirection::Flat => "flat",
        }
    }
}

/// Percentage move versus the previous sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub percent: f64,
    pub direction: PriceDirection,
}

impl PriceChange {
    /// Display form used by the price widget: `+1.25%`, `-0.40%`, `0.00%`
    pub fn formatted(&self) -> String {
        match self.direction {
            PriceDirection::Up => format!("+{:.2}%", self.percent),
            PriceDirection::Down => format!("{:.2}%", self.percent),
            PriceDirection::Flat => "0.00%".to_string(),
        }
    }
}

/// One accepted price sample, as handed to the view
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub display: String,
    pub price: f64,
    pub change: Option<PriceChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Status banner content
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub dismiss_after: Option<Duration>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Info, code: None, dismiss_after: None }
    }

    pub fn success(text: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
            code: None,
            dismiss_after: Some(dismiss_after),
        }
    }

    pub fn error(err: &DashboardError, dismiss_after: Duration) -> Self {
        Self {
            text: err.user_message(),
            severity: Severity::Error,
            code: Some(err.view_code()),
            dismiss_after: Some(dismiss_after),
        }
    }
}

/// Strategies the backend knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Simple,    // Alternating test signals
    Ma,        // Moving-average crossover
    Rsi,       // RSI overbought/oversold
    Combined,  // MA and RSI must agree
}

impl StrategyKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            StrategyKind::Simple => "simple",
            StrategyKind::Ma => "ma",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Combined => "combined",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Simple => "Simple",
            StrategyKind::Ma => "Moving Average",
            StrategyKind::Rsi => "RSI",
            StrategyKind::Combined => "Combined",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(StrategyKind::Simple),
            "ma" => Ok(StrategyKind::Ma),
            "rsi" => Ok(StrategyKind::Rsi),
            "combined" => Ok(StrategyKind::Combined),
            _ => Err(DashboardError::InvalidStrategy(s.to_string())),
        }
    }
}
