// Position/balance/lockout reads from `/api/position` and `/api/restore`

use crate::core::model::PositionUpdate;
use crate::core::types::Position;
use crate::error::{DashboardError, DashboardResult};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Why a position read was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    Restore,        // Once at startup
    Poll,           // Regular cadence
    Countdown,      // Lockout countdown reached zero
    OrderFollowUp,  // After an accepted manual order
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSource::Restore => write!(f, "restore"),
            PositionSource::Poll => write!(f, "poll"),
            PositionSource::Countdown => write!(f, "countdown"),
            PositionSource::OrderFollowUp => write!(f, "order follow-up"),
        }
    }
}

/// Parse a position report into a partial update.
///
/// A non-object body is a format error. Individual fields with the wrong
/// type are dropped from the update so the model keeps its previous value.
pub fn parse_position_report(body: &Value) -> DashboardResult<PositionUpdate> {
    let obj = body.as_object()
        .ok_or_else(|| DashboardError::Format("position report is not an object".to_string()))?;

    let mut update = PositionUpdate::default();

    match obj.get("position") {
        Some(Value::Null) => update.position = Some(Position::None),
        Some(Value::String(s)) => match Position::from_backend(s) {
            Some(position) => update.position = Some(position),
            None => warn!("⚠️  Ignoring unknown position value '{}'", s),
        },
        Some(other) => warn!("⚠️  Ignoring malformed position value {}", other),
        None => {}
    }

    if let Some(raw) = obj.get("balance") {
        match as_number(raw) {
            Some(balance) => update.balance = Some(balance),
            None => warn!("⚠️  Ignoring malformed balance value {}", raw),
        }
    }

    match obj.get("disabled") {
        Some(Value::Bool(b)) => update.disabled = Some(*b),
        Some(Value::Null) | None => {}
        Some(other) => warn!("⚠️  Ignoring malformed disabled flag {}", other),
    }

    match obj.get("disabled_until") {
        Some(Value::Null) => update.disabled_until = Some(None),
        Some(raw) => match as_number(raw) {
            Some(until) => update.disabled_until = Some(Some(until)),
            None => warn!("⚠️  Ignoring malformed disabled_until value {}", raw),
        },
        None => {}
    }

    Ok(update)
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
