// Lockout countdown. Display only: the lockout itself is cleared by a
// position read, never by this timer.

use crate::core::controls::remaining_secs;
use crate::core::model::{Lockout, TradeStatusModel};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownAction {
    /// No lockout with a known expiry
    Idle,
    /// Refresh the countdown display
    Display { remaining: u64 },
    /// Local clock says the lockout is over; ask the backend to confirm
    ForceRefresh,
    /// A confirmation read is already outstanding
    AwaitingConfirmation,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DisableCountdownTimer;

impl DisableCountdownTimer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one tick at client time `now` (epoch seconds)
    pub fn tick(&self, model: &mut TradeStatusModel, now: f64) -> CountdownAction {
        let snapshot = model.snapshot();
        let until = match snapshot.lockout {
            Lockout::Active { until: Some(until) } => until,
            _ => return CountdownAction::Idle,
        };

        let remaining = remaining_secs(until, now);
        if remaining > 0 {
            return CountdownAction::Display { remaining };
        }

        if snapshot.expiry_tentative {
            return CountdownAction::AwaitingConfirmation;
        }

        debug!("⏱️  Lockout countdown reached zero, requesting confirmation");
        model.mark_expiry_tentative();
        CountdownAction::ForceRefresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::PositionUpdate;

    const NOW: f64 = 1_700_000_000.0;

    fn locked_model(until: Option<f64>) -> TradeStatusModel {
        let mut model = TradeStatusModel::new();
        model.update(
            &PositionUpdate {
                disabled: Some(true),
                disabled_until: Some(until),
                ..Default::default()
            },
            1,
            NOW,
        );
        model
    }

    #[test]
    fn test_idle_without_lockout() {
        let timer = DisableCountdownTimer::new();
        let mut model = TradeStatusModel::new();
        assert_eq!(timer.tick(&mut model, NOW), CountdownAction::Idle);
    }

    #[test]
    fn test_idle_without_expiry() {
        let timer = DisableCountdownTimer::new();
        let mut model = locked_model(None);
        assert_eq!(timer.tick(&mut model, NOW), CountdownAction::Idle);
    }

    #[test]
    fn test_display_while_time_remains() {
        let timer = DisableCountdownTimer::new();
        let mut model = locked_model(Some(NOW + 30.0));
        assert_eq!(timer.tick(&mut model, NOW), CountdownAction::Display { remaining: 30 });
        assert_eq!(timer.tick(&mut model, NOW + 10.5), CountdownAction::Display { remaining: 19 });
    }

    #[test]
    fn test_expiry_forces_single_refresh_and_keeps_lock() {
        let timer = DisableCountdownTimer::new();
        let mut model = locked_model(Some(NOW + 2.0));

        assert_eq!(timer.tick(&mut model, NOW + 2.0), CountdownAction::ForceRefresh);
        assert_eq!(timer.tick(&mut model, NOW + 3.0), CountdownAction::AwaitingConfirmation);
        assert!(model.snapshot().lockout.is_active());
    }
}
