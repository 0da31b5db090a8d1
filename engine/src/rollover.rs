//! Calendar-month boundaries. Streaks deliberately survive both flavors; a
//! run that spans the month break keeps its momentum.

use chalkline_types::{GameState, Money, MonthKey, PlayerSlot, PowerUpQuota};

/// Adopts `month` and refreshes both quota allotments. Totals and history
/// stay. No-op when the state is already on that month.
pub fn quota_rollover(state: &GameState, month: MonthKey) -> GameState {
    let mut next = state.clone();
    if next.month == month {
        return next;
    }
    for slot in PlayerSlot::ALL {
        next.players[slot].quota = PowerUpQuota::initial();
    }
    next.month = month;
    next
}

/// Full month turnover: quotas and monthly totals reset, history kept (the
/// per-month view filters the log by its `month` field).
pub fn full_rollover(state: &GameState, month: MonthKey) -> GameState {
    let mut next = state.clone();
    for slot in PlayerSlot::ALL {
        next.players[slot].quota = PowerUpQuota::initial();
        next.players[slot].monthly_total = Money::ZERO;
    }
    next.month = month;
    next
}
