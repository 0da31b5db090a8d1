//! Monetary formulas: the exponential stake curve and the anti-runaway cap.

use chalkline_types::{
    Money, BASE_STAKE, CAP_BASE, CAP_INCREMENT, CAP_THRESHOLD, DANGER_ZONE_STREAK,
};

/// Stake awarded for a given post-match streak: `BASE_STAKE * 2^(streak-1)`,
/// zero for a zero streak. Saturates instead of wrapping on absurd streaks.
pub fn stake_for_streak(streak: u32) -> Money {
    if streak == 0 {
        return Money::ZERO;
    }
    BASE_STAKE.saturating_shl(streak - 1)
}

/// The cap kicks in once the two running totals have diverged by more than
/// the threshold.
pub fn cap_active(total_a: Money, total_b: Money) -> bool {
    total_a.abs_diff(total_b) > CAP_THRESHOLD
}

/// Linear ceiling while capped: `CAP_BASE + CAP_INCREMENT * (wins - 1)` for
/// the winner's n-th win of the month.
pub fn capped_amount(consecutive_wins: u32) -> Money {
    CAP_BASE + CAP_INCREMENT.saturating_mul(consecutive_wins.saturating_sub(1) as i64)
}

/// Display hint for clients: from this streak on the stake is €16 and
/// climbing. No rule reads this.
pub fn danger_zone(streak: u32) -> bool {
    streak >= DANGER_ZONE_STREAK
}
