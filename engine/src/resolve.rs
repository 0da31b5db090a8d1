//! Match resolution: one finished game in, a new aggregate state and an
//! immutable record out.

use crate::rollover;
use crate::stakes;
use chalkline_types::{
    Error, GameState, MatchId, MatchRecord, Money, MonthKey, PerPlayer, PlayerSlot, PowerUpKind,
    PowerUpUsage, StreakPair, WinCondition, BALL_BOUNTY_PER_BALL, BLACK_BALL_BONUS,
};
use chrono::{DateTime, Utc};

/// Everything the players report about a finished game.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchInputs {
    pub winner: PlayerSlot,
    pub win_condition: WinCondition,
    /// Balls the loser still had on the table.
    pub loser_balls: u8,
    /// Each player's own remaining balls, for power-up eligibility checks.
    pub own_balls: PerPlayer<u8>,
    pub power_ups: PerPlayer<Option<PowerUpUsage>>,
    /// 1 for manual entry; `1 + escalation level` for a live game.
    pub stake_multiplier: u32,
}

impl MatchInputs {
    /// Manually entered result; the stake multiplier is always 1.
    pub fn manual(
        winner: PlayerSlot,
        loser_balls: u8,
        own_balls: PerPlayer<u8>,
        power_ups: PerPlayer<Option<PowerUpUsage>>,
    ) -> Self {
        MatchInputs {
            winner,
            win_condition: WinCondition::Normal,
            loser_balls,
            own_balls,
            power_ups,
            stake_multiplier: 1,
        }
    }

    /// The inputs a record was resolved from, for replay.
    pub fn from_record(record: &MatchRecord) -> Self {
        MatchInputs {
            winner: record.winner,
            win_condition: record.win_condition,
            loser_balls: record.loser_balls,
            own_balls: record.own_balls,
            power_ups: record.power_ups,
            stake_multiplier: record.stake_multiplier,
        }
    }
}

/// Identity and timing stamped onto the record by the service, not chosen by
/// the players.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchMeta {
    pub id: MatchId,
    pub timestamp: DateTime<Utc>,
    pub month: MonthKey,
}

impl MatchMeta {
    pub fn from_record(record: &MatchRecord) -> Self {
        MatchMeta {
            id: record.id,
            timestamp: record.timestamp,
            month: record.month,
        }
    }
}

/// Resolves one match against the current state.
///
/// Pure: the caller's state is never touched, so any `Err` leaves the series
/// exactly as it was. Phases run in a fixed order; power-up quota is spent at
/// the moment a power-up is applied, and a Sniper or Double Trouble call
/// spends its quota even when the attempt failed.
pub fn resolve(
    state: &GameState,
    inputs: &MatchInputs,
    meta: &MatchMeta,
) -> Result<(GameState, MatchRecord), Error> {
    let winner = inputs.winner;
    let loser = winner.opponent();
    let winner_usage = inputs.power_ups[winner].unwrap_or_default();
    let loser_usage = inputs.power_ups[loser].unwrap_or_default();
    let winner_own_balls = inputs.own_balls[winner];

    if winner_usage.cumback_kid {
        return Err(Error::precondition(
            PowerUpKind::CumbackKid,
            "only the losing side can invoke a comeback",
        ));
    }

    // Phase 1: month boundary. Quotas refresh, totals and streaks carry over.
    let mut next = rollover::quota_rollover(state, meta.month);

    let streak_before = StreakPair {
        winner: next.players[winner].streak,
        loser: next.players[loser].streak,
    };

    // Phase 2: loser's Cumback Kid, before the winner's own modifiers. The
    // loser steps onto the rung just below the winner instead of falling to
    // zero.
    let comeback = loser_usage.cumback_kid;
    if comeback {
        next.players[loser].quota.try_consume(PowerUpKind::CumbackKid)?;
        next.players[loser].streak = next.players[winner].streak.saturating_sub(1);
    }

    // Phase 3: winner's pre-resolution power-ups.
    if winner_usage.toep {
        if winner_own_balls < 2 {
            return Err(Error::precondition(
                PowerUpKind::Toep,
                "needs at least 2 own balls on the table",
            ));
        }
        next.players[winner].quota.try_consume(PowerUpKind::Toep)?;
        next.players[winner].streak = next.players[winner].streak.saturating_add(1);
    }
    if winner_usage.pull_the_plug {
        next.players[winner].quota.try_consume(PowerUpKind::PullThePlug)?;
        next.players[loser].streak = 0;
    }

    // Phase 4: the base streak transition.
    let multiplier = inputs.stake_multiplier;
    if comeback {
        // Beating a comeback pays double; the loser keeps the phase-2 streak.
        next.players[winner].streak = next.players[winner]
            .streak
            .saturating_add(multiplier.saturating_mul(2));
    } else {
        next.players[winner].streak = next.players[winner].streak.saturating_add(multiplier);
        next.players[loser].streak = 0;
    }

    // Phase 5: post-resolution streak bonuses.
    if winner_usage.big_rack {
        if winner_own_balls < 3 {
            return Err(Error::precondition(
                PowerUpKind::BigRack,
                "needs at least 3 own balls on the table",
            ));
        }
        next.players[winner].quota.try_consume(PowerUpKind::BigRack)?;
        next.players[winner].streak = next.players[winner]
            .streak
            .saturating_add(inputs.loser_balls as u32);
    }
    if let Some(attempt) = winner_usage.sniper {
        if attempt.balls_potted < 3 {
            return Err(Error::precondition(
                PowerUpKind::Sniper,
                "needs a called run of at least 3 pots",
            ));
        }
        next.players[winner].quota.try_consume(PowerUpKind::Sniper)?;
        if attempt.successful {
            let bonus = match attempt.balls_potted {
                3 => 1,
                4 => 2,
                _ => 3,
            };
            next.players[winner].streak = next.players[winner].streak.saturating_add(bonus);
        }
    }

    // Phase 6: the stake follows from the final streak.
    let final_winner_streak = next.players[winner].streak;
    let mut amount = stakes::stake_for_streak(final_winner_streak);

    // Phase 7: Double Trouble doubles the raw stake when the call landed.
    if let Some(attempt) = winner_usage.double_trouble {
        next.players[winner]
            .quota
            .try_consume(PowerUpKind::DoubleTrouble)?;
        if attempt.successful {
            amount = amount.saturating_mul(2);
        }
    }

    // Phase 8: anti-runaway cap, judged on the totals as they stood before
    // this match.
    let mut capped = false;
    if stakes::cap_active(
        state.players[PlayerSlot::A].monthly_total,
        state.players[PlayerSlot::B].monthly_total,
    ) {
        let consecutive_wins = state.wins_in_month(winner, meta.month) + 1;
        let ceiling = stakes::capped_amount(consecutive_wins);
        if amount > ceiling {
            amount = ceiling;
            capped = true;
        }
    }

    // Phase 9: flat modifiers, outside the cap.
    let mut ball_bounty = None;
    if winner_usage.ball_bounty {
        next.players[winner].quota.try_consume(PowerUpKind::BallBounty)?;
        ball_bounty = Some(BALL_BOUNTY_PER_BALL.saturating_mul(inputs.loser_balls as i64));
    }
    if winner_usage.black_ball {
        next.players[winner].quota.try_consume(PowerUpKind::BlackBall)?;
        amount += BLACK_BALL_BONUS;
    }
    if winner_usage.speedpot {
        next.players[winner].quota.try_consume(PowerUpKind::Speedpot)?;
    }

    // Phase 10: the winner banks stake plus bounty, exactly once.
    next.players[winner].monthly_total += amount + ball_bounty.unwrap_or(Money::ZERO);

    // Phase 11: the immutable record, carrying every input it was resolved
    // from.
    let keep_usage = |usage: Option<PowerUpUsage>| usage.filter(PowerUpUsage::any);
    let record = MatchRecord {
        id: meta.id,
        timestamp: meta.timestamp,
        month: meta.month,
        winner,
        loser,
        win_condition: inputs.win_condition,
        loser_balls: inputs.loser_balls,
        own_balls: inputs.own_balls,
        stake_multiplier: multiplier,
        power_ups: PerPlayer::new(
            keep_usage(inputs.power_ups.a),
            keep_usage(inputs.power_ups.b),
        ),
        streak_before,
        streak_after: StreakPair {
            winner: final_winner_streak,
            loser: next.players[loser].streak,
        },
        amount_won: amount,
        ball_bounty,
        black_ball_bonus: winner_usage.black_ball,
        capped,
    };
    next.last_match_id = Some(record.id);
    next.matches.push(record.clone());

    Ok((next, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks;
    use chalkline_types::{DoubleTroubleAttempt, SniperAttempt};

    #[test]
    fn test_first_win_pays_base_stake() {
        let state = mocks::new_state();
        let (next, record) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        assert_eq!(record.amount_won, Money::from_cents(50));
        assert_eq!(record.streak_after.winner, 1);
        assert_eq!(record.streak_after.loser, 0);
        assert_eq!(
            next.players[PlayerSlot::A].monthly_total,
            Money::from_cents(50)
        );
        assert_eq!(next.last_match_id, Some(record.id));
        assert_eq!(next.matches.len(), 1);
    }

    #[test]
    fn test_streak_three_win_pays_four_euros() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::A].streak = 3;
        let (_, record) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        assert_eq!(record.streak_after.winner, 4);
        assert_eq!(record.amount_won, Money::from_euros(4));
    }

    #[test]
    fn test_loss_resets_streak() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::B].streak = 5;
        let (next, _) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        assert_eq!(next.players[PlayerSlot::B].streak, 0);
    }

    #[test]
    fn test_toep_needs_two_own_balls() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            toep: true,
            ..Default::default()
        });
        inputs.own_balls[PlayerSlot::A] = 1;
        let err = resolve(&state, &inputs, &mocks::meta()).unwrap_err();
        assert!(matches!(
            err,
            Error::Precondition {
                kind: PowerUpKind::Toep,
                ..
            }
        ));

        inputs.own_balls[PlayerSlot::A] = 2;
        let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        // +1 from the power-up, +1 from the win itself.
        assert_eq!(record.streak_after.winner, 2);
        assert_eq!(
            next.players[PlayerSlot::A].quota.remaining(PowerUpKind::Toep),
            Some(4)
        );
    }

    #[test]
    fn test_cumback_kid_keeps_loser_close() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::A].streak = 4;
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::B] = Some(PowerUpUsage {
            cumback_kid: true,
            ..Default::default()
        });
        let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        // Loser lands one rung below the winner's pre-match streak.
        assert_eq!(next.players[PlayerSlot::B].streak, 3);
        // Beating a comeback pays double: 4 + 2.
        assert_eq!(record.streak_after.winner, 6);
        assert_eq!(record.amount_won, Money::from_euros(16));
    }

    #[test]
    fn test_cumback_kid_is_loser_side_only() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            cumback_kid: true,
            ..Default::default()
        });
        let err = resolve(&state, &inputs, &mocks::meta()).unwrap_err();
        assert!(matches!(
            err,
            Error::Precondition {
                kind: PowerUpKind::CumbackKid,
                ..
            }
        ));
    }

    #[test]
    fn test_pull_the_plug_zeroes_opponent() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::B].streak = 6;
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            pull_the_plug: true,
            ..Default::default()
        });
        let (next, _) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        assert_eq!(next.players[PlayerSlot::B].streak, 0);
        assert_eq!(
            next.players[PlayerSlot::A]
                .quota
                .remaining(PowerUpKind::PullThePlug),
            Some(0)
        );
    }

    #[test]
    fn test_big_rack_adds_loser_balls() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.loser_balls = 5;
        inputs.own_balls[PlayerSlot::A] = 3;
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            big_rack: true,
            ..Default::default()
        });
        let (_, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        // 1 for the win, +5 for the loser's remaining balls.
        assert_eq!(record.streak_after.winner, 6);
    }

    #[test]
    fn test_sniper_consumes_quota_even_on_miss() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            sniper: Some(SniperAttempt {
                balls_potted: 4,
                successful: false,
            }),
            ..Default::default()
        });
        let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        assert_eq!(record.streak_after.winner, 1);
        assert_eq!(
            next.players[PlayerSlot::A]
                .quota
                .remaining(PowerUpKind::Sniper),
            Some(2)
        );
    }

    #[test]
    fn test_sniper_bonus_scales_with_pots() {
        for (pots, bonus) in [(3u8, 1u32), (4, 2), (5, 3), (7, 3)] {
            let state = mocks::new_state();
            let mut inputs = mocks::inputs(PlayerSlot::A);
            inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
                sniper: Some(SniperAttempt {
                    balls_potted: pots,
                    successful: true,
                }),
                ..Default::default()
            });
            let (_, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
            assert_eq!(record.streak_after.winner, 1 + bonus, "pots = {pots}");
        }
    }

    #[test]
    fn test_sniper_needs_three_pots() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            sniper: Some(SniperAttempt {
                balls_potted: 2,
                successful: true,
            }),
            ..Default::default()
        });
        assert!(matches!(
            resolve(&state, &inputs, &mocks::meta()),
            Err(Error::Precondition {
                kind: PowerUpKind::Sniper,
                ..
            })
        ));
    }

    #[test]
    fn test_double_trouble_doubles_only_on_success() {
        for (successful, cents) in [(true, 100i64), (false, 50)] {
            let state = mocks::new_state();
            let mut inputs = mocks::inputs(PlayerSlot::A);
            inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
                double_trouble: Some(DoubleTroubleAttempt { successful }),
                ..Default::default()
            });
            let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
            assert_eq!(record.amount_won, Money::from_cents(cents));
            assert_eq!(
                next.players[PlayerSlot::A]
                    .quota
                    .remaining(PowerUpKind::DoubleTrouble),
                Some(0)
            );
        }
    }

    #[test]
    fn test_ball_bounty_rides_on_top() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.loser_balls = 3;
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            ball_bounty: true,
            ..Default::default()
        });
        let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        assert_eq!(record.amount_won, Money::from_cents(50));
        assert_eq!(record.ball_bounty, Some(Money::from_euros(6)));
        assert_eq!(
            next.players[PlayerSlot::A].monthly_total,
            Money::from_cents(650)
        );
    }

    #[test]
    fn test_black_ball_bonus_is_flat_and_unlimited() {
        let mut state = mocks::new_state();
        for _ in 0..3 {
            let mut inputs = mocks::inputs(PlayerSlot::A);
            inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
                black_ball: true,
                ..Default::default()
            });
            let (next, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
            assert!(record.black_ball_bonus);
            assert_eq!(
                record.amount_won,
                crate::stakes::stake_for_streak(record.streak_after.winner)
                    + Money::from_euros(5)
            );
            state = next;
        }
    }

    #[test]
    fn test_cap_clamps_second_win() {
        let mut state = mocks::new_state();
        // Totals diverge by 200, past the 150 threshold.
        state.players[PlayerSlot::A].monthly_total = Money::from_euros(200);
        state.players[PlayerSlot::A].streak = 5;
        // One win already on the books this month.
        let (state, first) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        assert!(first.capped);
        assert_eq!(first.amount_won, Money::from_euros(10));

        // Second consecutive win: ceiling 10 + 2, raw amount would be 32.
        let (_, second) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        assert!(second.capped);
        assert_eq!(second.amount_won, Money::from_euros(12));
    }

    #[test]
    fn test_cap_leaves_small_amounts_alone() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::B].monthly_total = Money::from_euros(200);
        let (_, record) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &mocks::meta()).expect("resolve");
        // First win pays €0.50, well under the €10 ceiling.
        assert!(!record.capped);
        assert_eq!(record.amount_won, Money::from_cents(50));
    }

    #[test]
    fn test_month_boundary_refreshes_quotas() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::A].quota = {
            let mut quota = chalkline_types::PowerUpQuota::initial();
            quota.try_consume(PowerUpKind::Toep).expect("consume");
            quota
        };
        state.players[PlayerSlot::A].monthly_total = Money::from_euros(30);

        let mut meta = mocks::meta();
        meta.month = MonthKey::new(2026, 9).expect("month");
        let (next, record) =
            resolve(&state, &mocks::inputs(PlayerSlot::A), &meta).expect("resolve");
        assert_eq!(next.month, meta.month);
        assert_eq!(record.month, meta.month);
        // Quota is back to full (minus nothing; the win used no power-ups).
        assert_eq!(
            next.players[PlayerSlot::A].quota.remaining(PowerUpKind::Toep),
            Some(5)
        );
        // Totals are not reset by the in-band month check.
        assert_eq!(
            next.players[PlayerSlot::A].monthly_total,
            Money::from_euros(30) + Money::from_cents(50)
        );
    }

    #[test]
    fn test_quota_exhaustion_aborts_whole_resolution() {
        let mut state = mocks::new_state();
        state.players[PlayerSlot::A].quota = {
            let mut quota = chalkline_types::PowerUpQuota::initial();
            quota.try_consume(PowerUpKind::BigRack).expect("consume");
            quota
        };
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.own_balls[PlayerSlot::A] = 4;
        inputs.power_ups[PlayerSlot::A] = Some(PowerUpUsage {
            big_rack: true,
            ..Default::default()
        });
        let err = resolve(&state, &inputs, &mocks::meta()).unwrap_err();
        assert_eq!(err, Error::QuotaExceeded(PowerUpKind::BigRack));
        // Pure function: the caller's state was never touched.
        assert!(state.matches.is_empty());
        assert_eq!(state.players[PlayerSlot::A].streak, 0);
    }

    #[test]
    fn test_record_drops_empty_usage() {
        let state = mocks::new_state();
        let mut inputs = mocks::inputs(PlayerSlot::A);
        inputs.power_ups = PerPlayer::new(Some(PowerUpUsage::default()), None);
        let (_, record) = resolve(&state, &inputs, &mocks::meta()).expect("resolve");
        assert_eq!(record.power_ups, PerPlayer::new(None, None));
    }
}
