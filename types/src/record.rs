use crate::{Money, MonthKey, PerPlayer, PlayerSlot, PowerUpUsage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a resolved match.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn random() -> Self {
        MatchId(Uuid::new_v4())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinCondition {
    /// The winner cleared the table.
    Normal,
    /// The opponent forfeited before the table was cleared (e.g. by
    /// rejecting an escalation).
    EarlyForfeit,
}

/// Winner/loser streak values at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPair {
    pub winner: u32,
    pub loser: u32,
}

/// One resolved match, append-only.
///
/// Carries every input the engine consumed, so replaying the log alone is
/// enough to reconstruct the aggregate state (see the engine's replay
/// module). Never mutated after creation; corrections happen by excluding a
/// record during replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub timestamp: DateTime<Utc>,
    pub month: MonthKey,
    pub winner: PlayerSlot,
    pub loser: PlayerSlot,
    pub win_condition: WinCondition,
    /// Balls the loser still had on the table (0-7).
    pub loser_balls: u8,
    /// Each player's own remaining balls, needed to re-check power-up
    /// preconditions on replay.
    pub own_balls: PerPlayer<u8>,
    /// 1 for manual entry; `1 + escalation level` for a live game.
    pub stake_multiplier: u32,
    /// Power-ups invoked, only for sides that invoked at least one.
    pub power_ups: PerPlayer<Option<PowerUpUsage>>,
    pub streak_before: StreakPair,
    pub streak_after: StreakPair,
    /// Final amount awarded (bonuses folded in, cap applied).
    pub amount_won: Money,
    /// Ball Bounty penalty, charged on top of `amount_won`.
    pub ball_bounty: Option<Money>,
    /// Whether the flat Black Ball bonus was part of `amount_won`.
    pub black_ball_bonus: bool,
    /// Whether the anti-runaway cap truncated the amount.
    pub capped: bool,
}
