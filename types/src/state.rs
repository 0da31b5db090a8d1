use crate::{MatchId, MatchRecord, MonthKey, PerPlayer, Player, PlayerSlot};
use serde::{Deserialize, Serialize};

/// Aggregate root for the whole series: both players, the active month, and
/// the append-only match log. Only the engine creates new values of this;
/// callers treat it as immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: PerPlayer<Player>,
    pub month: MonthKey,
    pub matches: Vec<MatchRecord>,
    pub last_match_id: Option<MatchId>,
}

impl GameState {
    /// Fresh state: zero streaks and totals, full quotas, empty log.
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>, month: MonthKey) -> Self {
        GameState {
            players: PerPlayer::new(Player::new(name_a), Player::new(name_b)),
            month,
            matches: Vec::new(),
            last_match_id: None,
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        self.players.get(slot)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|record| record.id == id)
    }

    /// Matches already won by `slot` within `month`.
    pub fn wins_in_month(&self, slot: PlayerSlot, month: MonthKey) -> u32 {
        self.matches
            .iter()
            .filter(|record| record.month == month && record.winner == slot)
            .count() as u32
    }
}
