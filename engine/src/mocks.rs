//! Deterministic fixtures: a pinnable clock and ready-made states and inputs.

use crate::resolve::{MatchInputs, MatchMeta};
use crate::service::{Clock, Series};
use chalkline_types::{GameState, MatchId, MonthKey, PerPlayer, PlayerSlot};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// A clock that only moves when told to. Clones share the same time, so a
/// test can keep one handle and advance the clock inside a [`Series`].
#[derive(Clone)]
pub struct FixedClock(Rc<Cell<DateTime<Utc>>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        FixedClock(Rc::new(Cell::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.0.set(now);
    }

    pub fn advance(&self, delta: Duration) {
        self.0.set(self.0.get() + delta);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

/// A Friday evening in August 2026.
pub fn game_night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 14, 20, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn month() -> MonthKey {
    MonthKey::new(2026, 8).expect("valid month")
}

/// Blank series state for the house pair.
pub fn new_state() -> GameState {
    GameState::new("Ayla", "Bram", month())
}

/// A plain cleared-table win: no power-ups, loser keeps 3 balls.
pub fn inputs(winner: PlayerSlot) -> MatchInputs {
    let mut own_balls = PerPlayer::new(0, 0);
    own_balls[winner.opponent()] = 3;
    MatchInputs::manual(winner, 3, own_balls, PerPlayer::new(None, None))
}

pub fn meta() -> MatchMeta {
    MatchMeta {
        id: MatchId::random(),
        timestamp: game_night(),
        month: month(),
    }
}

/// A fresh series pinned to [`game_night`].
pub fn series() -> Series<FixedClock> {
    Series::new("Ayla", "Bram", FixedClock::at(game_night()))
}
