//! The operations facade. Owns one series state and at most one live game,
//! stamps ids and timestamps, logs every operation, and queues one event per
//! state change for an external subscriber to drain.

use crate::live;
use crate::replay;
use crate::resolve::{self, MatchInputs, MatchMeta};
use crate::rollover;
use chalkline_types::{
    Error, EscalationResponse, GameState, LiveGame, LiveGameId, MatchId, MatchRecord, Money,
    MonthKey, PlayerSlot, PowerUpUsage,
};
use chrono::{DateTime, Utc};

/// Source of "now". The engine never reads the system clock directly, so
/// tests can pin the calendar.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One notification per state change, in the order the changes happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    MatchResolved {
        id: MatchId,
        winner: PlayerSlot,
        amount: Money,
    },
    MatchRemoved {
        id: MatchId,
    },
    SeriesReset,
    LiveGameStarted {
        id: LiveGameId,
    },
    LiveGameCancelled {
        id: LiveGameId,
    },
    EscalationInitiated {
        id: LiveGameId,
        by: PlayerSlot,
        level: u32,
    },
    EscalationAccepted {
        id: LiveGameId,
        level: u32,
    },
    EscalationRejected {
        id: LiveGameId,
        winner: PlayerSlot,
    },
    BallsUpdated {
        id: LiveGameId,
        player: PlayerSlot,
        balls: u8,
    },
    PowerUpsStaged {
        id: LiveGameId,
        player: PlayerSlot,
    },
    WinnerDeclared {
        id: LiveGameId,
        winner: PlayerSlot,
    },
}

/// Single-owner series service. Callers serialize access; one mutex around
/// the whole value is enough for the two-player product.
pub struct Series<C: Clock = SystemClock> {
    state: GameState,
    live: Option<LiveGame>,
    clock: C,
    events: Vec<Event>,
}

impl Series<SystemClock> {
    /// Fresh series on the real clock.
    pub fn system(name_a: impl Into<String>, name_b: impl Into<String>) -> Self {
        Series::new(name_a, name_b, SystemClock)
    }
}

impl<C: Clock> Series<C> {
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>, clock: C) -> Self {
        let month = MonthKey::from_datetime(&clock.now());
        Series {
            state: GameState::new(name_a, name_b, month),
            live: None,
            clock,
            events: Vec::new(),
        }
    }

    /// Resumes a persisted series. A stale stored month gets a quota rollover
    /// on the way in.
    pub fn resume(state: GameState, live: Option<LiveGame>, clock: C) -> Self {
        let month = MonthKey::from_datetime(&clock.now());
        let state = rollover::quota_rollover(&state, month);
        Series {
            state,
            live,
            clock,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The stored live game, whatever its status. For persistence.
    pub fn live_game(&self) -> Option<&LiveGame> {
        self.live.as_ref()
    }

    pub fn active_live_game(&self) -> Option<&LiveGame> {
        self.live.as_ref().filter(|game| game.is_active())
    }

    pub fn current_month(&self) -> MonthKey {
        MonthKey::from_datetime(&self.clock.now())
    }

    /// Hands out everything that happened since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Books a manually entered result.
    pub fn resolve_match(&mut self, inputs: MatchInputs) -> Result<MatchRecord, Error> {
        let now = self.clock.now();
        let record = self.commit_resolution(&inputs, now)?;
        self.events.push(Event::MatchResolved {
            id: record.id,
            winner: record.winner,
            amount: record.amount_won,
        });
        Ok(record)
    }

    /// Strikes one match from the books and replays the rest.
    pub fn remove_match(&mut self, id: MatchId) -> Result<(), Error> {
        let month = self.current_month();
        self.state = replay::remove_match(&self.state, id, month)?;
        tracing::info!(%id, "match removed, history replayed");
        self.events.push(Event::MatchRemoved { id });
        Ok(())
    }

    /// Wipes everything: fresh state on the current month, live game gone.
    pub fn reset_all(&mut self) {
        let now = self.clock.now();
        if let Some(game) = self.live.as_mut() {
            if live::cancel(game, now).is_ok() {
                let id = game.id;
                self.events.push(Event::LiveGameCancelled { id });
            }
        }
        self.live = None;
        let name_a = self.state.players[PlayerSlot::A].name.clone();
        let name_b = self.state.players[PlayerSlot::B].name.clone();
        self.state = GameState::new(name_a, name_b, MonthKey::from_datetime(&now));
        tracing::warn!("series reset to a blank state");
        self.events.push(Event::SeriesReset);
    }

    /// Racks up a new live game; a still-active one is cancelled first.
    pub fn start_live_game(&mut self) -> &LiveGame {
        let now = self.clock.now();
        if let Some(prev) = self.live.as_mut() {
            if live::cancel(prev, now).is_ok() {
                let id = prev.id;
                tracing::info!(%id, "active live game superseded");
                self.events.push(Event::LiveGameCancelled { id });
            }
        }
        let game = LiveGame::new(LiveGameId::random(), now);
        tracing::info!(id = %game.id, "live game started");
        self.events.push(Event::LiveGameStarted { id: game.id });
        self.live.insert(game)
    }

    pub fn escalate(&mut self, id: LiveGameId, player: PlayerSlot) -> Result<LiveGame, Error> {
        let now = self.clock.now();
        let game = self.live_mut(id)?;
        live::escalate(game, player, now)?;
        let snapshot = game.clone();
        tracing::debug!(%id, %player, level = snapshot.escalation_level, "stake escalated");
        self.events.push(Event::EscalationInitiated {
            id,
            by: player,
            level: snapshot.escalation_level,
        });
        Ok(snapshot)
    }

    /// Answers a pending escalation. A rejection ends the game and resolves
    /// the match on the spot; the record is returned alongside the session.
    pub fn respond_escalation(
        &mut self,
        id: LiveGameId,
        response: EscalationResponse,
    ) -> Result<(LiveGame, Option<MatchRecord>), Error> {
        let now = self.clock.now();
        let mut updated = self.live_mut(id)?.clone();
        let bundle = live::respond(&mut updated, response, now)?;
        let record = match bundle {
            Some(inputs) => Some(self.commit_resolution(&inputs, now)?),
            None => None,
        };
        self.live = Some(updated.clone());
        match &record {
            Some(record) => {
                tracing::info!(%id, winner = %record.winner, "escalation rejected, game forfeited");
                self.events.push(Event::EscalationRejected {
                    id,
                    winner: record.winner,
                });
                self.events.push(Event::MatchResolved {
                    id: record.id,
                    winner: record.winner,
                    amount: record.amount_won,
                });
            }
            None => {
                tracing::debug!(%id, level = updated.escalation_level, "escalation accepted");
                self.events.push(Event::EscalationAccepted {
                    id,
                    level: updated.escalation_level,
                });
            }
        }
        Ok((updated, record))
    }

    pub fn update_balls(
        &mut self,
        id: LiveGameId,
        player: PlayerSlot,
        balls: u8,
    ) -> Result<LiveGame, Error> {
        let now = self.clock.now();
        let game = self.live_mut(id)?;
        live::update_balls(game, player, balls, now)?;
        let snapshot = game.clone();
        self.events.push(Event::BallsUpdated { id, player, balls });
        Ok(snapshot)
    }

    pub fn stage_power_ups(
        &mut self,
        id: LiveGameId,
        player: PlayerSlot,
        usage: PowerUpUsage,
    ) -> Result<LiveGame, Error> {
        let now = self.clock.now();
        let game = self.live_mut(id)?;
        live::stage_power_ups(game, player, usage, now)?;
        let snapshot = game.clone();
        self.events.push(Event::PowerUpsStaged { id, player });
        Ok(snapshot)
    }

    /// Ends the live game and resolves the match with multiplier
    /// `1 + escalation level`, staged power-ups included.
    pub fn declare_winner(
        &mut self,
        id: LiveGameId,
        player: PlayerSlot,
    ) -> Result<(LiveGame, MatchRecord), Error> {
        let now = self.clock.now();
        let mut updated = self.live_mut(id)?.clone();
        let inputs = live::declare_winner(&mut updated, player, now)?;
        let record = self.commit_resolution(&inputs, now)?;
        self.live = Some(updated.clone());
        tracing::info!(%id, winner = %player, multiplier = record.stake_multiplier, "live game won");
        self.events.push(Event::WinnerDeclared { id, winner: player });
        self.events.push(Event::MatchResolved {
            id: record.id,
            winner: record.winner,
            amount: record.amount_won,
        });
        Ok((updated, record))
    }

    fn live_mut(&mut self, id: LiveGameId) -> Result<&mut LiveGame, Error> {
        match self.live.as_mut() {
            Some(game) if game.id == id => Ok(game),
            _ => Err(Error::not_found(format!("live game {id}"))),
        }
    }

    fn commit_resolution(
        &mut self,
        inputs: &MatchInputs,
        now: DateTime<Utc>,
    ) -> Result<MatchRecord, Error> {
        let meta = MatchMeta {
            id: MatchId::random(),
            timestamp: now,
            month: MonthKey::from_datetime(&now),
        };
        let (next, record) = resolve::resolve(&self.state, inputs, &meta)?;
        self.state = next;
        tracing::info!(
            id = %record.id,
            winner = %record.winner,
            amount = %record.amount_won,
            "match resolved"
        );
        Ok(record)
    }
}
