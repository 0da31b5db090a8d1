use crate::{PerPlayer, PlayerSlot, PowerUpUsage, STARTING_BALLS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a live game session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LiveGameId(pub Uuid);

impl LiveGameId {
    pub fn random() -> Self {
        LiveGameId(Uuid::new_v4())
    }
}

impl fmt::Display for LiveGameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a live game. At most one session is `Active` at a time;
/// starting a new one cancels the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveStatus {
    Active,
    Finished,
    Cancelled,
}

/// Answer to a pending escalation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationResponse {
    Accept,
    Reject,
}

/// A single in-progress game layered on top of the series state.
///
/// Tracks ball counts, the Toep escalation handshake, and power-up
/// selections staged for resolution. Supplies one input bundle to the match
/// resolution engine when it ends; it is never persisted into the match log
/// itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveGame {
    pub id: LiveGameId,
    pub status: LiveStatus,
    /// Balls each player still has on the table (0-7).
    pub balls: PerPlayer<u8>,
    /// Accepted (or pending) escalations so far; 0 = base stake.
    pub escalation_level: u32,
    /// Who raised last. A player may not raise twice in a row.
    pub last_escalated_by: Option<PlayerSlot>,
    /// Initiator of an escalation still awaiting accept/reject.
    pub pending_escalation: Option<PlayerSlot>,
    /// Set when the game finishes.
    pub winner: Option<PlayerSlot>,
    /// Power-ups each side has staged for resolution.
    pub staged_power_ups: PerPlayer<Option<PowerUpUsage>>,
    pub started_at: DateTime<Utc>,
    pub last_action_at: DateTime<Utc>,
}

impl LiveGame {
    pub fn new(id: LiveGameId, now: DateTime<Utc>) -> Self {
        LiveGame {
            id,
            status: LiveStatus::Active,
            balls: PerPlayer::new(STARTING_BALLS, STARTING_BALLS),
            escalation_level: 0,
            last_escalated_by: None,
            pending_escalation: None,
            winner: None,
            staged_power_ups: PerPlayer::new(None, None),
            started_at: now,
            last_action_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LiveStatus::Active
    }
}
