use crate::PowerUpKind;

/// Everything the rules engine and the live-game state machine can refuse.
///
/// These are business-rule violations, not transient faults: the caller
/// surfaces the message and leaves state alone. Every operation is
/// all-or-nothing, so an `Err` guarantees nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A power-up's eligibility condition failed (e.g. too few own balls).
    #[error("{kind} precondition failed: {reason}")]
    Precondition { kind: PowerUpKind, reason: String },

    /// The monthly allotment for this power-up is already spent.
    #[error("monthly quota for {0} is exhausted")]
    QuotaExceeded(PowerUpKind),

    /// Unknown match id, or no live game where one was expected.
    #[error("{0} not found")]
    NotFound(String),

    /// A state-machine transition attempted from a state that forbids it.
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// A mutation aimed at a live game that already finished or was
    /// cancelled.
    #[error("live game is no longer active")]
    StaleGame,
}

impl Error {
    pub fn precondition(kind: PowerUpKind, reason: impl Into<String>) -> Self {
        Error::Precondition {
            kind,
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        Error::IllegalTransition(reason.into())
    }
}
