//! The Toep state machine: stake escalation inside a game that is still on
//! the table.
//!
//! Transitions mutate the session in place and fail without partial effects;
//! every guard runs before the first field is written. The session never
//! touches the series aggregate itself; when a game ends, [`declare_winner`]
//! or a rejected escalation hands back the input bundle the resolution engine
//! consumes.

use crate::resolve::MatchInputs;
use chalkline_types::{
    Error, EscalationResponse, LiveGame, LiveStatus, PlayerSlot, PowerUpUsage, WinCondition,
    MAX_BALLS,
};
use chrono::{DateTime, Utc};

fn ensure_active(game: &LiveGame) -> Result<(), Error> {
    if game.is_active() {
        Ok(())
    } else {
        Err(Error::StaleGame)
    }
}

/// Raises the stake by one level, to be accepted or rejected by the
/// opponent. Illegal while a raise is already on the table, and a player may
/// not raise twice in a row.
pub fn escalate(game: &mut LiveGame, player: PlayerSlot, now: DateTime<Utc>) -> Result<(), Error> {
    ensure_active(game)?;
    if game.pending_escalation.is_some() {
        return Err(Error::illegal("an escalation is already awaiting a response"));
    }
    if game.last_escalated_by == Some(player) {
        return Err(Error::illegal(
            "same player cannot escalate twice in a row; the opponent must respond first",
        ));
    }
    game.escalation_level = game.escalation_level.saturating_add(1);
    game.last_escalated_by = Some(player);
    game.pending_escalation = Some(player);
    game.last_action_at = now;
    Ok(())
}

/// Answers a pending raise.
///
/// Accept locks in the new level and play continues; either player may raise
/// again afterwards. Reject forfeits on the spot: the initiator wins at the
/// base stake, not the escalated one, and the returned input bundle carries
/// `EarlyForfeit` with multiplier 1.
pub fn respond(
    game: &mut LiveGame,
    response: EscalationResponse,
    now: DateTime<Utc>,
) -> Result<Option<MatchInputs>, Error> {
    ensure_active(game)?;
    let initiator = game
        .pending_escalation
        .ok_or_else(|| Error::illegal("no escalation awaiting a response"))?;
    game.last_action_at = now;
    match response {
        EscalationResponse::Accept => {
            game.pending_escalation = None;
            game.last_escalated_by = None;
            Ok(None)
        }
        EscalationResponse::Reject => {
            game.status = LiveStatus::Finished;
            game.winner = Some(initiator);
            game.pending_escalation = None;
            Ok(Some(input_bundle(game, initiator, WinCondition::EarlyForfeit, 1)))
        }
    }
}

/// Records how many balls `player` still has on the table.
pub fn update_balls(
    game: &mut LiveGame,
    player: PlayerSlot,
    count: u8,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    ensure_active(game)?;
    if count > MAX_BALLS {
        return Err(Error::illegal(format!(
            "ball count {count} out of range (0-{MAX_BALLS})"
        )));
    }
    game.balls[player] = count;
    game.last_action_at = now;
    Ok(())
}

/// Stores the power-ups `player` wants applied at resolution. Replaces any
/// earlier selection for that side; an empty usage clears it.
pub fn stage_power_ups(
    game: &mut LiveGame,
    player: PlayerSlot,
    usage: PowerUpUsage,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    ensure_active(game)?;
    game.staged_power_ups[player] = Some(usage).filter(PowerUpUsage::any);
    game.last_action_at = now;
    Ok(())
}

/// Ends the game normally. Illegal while a raise is unanswered; the stake
/// multiplier is `1 + escalation level`.
pub fn declare_winner(
    game: &mut LiveGame,
    player: PlayerSlot,
    now: DateTime<Utc>,
) -> Result<MatchInputs, Error> {
    ensure_active(game)?;
    if game.pending_escalation.is_some() {
        return Err(Error::illegal(
            "cannot declare a winner while an escalation awaits a response",
        ));
    }
    game.status = LiveStatus::Finished;
    game.winner = Some(player);
    game.last_action_at = now;
    let multiplier = game.escalation_level.saturating_add(1);
    Ok(input_bundle(game, player, WinCondition::Normal, multiplier))
}

/// Abandons the session without resolving a match.
pub fn cancel(game: &mut LiveGame, now: DateTime<Utc>) -> Result<(), Error> {
    ensure_active(game)?;
    game.status = LiveStatus::Cancelled;
    game.last_action_at = now;
    Ok(())
}

fn input_bundle(
    game: &LiveGame,
    winner: PlayerSlot,
    win_condition: WinCondition,
    stake_multiplier: u32,
) -> MatchInputs {
    MatchInputs {
        winner,
        win_condition,
        loser_balls: game.balls[winner.opponent()],
        own_balls: game.balls,
        power_ups: game.staged_power_ups,
        stake_multiplier,
    }
}
