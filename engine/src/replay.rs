//! History correction by replay. Records are never edited in place; removing
//! one means rebuilding the aggregate from the remaining log.

use crate::resolve::{resolve, MatchInputs, MatchMeta};
use crate::rollover;
use chalkline_types::{Error, GameState, MatchId, MonthKey, PlayerSlot};

/// Removes one match and re-resolves every remaining record in original
/// order, each with its own stored inputs and meta. Linear in the log size,
/// which is two players' evenings of pool, not a ledger.
pub fn remove_match(
    state: &GameState,
    id: MatchId,
    now_month: MonthKey,
) -> Result<GameState, Error> {
    if state.find_match(id).is_none() {
        return Err(Error::not_found(format!("match {id}")));
    }

    let remaining: Vec<_> = state
        .matches
        .iter()
        .filter(|record| record.id != id)
        .collect();

    let start_month = remaining.first().map(|r| r.month).unwrap_or(now_month);
    let mut next = GameState::new(
        state.players[PlayerSlot::A].name.clone(),
        state.players[PlayerSlot::B].name.clone(),
        start_month,
    );
    for record in remaining {
        let inputs = MatchInputs::from_record(record);
        let meta = MatchMeta::from_record(record);
        let (replayed, _) = resolve(&next, &inputs, &meta)?;
        next = replayed;
    }

    // The replay ends on the last record's month; bring the quotas forward if
    // the calendar has moved on since.
    Ok(rollover::quota_rollover(&next, now_month))
}
