use crate::Money;

/// Stake for a one-win streak; doubles with every further consecutive win.
pub const BASE_STAKE: Money = Money::from_cents(50);

/// Running-total gap beyond which the anti-runaway cap activates.
pub const CAP_THRESHOLD: Money = Money::from_euros(150);

/// Payout ceiling for the first capped win of a run.
pub const CAP_BASE: Money = Money::from_euros(10);

/// Ceiling growth per additional same-month win while capped.
pub const CAP_INCREMENT: Money = Money::from_euros(2);

/// Ball Bounty penalty charged per ball the loser left on the table.
pub const BALL_BOUNTY_PER_BALL: Money = Money::from_euros(2);

/// Flat bonus for sinking the black ball on the final shot.
pub const BLACK_BALL_BONUS: Money = Money::from_euros(5);

/// Balls each player racks at the start of a live game.
pub const STARTING_BALLS: u8 = 7;

/// Upper bound for any remaining-balls count.
pub const MAX_BALLS: u8 = 7;

/// Streak at which the stake is considered dangerous (€16 and climbing).
/// Display hint only; no rule reads it.
pub const DANGER_ZONE_STREAK: u32 = 6;

/// Toep uses per month.
pub const TOEP_QUOTA: u32 = 5;

/// Cumback Kid uses per month.
pub const CUMBACK_KID_QUOTA: u32 = 1;

/// Pull The Plug uses per month.
pub const PULL_THE_PLUG_QUOTA: u32 = 1;

/// Big Rack uses per month.
pub const BIG_RACK_QUOTA: u32 = 1;

/// Sniper uses per month.
pub const SNIPER_QUOTA: u32 = 3;

/// Ball Bounty uses per month.
pub const BALL_BOUNTY_QUOTA: u32 = 5;

/// Double Trouble uses per month.
pub const DOUBLE_TROUBLE_QUOTA: u32 = 1;

/// Speedpot uses per month.
pub const SPEEDPOT_QUOTA: u32 = 2;
