use crate::{
    Error, BALL_BOUNTY_QUOTA, BIG_RACK_QUOTA, CUMBACK_KID_QUOTA, DOUBLE_TROUBLE_QUOTA,
    PULL_THE_PLUG_QUOTA, SNIPER_QUOTA, SPEEDPOT_QUOTA, TOEP_QUOTA,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every power-up in the catalog.
///
/// Effects split into five categories: additive streak bonus (Toep, Big Rack,
/// Sniper), opponent streak reset (Pull The Plug, and Cumback Kid on the
/// loser side), flat monetary bonus (Black Ball, Ball Bounty), monetary
/// multiplier (Double Trouble), and pure declaration (Speedpot).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PowerUpKind {
    Toep,
    CumbackKid,
    PullThePlug,
    BigRack,
    Sniper,
    BallBounty,
    DoubleTrouble,
    Speedpot,
    BlackBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::Toep,
        PowerUpKind::CumbackKid,
        PowerUpKind::PullThePlug,
        PowerUpKind::BigRack,
        PowerUpKind::Sniper,
        PowerUpKind::BallBounty,
        PowerUpKind::DoubleTrouble,
        PowerUpKind::Speedpot,
        PowerUpKind::BlackBall,
    ];

    /// Uses allowed per calendar month; `None` means unlimited.
    pub fn monthly_quota(self) -> Option<u32> {
        match self {
            PowerUpKind::Toep => Some(TOEP_QUOTA),
            PowerUpKind::CumbackKid => Some(CUMBACK_KID_QUOTA),
            PowerUpKind::PullThePlug => Some(PULL_THE_PLUG_QUOTA),
            PowerUpKind::BigRack => Some(BIG_RACK_QUOTA),
            PowerUpKind::Sniper => Some(SNIPER_QUOTA),
            PowerUpKind::BallBounty => Some(BALL_BOUNTY_QUOTA),
            PowerUpKind::DoubleTrouble => Some(DOUBLE_TROUBLE_QUOTA),
            PowerUpKind::Speedpot => Some(SPEEDPOT_QUOTA),
            PowerUpKind::BlackBall => None,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerUpKind::Toep => "Toep",
            PowerUpKind::CumbackKid => "Cumback Kid",
            PowerUpKind::PullThePlug => "Pull The Plug",
            PowerUpKind::BigRack => "Big Rack",
            PowerUpKind::Sniper => "Sniper",
            PowerUpKind::BallBounty => "Ball Bounty",
            PowerUpKind::DoubleTrouble => "Double Trouble",
            PowerUpKind::Speedpot => "Speedpot",
            PowerUpKind::BlackBall => "Black Ball",
        };
        f.write_str(name)
    }
}

/// Remaining uses per power-up for one player. Unlimited kinds are absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerUpQuota(BTreeMap<PowerUpKind, u32>);

impl PowerUpQuota {
    /// The full monthly allotment.
    pub fn initial() -> Self {
        PowerUpQuota(
            PowerUpKind::ALL
                .into_iter()
                .filter_map(|kind| kind.monthly_quota().map(|quota| (kind, quota)))
                .collect(),
        )
    }

    /// Remaining uses; `None` for unlimited kinds.
    pub fn remaining(&self, kind: PowerUpKind) -> Option<u32> {
        kind.monthly_quota()?;
        Some(self.0.get(&kind).copied().unwrap_or(0))
    }

    /// Spend one use. Unlimited kinds always succeed without bookkeeping.
    pub fn try_consume(&mut self, kind: PowerUpKind) -> Result<(), Error> {
        if kind.monthly_quota().is_none() {
            return Ok(());
        }
        let remaining = self.0.entry(kind).or_insert(0);
        if *remaining == 0 {
            return Err(Error::QuotaExceeded(kind));
        }
        *remaining -= 1;
        Ok(())
    }
}

impl Default for PowerUpQuota {
    fn default() -> Self {
        PowerUpQuota::initial()
    }
}

/// A reported Sniper run: how many balls were potted in a row and whether
/// the called attempt actually landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniperAttempt {
    pub balls_potted: u8,
    pub successful: bool,
}

/// A Double Trouble call; the doubling only applies when it succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleTroubleAttempt {
    pub successful: bool,
}

/// The power-ups one side invoked for a single match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpUsage {
    #[serde(default)]
    pub toep: bool,
    #[serde(default)]
    pub cumback_kid: bool,
    #[serde(default)]
    pub pull_the_plug: bool,
    #[serde(default)]
    pub big_rack: bool,
    #[serde(default)]
    pub ball_bounty: bool,
    #[serde(default)]
    pub black_ball: bool,
    #[serde(default)]
    pub speedpot: bool,
    #[serde(default)]
    pub sniper: Option<SniperAttempt>,
    #[serde(default)]
    pub double_trouble: Option<DoubleTroubleAttempt>,
}

impl PowerUpUsage {
    /// Whether this side invoked anything at all.
    pub fn any(&self) -> bool {
        self.toep
            || self.cumback_kid
            || self.pull_the_plug
            || self.big_rack
            || self.ball_bounty
            || self.black_ball
            || self.speedpot
            || self.sniper.is_some()
            || self.double_trouble.is_some()
    }
}
