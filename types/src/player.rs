use crate::{Money, PowerUpQuota};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two fixed seats in the series. Every rule is written against a
/// slot, never a name, so winner and loser are treated symmetrically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    A,
    B,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::A, PlayerSlot::B];

    pub fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::A => PlayerSlot::B,
            PlayerSlot::B => PlayerSlot::A,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::A => f.write_str("A"),
            PlayerSlot::B => f.write_str("B"),
        }
    }
}

/// A pair of values, one per seat, indexable by [`PlayerSlot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerPlayer<T> {
    pub fn new(a: T, b: T) -> Self {
        PerPlayer { a, b }
    }

    pub fn get(&self, slot: PlayerSlot) -> &T {
        match slot {
            PlayerSlot::A => &self.a,
            PlayerSlot::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, slot: PlayerSlot) -> &mut T {
        match slot {
            PlayerSlot::A => &mut self.a,
            PlayerSlot::B => &mut self.b,
        }
    }
}

impl<T> Index<PlayerSlot> for PerPlayer<T> {
    type Output = T;
    fn index(&self, slot: PlayerSlot) -> &T {
        self.get(slot)
    }
}

impl<T> IndexMut<PlayerSlot> for PerPlayer<T> {
    fn index_mut(&mut self, slot: PlayerSlot) -> &mut T {
        self.get_mut(slot)
    }
}

/// Per-player series state: current streak, what they have won this month,
/// and how many uses of each power-up remain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub streak: u32,
    pub monthly_total: Money,
    pub quota: PowerUpQuota,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            streak: 0,
            monthly_total: Money::ZERO,
            quota: PowerUpQuota::initial(),
        }
    }
}
