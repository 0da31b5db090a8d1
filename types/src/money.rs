use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Monetary amount in whole euro-cents.
///
/// All stake arithmetic is integer; there is no floating point anywhere in
/// the rules. Serialized as the raw cent count.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn from_euros(euros: i64) -> Self {
        Money(euros * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Absolute difference between two amounts.
    pub fn abs_diff(self, other: Self) -> Self {
        Money((self.0 - other.0).abs())
    }

    /// Multiply by an integer factor, clamping instead of wrapping.
    pub fn saturating_mul(self, factor: i64) -> Self {
        Money(self.0.saturating_mul(factor))
    }

    /// Multiply by `2^exp`, clamping instead of wrapping. A streak long
    /// enough to overflow i64 cents is not a payable amount anyway.
    pub fn saturating_shl(self, exp: u32) -> Self {
        if exp >= 63 {
            return Money(if self.0 >= 0 { i64::MAX } else { i64::MIN });
        }
        self.saturating_mul(1i64 << exp)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}€{}.{:02}", sign, abs / 100, abs % 100)
    }
}
