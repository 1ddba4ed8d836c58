//! Monetary amounts as fixed-point minor units.

use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Monetary amount in the smallest currency unit (e.g., cents).
///
/// Rendered and serialized as a fixed-point decimal string (`2000` →
/// `"20.00"`) so downstream consumers keep exact precision regardless of
/// their decimal type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }

    /// Line subtotal: unit price times quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * u64::from(quantity))
    }
}

impl ValueObject for Money {}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Accepts `"20"`, `"20.5"`, `"20.00"`; at most two fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (s, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        if !all_digits(whole) || frac.is_some_and(|f| !all_digits(f) || f.len() > 2) {
            return Err(DomainError::validation(format!("malformed amount: {s:?}")));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("amount out of range: {s:?}")))?;
        let cents = match frac {
            None => 0,
            Some(f) if f.len() == 1 => f.parse::<u64>().unwrap_or(0) * 10,
            Some(f) => f.parse::<u64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|units| units.checked_add(cents))
            .map(Money)
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {s:?}")))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
