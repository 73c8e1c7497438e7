//! Exact-decimal monetary amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

/// A monetary amount backed by an exact decimal.
///
/// Arithmetic keeps full precision so that chained pricing steps (size
/// multipliers, per-unit quantities, discounts) never accumulate binary
/// float drift. Rounding to cents happens only when a value leaves the
/// domain, via [`Money::rounded`], [`fmt::Display`] or [`Serialize`].
///
/// Subtraction is allowed to go below zero; clamping a total at zero is a
/// decision that belongs to the aggregate holding the total, not to the
/// amount itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The exact, unrounded amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a unit quantity.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Scale by a decimal factor such as a size multiplier.
    pub fn scale(&self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }

    /// Round to cents, half away from zero.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Money {
    fn from(whole_units: i64) -> Self {
        Self(Decimal::from(whole_units))
    }
}

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

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

/// Serialization is a domain boundary: emit the rounded amount.
impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&self.rounded().0, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn repeated_addition_stays_exact() {
        let mut total = Money::ZERO;
        for _ in 0..10 {
            total += Money::new(dec!(0.10));
        }
        assert_eq!(total, Money::new(dec!(1.00)));
    }

    #[test]
    fn times_and_scale_keep_full_precision() {
        let base = Money::new(dec!(9.99));
        let line = base.scale(dec!(1.5)).times(3);
        assert_eq!(line.amount(), dec!(44.955));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(Money::new(dec!(10.505)).rounded(), Money::new(dec!(10.51)));
        assert_eq!(Money::new(dec!(10.504)).rounded(), Money::new(dec!(10.50)));
        assert_eq!(
            Money::new(dec!(-10.505)).rounded(),
            Money::new(dec!(-10.51))
        );
    }

    #[test]
    fn display_shows_cents() {
        assert_eq!(Money::new(dec!(44.955)).to_string(), "44.96");
        assert_eq!(Money::from(7).to_string(), "7.00");
    }

    #[test]
    fn serialization_emits_rounded_amount() {
        let json = serde_json::to_string(&Money::new(dec!(44.955))).unwrap();
        assert_eq!(json, "\"44.96\"");

        let back: Money = serde_json::from_str("\"12.345\"").unwrap();
        assert_eq!(back.amount(), dec!(12.345));
    }

    #[test]
    fn subtraction_may_go_negative_and_clamps_via_max() {
        let total = Money::new(dec!(5.00)) - Money::new(dec!(8.00));
        assert!(total.is_negative());
        assert_eq!(total.max(Money::ZERO), Money::ZERO);
    }
}
