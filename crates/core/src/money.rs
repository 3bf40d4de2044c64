//! Monetary value objects.
//!
//! Amounts are integer cents. Rounding to the cent happens exactly once, when a
//! fractional amount (rate × duration, HT × tax rate, total ÷ quantity) is turned
//! into a `Money`, and always rounds half away from zero ("half-up" for the
//! non-negative amounts billing deals with).
//!
//! Arithmetic is checked: an amount that does not fit in `i64` cents is a
//! `DomainError`, never a wrap or a panic.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Integer division of `num / den` rounded half away from zero.
///
/// `den` must be strictly positive.
pub fn div_round_half_up(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0, "denominator must be positive");
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((-2 * num + den) / (2 * den))
    }
}

/// An amount in the smallest currency unit (cents).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount accepted from input (10 billion currency units).
    pub const MAX_INPUT: Money = Money(1_000_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units (e.g. `Money::from_units(150)` is 150.00).
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Convert a decimal amount (as received from JSON) into cents, half-up.
    pub fn from_decimal(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        let cents = (value * 100.0).round();
        if cents.abs() > Self::MAX_INPUT.0 as f64 {
            return Err(DomainError::validation(format!(
                "amount out of range (max {})",
                Self::MAX_INPUT
            )));
        }
        Ok(Self(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Money) -> DomainResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(overflow)
    }

    /// Checked sum of `amounts`.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> DomainResult<Self> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    /// `self × num / den`, rounded half-up to the cent.
    pub fn mul_ratio(self, num: i64, den: i64) -> DomainResult<Self> {
        if den <= 0 {
            return Err(DomainError::validation("ratio denominator must be positive"));
        }
        let v = div_round_half_up(i128::from(self.0) * i128::from(num), i128::from(den));
        i64::try_from(v).map(Self).map_err(|_| overflow())
    }

    /// `self × quantity` (exact).
    pub fn times(self, quantity: u32) -> DomainResult<Self> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// Share of `self` per unit when split across `parts`, rounded half-up.
    ///
    /// The remainder is dropped: `share × parts` may differ from `self` by up to
    /// `parts / 2` cents.
    pub fn per_unit(self, parts: u32) -> DomainResult<Self> {
        if parts == 0 {
            return Err(DomainError::validation("cannot split an amount into zero parts"));
        }
        let v = div_round_half_up(i128::from(self.0), i128::from(parts));
        i64::try_from(v).map(Self).map_err(|_| overflow())
    }
}

fn overflow() -> DomainError {
    DomainError::validation("amount out of range")
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// A tax rate in basis points (2000 = 20 %).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl ValueObject for TaxRate {}

impl TaxRate {
    /// French standard VAT rate (20 %).
    pub const STANDARD: TaxRate = TaxRate(2000);

    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Tax due on `amount`: `amount × rate / 100`, rounded half-up to the cent.
    pub fn tax_on(self, amount: Money) -> DomainResult<Money> {
        amount.mul_ratio(i64::from(self.0), 10_000)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::STANDARD
    }
}
