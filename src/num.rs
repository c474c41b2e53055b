//! Numeric backends for indicator arithmetic
//!
//! Every indicator is generic over [`Num`], so the same formulas run on exact
//! decimals ([`rust_decimal::Decimal`]) or on plain `f64`. Threshold comparisons
//! are only fully deterministic with the exact backend.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;

/// Comparable number used for prices and derived indicator values.
pub trait Num:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;

    fn from_usize(value: usize) -> Self;

    /// Converts a configuration coefficient. `None` if not representable.
    fn from_f64(value: f64) -> Option<Self>;

    fn abs(self) -> Self;

    fn min(self, other: Self) -> Self;

    fn max(self, other: Self) -> Self;

    /// Division that reports a zero divisor or overflow as `None`.
    fn checked_div(self, rhs: Self) -> Option<Self>;

    fn checked_mul(self, rhs: Self) -> Option<Self>;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    #[inline]
    fn one() -> Self {
        Self::from_usize(1)
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

impl Num for Decimal {
    #[inline]
    fn zero() -> Self {
        Decimal::ZERO
    }

    #[inline]
    fn from_usize(value: usize) -> Self {
        Decimal::from(value as u64)
    }

    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        rust_decimal::prelude::FromPrimitive::from_f64(value)
    }

    #[inline]
    fn abs(self) -> Self {
        Decimal::abs(&self)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        std::cmp::Ord::min(self, other)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        std::cmp::Ord::max(self, other)
    }

    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        Decimal::checked_div(self, rhs)
    }

    #[inline]
    fn checked_mul(self, rhs: Self) -> Option<Self> {
        Decimal::checked_mul(self, rhs)
    }

    #[inline]
    fn checked_add(self, rhs: Self) -> Option<Self> {
        Decimal::checked_add(self, rhs)
    }
}

impl Num for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn from_usize(value: usize) -> Self {
        value as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(value)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        f64::min(self, other)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f64::max(self, other)
    }

    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs == 0.0 {
            return None;
        }
        let quotient = self / rhs;
        quotient.is_finite().then_some(quotient)
    }

    #[inline]
    fn checked_mul(self, rhs: Self) -> Option<Self> {
        let product = self * rhs;
        product.is_finite().then_some(product)
    }

    #[inline]
    fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self + rhs;
        sum.is_finite().then_some(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_division_by_zero_is_none() {
        assert_eq!(Num::checked_div(dec!(1.8), Decimal::ZERO), None);
        assert_eq!(Num::checked_div(dec!(1.8), dec!(0.2)), Some(dec!(9)));
    }

    #[test]
    fn test_f64_division_by_zero_is_none() {
        assert_eq!(Num::checked_div(1.0_f64, 0.0), None);
        assert_eq!(Num::checked_div(1.0_f64, -0.0), None);
        assert_eq!(Num::checked_div(3.0_f64, 2.0), Some(1.5));
    }

    #[test]
    fn test_checked_mul_and_add_report_overflow() {
        assert_eq!(Num::checked_mul(Decimal::MAX, dec!(100)), None);
        assert_eq!(Num::checked_add(Decimal::MAX, Decimal::MAX), None);
        assert_eq!(Num::checked_mul(dec!(0.25), dec!(100)), Some(dec!(25)));
        assert_eq!(Num::checked_mul(f64::MAX, 100.0), None);
        assert_eq!(Num::checked_add(f64::MAX, f64::MAX), None);
        assert_eq!(Num::checked_add(1.5_f64, 2.0), Some(3.5));
    }

    #[test]
    fn test_min_max_abs() {
        assert_eq!(Num::min(dec!(10), dec!(10.2)), dec!(10));
        assert_eq!(Num::max(dec!(10), dec!(10.2)), dec!(10.2));
        assert_eq!(Num::abs(dec!(-0.2)), dec!(0.2));
        assert_eq!(Num::max(-1.5_f64, 2.0), 2.0);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(<Decimal as Num>::from_f64(2.0), Some(dec!(2)));
        assert_eq!(<f64 as Num>::from_f64(f64::NAN), None);
        assert!(<Decimal as Num>::from_usize(20).is_sign_positive());
        assert!(<Decimal as Num>::zero().is_zero());
    }
}
