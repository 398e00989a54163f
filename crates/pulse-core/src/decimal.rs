//! Precision-safe decimal types for market data.
//!
//! Uses `rust_decimal` for exact decimal arithmetic so that a price republished
//! by the feed compares equal to the stored one, which floating point does not
//! guarantee after a string round-trip.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Last traded price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with percentages or volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Parse a wire string and require a strictly positive value.
    pub fn parse_positive(raw: &str) -> Result<Self> {
        let price: Self = raw.trim().parse()?;
        if !price.is_positive() {
            return Err(CoreError::InvalidPrice(format!(
                "price must be > 0, got {raw}"
            )));
        }
        Ok(price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Signed percentage change (e.g. 24h change, `-2.35` means -2.35%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Zero counts as non-negative (rendered with the positive color).
    #[inline]
    pub fn is_non_negative(&self) -> bool {
        self.0 >= Decimal::ZERO
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self(raw.trim().parse()?))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Percent {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// 24h traded volume in quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(pub Decimal);

impl Volume {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Parse a wire string and require a non-negative value.
    pub fn parse_non_negative(raw: &str) -> Result<Self> {
        let value: Decimal = raw.trim().parse()?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CoreError::InvalidVolume(format!(
                "volume must be >= 0, got {raw}"
            )));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Volume {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_parse_positive() {
        let price = Price::parse_positive("67123.45000000").unwrap();
        assert_eq!(price, Price::new(dec!(67123.45)));
    }

    #[test]
    fn test_price_rejects_zero_and_negative() {
        assert!(Price::parse_positive("0.00000000").is_err());
        assert!(Price::parse_positive("-1").is_err());
        assert!(Price::parse_positive("abc").is_err());
    }

    #[test]
    fn test_trailing_zeros_compare_equal() {
        // Feed republishes with different scale; equality must be numeric.
        assert_eq!(Price::new(dec!(100.10)), Price::new(dec!(100.1)));
    }

    #[test]
    fn test_percent_sign() {
        assert!(Percent::parse("0.000").unwrap().is_non_negative());
        assert!(!Percent::parse("-1.25").unwrap().is_non_negative());
        assert_eq!(Percent::new(dec!(-1.25)).abs(), Percent::new(dec!(1.25)));
    }

    #[test]
    fn test_volume_rejects_negative() {
        assert!(Volume::parse_non_negative("-5").is_err());
        assert_eq!(Volume::parse_non_negative("0").unwrap(), Volume::ZERO);
    }
}
