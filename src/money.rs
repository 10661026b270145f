//! Monetary amounts with exactly two decimal places.
//!
//! Amounts are kept as an integer number of cents so that sums never pick up
//! binary floating point rounding errors. At the edges of the app (JSON and
//! reports) they are exposed as [Decimal] values.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// The number of digits kept after the decimal point.
pub const DECIMAL_PLACES: u32 = 2;

/// The largest amount that fits in a `decimal(18, 2)` column, in cents.
const MAX_CENTS: i64 = 999_999_999_999_999_999;

/// A zero amount with two decimal places, e.g. "0.00".
pub fn zero() -> Decimal {
    Decimal::new(0, DECIMAL_PLACES)
}

/// A strictly positive amount of money with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// Create an amount from a decimal value.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `value` is zero or negative,
    /// - [Error::TooManyDecimalPlaces] if `value` has non-zero digits beyond the second decimal place,
    /// - or [Error::AmountTooLarge] if `value` does not fit in a `decimal(18, 2)`.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(value));
        }

        if value.normalize().scale() > DECIMAL_PLACES {
            return Err(Error::TooManyDecimalPlaces(value));
        }

        let mut scaled = value;
        scaled.rescale(DECIMAL_PLACES);

        match i64::try_from(scaled.mantissa()) {
            Ok(cents) if cents <= MAX_CENTS => Ok(Self { cents }),
            _ => Err(Error::AmountTooLarge(value)),
        }
    }

    /// Create an amount from a number of cents read from the database.
    ///
    /// The caller should ensure that `cents` is positive.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// The amount in cents, as stored in the database.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// The amount as a decimal value with two decimal places.
    pub fn value(&self) -> Decimal {
        Decimal::new(self.cents, DECIMAL_PLACES)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.value(), serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;

        Amount::new(value).map_err(serde::de::Error::custom)
    }
}
