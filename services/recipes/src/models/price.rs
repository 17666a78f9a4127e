//! Fixed-point recipe price

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Price with exactly two decimal places, stored as `NUMERIC(5, 2)`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Total number of digits the column holds
    pub const MAX_DIGITS: u32 = 5;
    /// Digits after the decimal point
    pub const DECIMAL_PLACES: u32 = 2;

    /// Round half away from zero to two decimal places
    ///
    /// Fails when the rounded value needs more than three integer digits.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        let strategy = RoundingStrategy::MidpointAwayFromZero;
        let mut rounded = amount.round_dp_with_strategy(Self::DECIMAL_PLACES, strategy);
        rounded.rescale(Self::DECIMAL_PLACES);

        let limit = Decimal::from(10_i64.pow(Self::MAX_DIGITS - Self::DECIMAL_PLACES));
        if rounded.abs() >= limit {
            return Err(ValidationError::PriceOutOfRange { value: amount });
        }

        Ok(Self(rounded))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
