//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog backend does not say which currency its prices are in, so a
//! [`Price`] is just an amount. It deserializes from either a JSON number or a
//! decimal string and renders with two decimals.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a price from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The value is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The value is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A product price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Format for display (e.g., "$1299.90").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }
}
