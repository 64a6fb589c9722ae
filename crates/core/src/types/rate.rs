//! Exchange rate configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing an [`ExchangeRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    /// The rate is zero or negative.
    #[error("la tasa debe ser un número mayor que 0")]
    NotPositive,
    /// The input is not a valid decimal number.
    #[error("la tasa debe ser un número válido")]
    NotANumber,
}

/// The store-wide USD → Bs exchange rate (the day's BCV rate).
///
/// A single scalar, owned by the backend configuration and mutable only
/// through the admin console. Views fetch it for secondary-currency
/// display; the client never does money math with it beyond conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Create a rate from a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::NotPositive`] unless the value is > 0.
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value <= Decimal::ZERO {
            return Err(RateError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Parse a rate from user input.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::NotANumber`] for unparseable input and
    /// [`RateError::NotPositive`] for values <= 0.
    pub fn parse(input: &str) -> Result<Self, RateError> {
        let value: Decimal = input.trim().parse().map_err(|_| RateError::NotANumber)?;
        Self::new(value)
    }

    /// The raw multiplier.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Convert a USD amount to the local currency.
    #[must_use]
    pub fn convert(self, usd: Decimal) -> Decimal {
        usd * self.0
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
