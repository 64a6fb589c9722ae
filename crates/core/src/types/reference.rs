//! Payment reference codes.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PaymentReference`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference is shorter than 4 or longer than 6 digits.
    #[error("la referencia debe tener entre 4 y 6 dígitos")]
    BadLength,
    /// The reference contains something other than ASCII digits.
    #[error("la referencia debe contener solo números")]
    NotNumeric,
}

/// A mobile-payment reference code: the numeric proof of an out-of-band
/// bank transfer, submitted for manual verification.
///
/// ## Constraints
///
/// - 4 to 6 characters
/// - ASCII digits only (leading zeros are significant, so this is not a
///   number)
///
/// Validation happens here, before any network call; the backend applies
/// the same rules and remains authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Parse a `PaymentReference` from user input.
    ///
    /// Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::NotNumeric`] if any character is not an
    /// ASCII digit, or [`ReferenceError::BadLength`] if the digit count is
    /// outside 4..=6.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let trimmed = input.trim();
        if !trimmed.is_empty() && !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReferenceError::NotNumeric);
        }
        if trimmed.len() < 4 || trimmed.len() > 6 {
            return Err(ReferenceError::BadLength);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_4_to_6_digits() {
        for input in ["1234", "12345", "123456", "0042"] {
            let reference = PaymentReference::parse(input).unwrap();
            assert_eq!(reference.as_str(), input);
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(
            PaymentReference::parse("123"),
            Err(ReferenceError::BadLength)
        );
        assert_eq!(
            PaymentReference::parse("1234567"),
            Err(ReferenceError::BadLength)
        );
        assert_eq!(PaymentReference::parse(""), Err(ReferenceError::BadLength));
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(
            PaymentReference::parse("12a45"),
            Err(ReferenceError::NotNumeric)
        );
        assert_eq!(
            PaymentReference::parse("12 45"),
            Err(ReferenceError::NotNumeric)
        );
        assert_eq!(
            PaymentReference::parse("-1234"),
            Err(ReferenceError::NotNumeric)
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let reference = PaymentReference::parse("  123456 ").unwrap();
        assert_eq!(reference.as_str(), "123456");
    }

    #[test]
    fn serializes_as_a_plain_string() {
        let reference = PaymentReference::parse("0042").unwrap();
        assert_eq!(serde_json::to_string(&reference).unwrap(), "\"0042\"");
    }
}
