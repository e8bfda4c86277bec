//! Phone identifier normalization and validation.

use std::fmt;
use thiserror::Error;

/// Validation failures for the supplied phone number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number required")]
    Missing,

    #[error("invalid phone number: {0}")]
    Invalid(String),
}

/// A validated phone number as an E.164 digit string, without the leading
/// `+`. Only constructed through [`PhoneIdentifier::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneIdentifier(String);

impl PhoneIdentifier {
    /// Normalize free-form input into a canonical E.164 digit string.
    ///
    /// Strips every non-digit character, then validates the digit count
    /// against E.164 limits. Empty input is rejected before any numbering
    /// checks run.
    pub fn normalize(raw: &str) -> Result<Self, PhoneError> {
        if raw.trim().is_empty() {
            return Err(PhoneError::Missing);
        }

        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(PhoneError::Invalid("no digits present".into()));
        }
        if digits.len() < 7 {
            return Err(PhoneError::Invalid("too short".into()));
        }
        if digits.len() > 15 {
            return Err(PhoneError::Invalid("too long".into()));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic chat address of the owning device.
    pub fn user_address(&self) -> String {
        format!("{}@s.whatsapp.net", self.0)
    }

    /// Directory name of this identifier's session store scope.
    pub fn store_dir_name(&self) -> String {
        format!("session_{}", self.0)
    }
}

impl fmt::Display for PhoneIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        let id = PhoneIdentifier::normalize("+1 (202) 555-0173").unwrap();
        assert_eq!(id.as_str(), "12025550173");
    }

    #[test]
    fn test_normalize_plain_digits() {
        let id = PhoneIdentifier::normalize("4915112345678").unwrap();
        assert_eq!(id.as_str(), "4915112345678");
    }

    #[test]
    fn test_missing_before_validation() {
        assert_eq!(PhoneIdentifier::normalize(""), Err(PhoneError::Missing));
        assert_eq!(PhoneIdentifier::normalize("   "), Err(PhoneError::Missing));
    }

    #[test]
    fn test_too_short_is_invalid() {
        assert!(matches!(
            PhoneIdentifier::normalize("123"),
            Err(PhoneError::Invalid(_))
        ));
    }

    #[test]
    fn test_too_long_is_invalid() {
        assert!(matches!(
            PhoneIdentifier::normalize("1234567890123456"),
            Err(PhoneError::Invalid(_))
        ));
    }

    #[test]
    fn test_no_digits_is_invalid() {
        assert!(matches!(
            PhoneIdentifier::normalize("abc-def"),
            Err(PhoneError::Invalid(_))
        ));
    }

    #[test]
    fn test_derived_addresses() {
        let id = PhoneIdentifier::normalize("12025550173").unwrap();
        assert_eq!(id.user_address(), "12025550173@s.whatsapp.net");
        assert_eq!(id.store_dir_name(), "session_12025550173");
    }
}
