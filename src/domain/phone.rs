//! PhoneNumber value object.

use super::errors::ValidationError;

/// A validated phone number with all whitespace removed.
///
/// Other formatting characters are kept as written; only spaces, tabs and
/// similar separators are stripped.
///
/// # Example
///
/// ```
/// use qr_contact_server::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("+1 555 123 4567").unwrap();
/// assert_eq!(phone.as_str(), "+15551234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber, stripping whitespace and validating it.
    ///
    /// # Validation Rules
    ///
    /// - Must contain at least one digit
    /// - Can contain: digits, hyphens, parentheses, plus sign, periods
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the phone format is invalid.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, ValidationError> {
        let phone = Self::normalize(phone.as_ref());

        if !Self::is_valid(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(phone))
    }

    /// Apply the normalization rules without validating.
    pub fn normalize(phone: &str) -> String {
        phone.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn is_valid(phone: &str) -> bool {
        if !phone.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }

        phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '(' | ')' | '+' | '.'))
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_whitespace_stripped() {
        let phone = PhoneNumber::new("+1 555 123 4567").unwrap();
        assert_eq!(phone.as_str(), "+15551234567");
    }

    #[test]
    fn test_phone_keeps_other_formatting() {
        let phone = PhoneNumber::new("+1 (555) 123-4567").unwrap();
        assert_eq!(phone.as_str(), "+1(555)123-4567");
    }

    #[test]
    fn test_phone_validates_format() {
        assert!(PhoneNumber::new("").is_err());
        assert!(PhoneNumber::new("   ").is_err());
        assert!(PhoneNumber::new("no digits").is_err());
        assert!(PhoneNumber::new("invalid@phone").is_err());
        assert!(PhoneNumber::new("555.123.4567").is_ok());
        assert!(PhoneNumber::new("+14155551234").is_ok());
    }
}
