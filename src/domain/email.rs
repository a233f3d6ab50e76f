//! EmailAddress value object.

use super::errors::ValidationError;

/// A validated, lower-cased email address.
///
/// # Example
///
/// ```
/// use qr_contact_server::domain::EmailAddress;
///
/// let email = EmailAddress::new("JOHN@Example.COM").unwrap();
/// assert_eq!(email.as_str(), "john@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new EmailAddress, normalizing and validating it.
    ///
    /// Surrounding whitespace is trimmed and the whole address is lower-cased
    /// before validation.
    ///
    /// # Validation Rules
    ///
    /// - Must contain exactly one '@' symbol
    /// - Must have a local part before '@'
    /// - Must have a domain part after '@' with at least one '.'
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    pub fn new(email: impl AsRef<str>) -> Result<Self, ValidationError> {
        let email = Self::normalize(email.as_ref());

        if !Self::is_valid(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(Self(email))
    }

    /// Apply the normalization rules without validating.
    ///
    /// Used for model-authored values, which are passed through even when they
    /// do not look like an address.
    pub fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn is_valid(email: &str) -> bool {
        let parts: Vec<&str> = email.split('@').collect();

        if parts.len() != 2 {
            return false;
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() || local.chars().any(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        domain.split('.').all(|part| !part.is_empty())
    }

    /// Get the email address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}
