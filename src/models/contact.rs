//! Contact record returned by the QR endpoint.

use crate::domain::{EmailAddress, PhoneNumber};
use serde::{Deserialize, Serialize};

/// A normalized contact with exactly four string fields.
///
/// Unknown fields are empty strings, never absent, so the JSON shape is the
/// same on the success and failure paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRecord {
    /// The contact's full name
    pub full_name: String,

    /// Primary email address, lower-cased
    pub email: String,

    /// Primary telephone number, without whitespace
    pub phone: String,

    /// Full postal address as a single line
    pub address: String,
}

impl ContactRecord {
    /// The all-empty record every failure collapses to.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether all four fields carry a value.
    pub fn is_complete(&self) -> bool {
        [&self.full_name, &self.email, &self.phone, &self.address]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Trim every field and apply the email and phone normalization rules.
    ///
    /// Values that fail validation are kept in normalized form rather than
    /// dropped, since model output is best-effort.
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: EmailAddress::normalize(&self.email),
            phone: PhoneNumber::normalize(&self.phone),
            address: self.address.trim().to_string(),
        }
    }
}
