//! Domain value objects and types.
//!
//! Type-safe wrappers for the contact fields that carry normalization rules.
//! Both validate at construction time and store the normalized form.

pub mod email;
pub mod errors;
pub mod phone;

pub use email::EmailAddress;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
