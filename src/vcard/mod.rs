//! Structured vCard parsing.
//!
//! Turns the text of a single vCard (versions 2.1, 3.0 and 4.0 share the
//! content-line grammar used here) into a [`ContactRecord`]. Quoted-printable
//! and base64 values are decoded; a value in an encoding or charset that cannot
//! be decoded is an error, never passed through raw. The parser never guesses:
//! if a target field is absent or unusable it reports which one, and the caller
//! decides what to do next.

mod parser;

pub use parser::{Property, VCard};

use crate::domain::{EmailAddress, PhoneNumber};
use crate::error::{VcardError, VcardResult};
use crate::models::ContactRecord;

/// ADR component positions (RFC 6350 section 6.3.1).
const ADR_STREET: usize = 2;
const ADR_LOCALITY: usize = 3;
const ADR_REGION: usize = 4;
const ADR_POSTAL_CODE: usize = 5;
const ADR_COUNTRY: usize = 6;

/// Parse one vCard into a fully populated contact record.
///
/// Returns an error instead of a partial record when any of the four fields
/// cannot be determined.
pub fn parse_contact(text: &str) -> VcardResult<ContactRecord> {
    let card = VCard::parse(text)?;

    let full_name = card
        .preferred("FN")
        .map(Property::text_value)
        .transpose()?
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(VcardError::MissingField("full name"))?;

    let email = text_values(&card, "EMAIL")?
        .iter()
        .find_map(|value| EmailAddress::new(strip_scheme(value, "mailto:")).ok())
        .ok_or(VcardError::MissingField("email"))?;

    let phone = text_values(&card, "TEL")?
        .iter()
        .find_map(|value| PhoneNumber::new(strip_scheme(value, "tel:")).ok())
        .ok_or(VcardError::MissingField("phone"))?;

    let address = card
        .ordered("ADR")
        .into_iter()
        .map(Property::components)
        .collect::<VcardResult<Vec<_>>>()?
        .iter()
        .map(|components| format_address(components))
        .find(|address| !address.is_empty())
        .ok_or(VcardError::MissingField("address"))?;

    Ok(ContactRecord {
        full_name,
        email: email.into_inner(),
        phone: phone.into_inner(),
        address,
    })
}

/// Decoded values of every `name` instance, preferred first.
fn text_values(card: &VCard, name: &str) -> VcardResult<Vec<String>> {
    card.ordered(name)
        .into_iter()
        .map(Property::text_value)
        .collect()
}

/// Join the present address components with `", "`.
///
/// Components are street, city, region, postal code and country, in that
/// order; empty ones are skipped so no empty segments appear.
pub fn format_address(components: &[String]) -> String {
    [ADR_STREET, ADR_LOCALITY, ADR_REGION, ADR_POSTAL_CODE, ADR_COUNTRY]
        .iter()
        .filter_map(|&idx| components.get(idx))
        .map(|part| {
            part.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn strip_scheme<'a>(value: &'a str, scheme: &str) -> &'a str {
    let value = value.trim();
    match value.get(..scheme.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => &value[scheme.len()..],
        _ => value,
    }
}
