//! Content-line grammar for vCard text.

use crate::error::{VcardError, VcardResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use quoted_printable::ParseMode;
use regex::Regex;

/// `[group.]NAME[;PARAM...]:value`, with quoted parameter values allowed to
/// contain `:` and `;`.
static CONTENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:([A-Za-z0-9-]+)\.)?([A-Za-z0-9-]+)((?:;(?:"[^"]*"|[^:;"])*)*):(.*)$"#)
        .expect("content line pattern is valid")
});

/// A single vCard property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Optional group prefix (`item1` in `item1.TEL`)
    pub group: Option<String>,

    /// Property name, upper-cased
    pub name: String,

    /// Parameters as (upper-cased name, values) pairs
    pub params: Vec<(String, Vec<String>)>,

    /// Raw value, still transfer-encoded and escaped
    pub value: String,
}

impl Property {
    /// The value with its transfer encoding and text escapes resolved.
    pub fn text_value(&self) -> VcardResult<String> {
        Ok(unescape(&self.decoded_value()?))
    }

    /// The decoded value split on unescaped `;` into structured components.
    pub fn components(&self) -> VcardResult<Vec<String>> {
        Ok(split_unescaped(&self.decoded_value()?, ';')
            .into_iter()
            .map(|component| unescape(&component))
            .collect())
    }

    /// The transfer encoding (`ENCODING=...`, or a bare 2.1 `QUOTED-PRINTABLE`
    /// / `BASE64` parameter), upper-cased.
    pub fn encoding(&self) -> Option<String> {
        if let Some(values) = self.param("ENCODING") {
            return values.first().map(|v| v.to_ascii_uppercase());
        }
        self.param("TYPE")?
            .iter()
            .find(|t| t.eq_ignore_ascii_case("QUOTED-PRINTABLE") || t.eq_ignore_ascii_case("BASE64"))
            .map(|t| t.to_ascii_uppercase())
    }

    /// Undo `ENCODING` and `CHARSET`. Escapes are left intact.
    fn decoded_value(&self) -> VcardResult<String> {
        let bytes = match self.encoding().as_deref() {
            None | Some("7BIT") | Some("8BIT") => return Ok(self.value.clone()),
            Some("QUOTED-PRINTABLE") => quoted_printable::decode(&self.value, ParseMode::Robust)
                .map_err(|e| {
                    VcardError::UndecodableValue(format!("{}: quoted-printable: {}", self.name, e))
                })?,
            Some("B") | Some("BASE64") => {
                let compact: String = self.value.chars().filter(|c| !c.is_whitespace()).collect();
                STANDARD.decode(compact).map_err(|e| {
                    VcardError::UndecodableValue(format!("{}: base64: {}", self.name, e))
                })?
            }
            Some(other) => {
                return Err(VcardError::UndecodableValue(format!(
                    "{}: unsupported encoding {}",
                    self.name, other
                )))
            }
        };

        let charset = self.param("CHARSET").and_then(|values| values.first());
        decode_charset(bytes, charset.map(String::as_str))
            .map_err(|reason| VcardError::UndecodableValue(format!("{}: {}", self.name, reason)))
    }

    /// Values of the named parameter, if present.
    pub fn param(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Whether the property is marked preferred (`TYPE=pref` or `PREF=n`).
    pub fn is_preferred(&self) -> bool {
        self.param("PREF").is_some()
            || self
                .param("TYPE")
                .map(|types| types.iter().any(|t| t.eq_ignore_ascii_case("pref")))
                .unwrap_or(false)
    }
}

/// The properties of one vCard, in document order.
#[derive(Debug, Clone, Default)]
pub struct VCard {
    properties: Vec<Property>,
}

impl VCard {
    /// Parse the first `BEGIN:VCARD` … `END:VCARD` block in `text`.
    ///
    /// Text before the block is ignored, as are blank lines inside it.
    pub fn parse(text: &str) -> VcardResult<Self> {
        let lines = unfold(text);
        let mut iter = lines.iter().map(|line| line.trim_end());

        iter.by_ref()
            .find(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCARD"))
            .ok_or(VcardError::MissingBegin)?;

        let mut properties = Vec::new();
        for line in iter {
            if line.trim().is_empty() {
                continue;
            }
            if line.trim().eq_ignore_ascii_case("END:VCARD") {
                return Ok(Self { properties });
            }
            properties.push(parse_line(line)?);
        }

        Err(VcardError::MissingEnd)
    }

    /// All properties in document order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Instances of `name`, preferred ones first, otherwise in document order.
    pub fn ordered(&self, name: &str) -> Vec<&Property> {
        let mut matches: Vec<&Property> = self
            .properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .collect();
        // Stable sort keeps document order within each group.
        matches.sort_by_key(|p| !p.is_preferred());
        matches
    }

    /// The preferred instance of `name`, or the first one.
    pub fn preferred(&self, name: &str) -> Option<&Property> {
        self.ordered(name).into_iter().next()
    }
}

/// Join folded lines (RFC 6350 section 3.2) and quoted-printable soft line
/// breaks (a QP value ending in `=` continues on the next line).
fn unfold(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();

    for raw in normalized.split('\n') {
        if let Some(previous) = lines.last_mut() {
            if is_quoted_printable(previous) && previous.ends_with('=') {
                previous.pop();
                previous.push_str(raw);
                continue;
            }
            if let Some(continuation) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
                previous.push_str(continuation);
                continue;
            }
        }
        lines.push(raw.to_string());
    }

    lines
}

/// Whether the name/parameter part of a content line declares quoted-printable.
fn is_quoted_printable(line: &str) -> bool {
    line.split_once(':')
        .map(|(head, _)| head.to_ascii_uppercase().contains("QUOTED-PRINTABLE"))
        .unwrap_or(false)
}

/// Turn decoded bytes into text. UTF-8 unless a Latin-1 charset is named.
fn decode_charset(bytes: Vec<u8>, charset: Option<&str>) -> Result<String, String> {
    let charset = charset.map(str::to_ascii_uppercase);
    match charset.as_deref() {
        None | Some("UTF-8") | Some("UTF8") | Some("US-ASCII") => {
            String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))
        }
        Some("ISO-8859-1") | Some("LATIN1") | Some("LATIN-1") => {
            Ok(bytes.into_iter().map(char::from).collect())
        }
        Some(other) => Err(format!("unsupported charset {}", other)),
    }
}

fn parse_line(line: &str) -> VcardResult<Property> {
    let caps = CONTENT_LINE
        .captures(line)
        .ok_or_else(|| VcardError::MalformedLine(line.to_string()))?;

    let group = caps.get(1).map(|m| m.as_str().to_string());
    let name = caps[2].to_ascii_uppercase();
    let params = parse_params(caps.get(3).map_or("", |m| m.as_str()));
    let value = caps.get(4).map_or("", |m| m.as_str()).to_string();

    Ok(Property {
        group,
        name,
        params,
        value,
    })
}

/// Parse `;KEY=a,b;BARE` into pairs, merging repeated keys. Bare vCard 2.1
/// parameters are `TYPE` values.
fn parse_params(raw: &str) -> Vec<(String, Vec<String>)> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();

    for param in split_quoted(raw, ';').into_iter().filter(|p| !p.is_empty()) {
        let (key, values) = match param.split_once('=') {
            Some((key, values)) => (
                key.trim().to_ascii_uppercase(),
                split_quoted(values, ',')
                    .into_iter()
                    .map(|v| v.trim_matches('"').to_string())
                    .collect(),
            ),
            None => ("TYPE".to_string(), vec![param.trim().to_string()]),
        };

        match params.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => existing.extend(values),
            None => params.push((key, values)),
        }
    }

    params
}

/// Split on `sep` outside double quotes.
fn split_quoted(raw: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in raw.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            c if c == sep && !quoted => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Split on `sep` unless it is backslash-escaped. Escapes are left intact.
fn split_unescaped(raw: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
