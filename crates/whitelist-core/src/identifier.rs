//! Identifier normalisation.
//!
//! Game identifiers and external account ids are stored and looked up in
//! normalised form so that casing and surrounding whitespace never affect
//! a lookup.

/// Trims and lower-cases an identifier.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalises an optional identifier, mapping blank input to `None`.
#[must_use]
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(normalize).filter(|value| !value.is_empty())
}
