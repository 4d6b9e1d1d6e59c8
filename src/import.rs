//! Import identifier parsing.
//!
//! Single-key resources take the import ID verbatim. Composite-key resources
//! encode several key fields joined by `/`, and the same string becomes their
//! `id` attribute after create.

use crate::error::ProviderError;

/// Separator between composite ID segments.
pub const SEPARATOR: &str = "/";

/// Split a composite import ID into exactly `N` non-empty segments.
///
/// Fails with [`ProviderError::InvalidImportId`] naming `expected` when the
/// segment count is wrong or a segment is empty.
///
/// ```
/// use vpsie_provider::import::parse_composite;
///
/// let [domain, kind, name] = parse_composite::<3>("dom-123/A/www", "domain_identifier/type/name").unwrap();
/// assert_eq!((domain, kind, name), ("dom-123", "A", "www"));
///
/// assert!(parse_composite::<3>("dom-123/A", "domain_identifier/type/name").is_err());
/// assert!(parse_composite::<3>("dom-123//www", "domain_identifier/type/name").is_err());
/// ```
pub fn parse_composite<'a, const N: usize>(
    id: &'a str,
    expected: &'static str,
) -> Result<[&'a str; N], ProviderError> {
    let invalid = || ProviderError::InvalidImportId {
        id: id.to_string(),
        expected,
    };

    let parts: Vec<&str> = id.split(SEPARATOR).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(invalid());
    }
    parts.try_into().map_err(|_| invalid())
}

/// Join key fields into a composite ID.
pub fn join_composite(parts: &[&str]) -> String {
    parts.join(SEPARATOR)
}

/// Accept a single-key import ID, rejecting only the empty string.
pub fn single_key<'a>(id: &'a str, expected: &'static str) -> Result<&'a str, ProviderError> {
    if id.trim().is_empty() {
        return Err(ProviderError::InvalidImportId {
            id: id.to_string(),
            expected,
        });
    }
    Ok(id)
}
