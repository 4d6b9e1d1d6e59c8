//! List-and-match lookups.
//!
//! The VPSie API has no lookup-by-name endpoints, and its create calls do not
//! return the created entity. Adapters therefore list every entity of a type
//! and scan for the one whose key matches. Each lookup is O(n) in the size of
//! the listing and nothing is cached between calls.
//!
//! Natural keys are not guaranteed unique by the API. When several entries
//! match, the first one in listing order wins and a warning is logged.

use tracing::warn;

use crate::client::ClientError;

/// Return the first entry of `listing` for which `matches` holds.
///
/// * a listing error is returned unchanged,
/// * an empty listing or no match yields [`ClientError::NotFound`] with the
///   message `"<entity> with <field> <key> not found"`.
pub fn find_first<T, F>(
    listing: Result<Vec<T>, ClientError>,
    entity: &str,
    field: &str,
    key: &str,
    matches: F,
) -> Result<T, ClientError>
where
    F: Fn(&T) -> bool,
{
    let items = listing?;

    let mut found = items.into_iter().filter(|item| matches(item));
    let first = found.next();
    let extra = found.count();

    match first {
        Some(item) => {
            if extra > 0 {
                warn!(
                    entity,
                    field,
                    key,
                    duplicates = extra + 1,
                    "Several entries share this key; using the first one listed"
                );
            }
            Ok(item)
        },
        None => Err(not_found(entity, field, key)),
    }
}

/// Build the not-found error used by every lookup.
pub fn not_found(entity: &str, field: &str, key: &str) -> ClientError {
    ClientError::NotFound(format!("{} with {} {} not found", entity, field, key))
}
