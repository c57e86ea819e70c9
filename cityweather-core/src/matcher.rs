//! Autocomplete over the city catalog.
//!
//! Matching is a case-insensitive substring test on whole characters. Results
//! keep the directory order and are cut to `limit` entries.

use crate::catalog::Location;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Names of the locations whose name contains `query`, ignoring case.
///
/// A blank query yields no suggestions. The query itself is not trimmed for
/// the containment test, so `"北京 "` does not match `"北京"`.
pub fn suggest<'a>(query: &str, directory: &'a [Location], limit: usize) -> Vec<&'a str> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();

    directory
        .iter()
        .filter(|location| location.name.to_lowercase().contains(&needle))
        .take(limit)
        .map(|location| location.name.as_str())
        .collect()
}
