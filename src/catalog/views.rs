// SPDX-License-Identifier: GPL-3.0-only
use crate::catalog::models::{CategoryFilter, Listing};

/// Number of listings shown in the featured strip
pub const FEATURED_COUNT: usize = 3;

/// Compute the filtered catalog view.
///
/// A listing is included iff the category filter matches AND the search text
/// is empty or a case-insensitive substring of its name or developer. No
/// other field is searched. Ordering is inherited from `snapshot`; the remote
/// sort (newest first) passes through untouched.
///
/// Pure function: safe to recompute on every request without coordination.
pub fn filter_listings(
    snapshot: &[Listing],
    category: &CategoryFilter,
    search: &str,
) -> Vec<Listing> {
    let needle = search.to_lowercase();

    snapshot
        .iter()
        .filter(|listing| {
            category.matches(listing)
                && (needle.is_empty()
                    || listing.name.to_lowercase().contains(&needle)
                    || listing.developer.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Compute the featured view: the first `FEATURED_COUNT` listings of the
/// snapshot in existing order, i.e. the newest ones.
///
/// Selection is positional; the `featured` flag on `Listing` is intentionally
/// not consulted here (it exists in the document schema but nothing reads
/// it). Not category- or search-aware either: callers decide to show this
/// view only while no filter or search is active.
pub fn featured_listings(snapshot: &[Listing]) -> Vec<Listing> {
    snapshot.iter().take(FEATURED_COUNT).cloned().collect()
}
