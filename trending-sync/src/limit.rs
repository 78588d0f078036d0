//! Top-N truncation of the listing.

/// Keeps the first `n` entries, preserving their order.
#[must_use]
pub fn limit<T>(mut entries: Vec<T>, n: usize) -> Vec<T> {
    entries.truncate(n);
    entries
}
