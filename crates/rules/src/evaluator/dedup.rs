//! Duplicate-key split.

use std::collections::HashSet;

use tracing::warn;

use checksift_core::RowSet;

/// Split `rows` into `(unique, duplicates)` by `key_column`.
///
/// `unique` holds the first row seen for each key, in order of first
/// appearance; `duplicates` holds every later row with an already-seen key.
/// Keys are compared after trimming surrounding whitespace. Rows with a null,
/// blank or missing key are always unique.
pub fn split_duplicates(rows: RowSet, key_column: &str) -> (RowSet, RowSet) {
    if !rows.has_column(key_column) && !rows.is_empty() {
        warn!(column = %key_column, "key column not found, treating every row as unique");
    }

    let mask: Vec<bool> = {
        let mut seen: HashSet<&str> = HashSet::new();
        rows.iter()
            .map(|record| match record.key(key_column) {
                Some(key) => seen.insert(key),
                None => true,
            })
            .collect()
    };

    rows.split_by_mask(&mask)
}
