//! Duplicate suppression against a set of already-seen identifiers.

use std::collections::HashSet;
use std::hash::Hash;

/// Keep the candidates whose key is not in `seen`, preserving order.
///
/// ```
/// use std::collections::HashSet;
/// use pressline_core::dedup::filter_unseen;
///
/// let seen: HashSet<i64> = [1, 2, 3].into();
/// assert_eq!(filter_unseen(vec![2, 3, 4], &seen, |id| *id), vec![4]);
/// ```
pub fn filter_unseen<T, K, F>(candidates: Vec<T>, seen: &HashSet<K>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    candidates
        .into_iter()
        .filter(|candidate| !seen.contains(&key(candidate)))
        .collect()
}
