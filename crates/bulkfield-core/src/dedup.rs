//! Order-preserving deduplication.

use std::collections::HashMap;
use std::hash::Hash;

/// Deduplicate `items` by `key`.
///
/// When a key repeats, the later value replaces the earlier one but keeps the
/// position where the key first appeared.
pub fn dedup_last_wins<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::new();

    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&idx) => out[idx] = item,
            None => {
                positions.insert(k, out.len());
                out.push(item);
            }
        }
    }

    out
}
