use std::collections::BTreeMap;

/// Occurrence counts keyed in ascending order.
pub type FrequencyTable<K> = BTreeMap<K, usize>;

/// Counts how often each value occurs.
pub fn value_counts<K, I>(values: I) -> FrequencyTable<K>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut table = FrequencyTable::new();
    for v in values {
        *table.entry(v).or_insert(0) += 1;
    }
    table
}

/// The most frequent key and its count. Among keys sharing the highest
/// count the smallest one wins. `None` for an empty table.
pub fn mode<K: Ord + Clone>(table: &FrequencyTable<K>) -> Option<(K, usize)> {
    let mut best: Option<(&K, usize)> = None;
    for (key, &count) in table {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((key, count));
        }
    }
    best.map(|(key, count)| (key.clone(), count))
}

/// Arithmetic mean of a total over `count` items. `None` when `count` is 0.
pub fn mean(total: f64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total / count as f64)
}
