use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Keyed accumulator that remembers the order in which keys first appeared.
pub(crate) struct Buckets<K, B> {
    slots: HashMap<K, usize>,
    buckets: Vec<B>,
}

impl<K: Hash + Eq, B> Buckets<K, B> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    /// Bucket for `key`, created with `seed` the first time the key is seen.
    pub(crate) fn slot(&mut self, key: K, seed: impl FnOnce(&K) -> B) -> &mut B {
        let index = match self.slots.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.buckets.push(seed(entry.key()));
                *entry.insert(self.buckets.len() - 1)
            }
        };
        &mut self.buckets[index]
    }

    pub(crate) fn into_first_seen(self) -> Vec<B> {
        self.buckets
    }

    pub(crate) fn into_sorted_by_key<T: Ord>(self, key: impl FnMut(&B) -> T) -> Vec<B> {
        let mut buckets = self.buckets;
        buckets.sort_by_key(key);
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_accumulates_into_one_bucket() {
        let mut buckets: Buckets<&str, i32> = Buckets::new();
        *buckets.slot("a", |_| 0) += 1;
        *buckets.slot("b", |_| 0) += 10;
        *buckets.slot("a", |_| 0) += 2;

        assert_eq!(buckets.into_first_seen(), vec![3, 10]);
    }

    #[test]
    fn first_seen_order_is_kept() {
        let mut buckets: Buckets<&str, &str> = Buckets::new();
        for key in ["swim", "run", "swim", "bike", "run"] {
            buckets.slot(key, |k| *k);
        }
        assert_eq!(buckets.into_first_seen(), vec!["swim", "run", "bike"]);
    }

    #[test]
    fn sorted_output_orders_by_key() {
        let mut buckets: Buckets<u32, u32> = Buckets::new();
        for key in [3, 1, 2] {
            buckets.slot(key, |k| *k);
        }
        assert_eq!(buckets.into_sorted_by_key(|b| *b), vec![1, 2, 3]);
    }
}
