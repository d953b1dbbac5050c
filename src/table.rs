use std::cmp::min;
use std::ops::Index;

use crate::utils::MyHash;

/// A hash-consing table with intrusive collision chains.
///
/// Values live in a growable vector; a fixed-size bucket array maps hashes to
/// chain heads, and each slot carries the index of the next entry with the
/// same bucket. Index 0 is a sentry: it terminates every chain and is never
/// handed out, so the first real entry gets index 1.
///
/// The table only ever grows. There is no eviction and no garbage collection;
/// a caller that needs to reclaim memory discards the whole manager.
pub struct Table<T> {
    data: Vec<T>,
    next: Vec<usize>,

    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits >= 1, "Bucket bits should be >= 1");
        let buckets_bits = min(bits, 24);
        let buckets_size = 1 << buckets_bits;

        Self {
            // Sentry cell occupies index 0 so that `next == 0` means end of chain.
            data: vec![T::default()],
            next: vec![0],
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }
}

impl<T> Table<T> {
    /// Number of stored values, including the sentry.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index]
    }

    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.next[index]
    }
    pub fn set_next(&mut self, index: usize, next: usize) {
        assert_ne!(index, 0, "Index is 0");
        self.next[index] = next;
    }

    /// Append a value without interning it. Used for the two terminals, which
    /// must not be reachable through any bucket.
    pub fn add(&mut self, value: T) -> usize {
        self.data.push(value);
        self.next.push(0);
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Intern a value: return the index of an existing equal entry, or append
    /// the value to its bucket chain and return the fresh index.
    pub fn put(&mut self, value: T) -> usize
    where
        T: Eq,
    {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            // Create new node and put it into the bucket.
            let i = self.add(value);
            self.buckets[bucket_index] = i;
            return i;
        }

        loop {
            assert!(index > 0);

            if &value == self.value(index) {
                // The node already exists.
                return index;
            }

            let next = self.next(index);

            if next == 0 {
                // Create new node and append it to the bucket.
                let i = self.add(value);
                self.set_next(index, i);
                return i;
            } else {
                // Go to the next node in the bucket.
                index = next;
            }
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_add() {
        let mut table = Table::new(2);
        let index = table.add(Item(42));
        assert_eq!(index, 1);
        assert_eq!(table[index], Item(42));
        assert_eq!(table.next(index), 0);
    }

    #[test]
    fn test_put_dedups() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(5));
        assert_eq!(index1, index2);
        assert_eq!(table.size(), 2); // sentry + one entry
    }

    #[test]
    fn test_put_chains_collisions() {
        // Items 5 and -5 hash identically but differ, so they must chain.
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(table[index1], Item(5));
        assert_eq!(table[index2], Item(-5));
        assert_eq!(table.next(index1), index2);
        // Re-interning either still finds the original entry.
        assert_eq!(table.put(Item(5)), index1);
        assert_eq!(table.put(Item(-5)), index2);
    }

    #[test]
    fn test_grows_past_bucket_count() {
        let mut table = Table::new(1);
        let indices: Vec<_> = (1..=100).map(|i| table.put(Item(i))).collect();
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(table[index], Item(i as i32 + 1));
        }
    }
}
