use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// The `Combinable` trait marks values which can be pre-aggregated inside a partition.
///
/// `combine` must be associative and commutative. The pipeline relies on this to combine values
/// per partition and merge the partial results afterwards in any order, so an implementation
/// which breaks either property will produce different results depending on the partitioning.
pub trait Combinable: Sized {
    fn combine(&mut self, other: Self);
}

macro_rules! impl_combinable_sum {
    ($($t:ty),*) => {
        $(
            impl Combinable for $t {
                fn combine(&mut self, other: Self) {
                    *self = self.saturating_add(other);
                }
            }
        )*
    };
}

impl_combinable_sum!(u8, u16, u32, u64, usize);

/// `PartialCounts` holds the combined values of a single partition, keyed by word.
///
/// It is private to the worker which builds it until the worker hands it to the merge stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialCounts<V> {
    counts: HashMap<String, V>,
    input_records: u64,
}

impl<V> Default for PartialCounts<V> {
    fn default() -> Self {
        PartialCounts {
            counts: HashMap::new(),
            input_records: 0,
        }
    }
}

impl<V: Combinable> PartialCounts<V> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds a single pair into the subtotal for `key`.
    pub fn insert(&mut self, key: String, value: V) {
        self.input_records += 1;
        match self.counts.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().combine(value),
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    /// Merges another set of partial counts into this one.
    pub fn merge(&mut self, other: PartialCounts<V>) {
        self.input_records += other.input_records;
        for (key, value) in other.counts {
            match self.counts.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().combine(value),
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.counts.get(key)
    }

    /// The number of distinct keys, i.e. the number of records this partition will ship.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The number of pairs folded in so far.
    pub fn input_records(&self) -> u64 {
        self.input_records
    }

    pub fn into_pairs(self) -> Vec<(String, V)> {
        self.counts.into_iter().collect()
    }
}

/// `combine` groups a sequence of pairs by key and combines the values of each group.
pub fn combine<V, I>(pairs: I) -> PartialCounts<V>
where
    V: Combinable,
    I: IntoIterator<Item = (String, V)>,
{
    let mut partial = PartialCounts::new();
    for (key, value) in pairs {
        partial.insert(key, value);
    }
    partial
}
