use std::slice;

/// `Record` is one line of input.
///
/// `index` is the zero-based position of the line in the whole input. `line` holds the raw bytes
/// without the line terminator; they are only decoded when the record is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub index: usize,
    pub line: Vec<u8>,
}

impl Record {
    pub fn new<L: Into<Vec<u8>>>(index: usize, line: L) -> Self {
        Record {
            index,
            line: line.into(),
        }
    }

    /// Builds numbered records from a sequence of lines.
    pub fn from_lines<I, L>(lines: I) -> Vec<Record>
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| Record::new(index, line))
            .collect()
    }
}

/// The `IntermediateInputKV` is a struct for passing grouped data to a `Reduce`.
///
/// `IntermediateInputKV` is a thin wrapper around a `(String, Vec<Value>)`,
/// used for creating a clearer API.
/// It can be constructed normally or using `IntermediateInputKV::new()`.
#[derive(Debug, Default, PartialEq)]
pub struct IntermediateInputKV<V> {
    pub key: String,
    pub values: Vec<V>,
}

impl<V> IntermediateInputKV<V> {
    pub fn new(key: String, values: Vec<V>) -> Self {
        IntermediateInputKV { key, values }
    }
}

/// `PartitionOutput` is everything a worker hands to the merge stage for one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOutput<V> {
    pub partition: usize,
    /// Number of records the mapper consumed.
    pub input_records: u64,
    /// Number of pairs the mapper emitted.
    pub map_output_records: u64,
    /// Whether `pairs` has been through the combiner.
    pub combined: bool,
    pub pairs: Vec<(String, V)>,
}

/// `FinalCount` is the reduced value for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalCount<V> {
    pub word: String,
    pub total: V,
}

/// `FinalCounts` is the output of a job, sorted by word with no duplicates.
///
/// It is only built by the merge stage, so it is serialisable but not deserialisable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalCounts<V> {
    counts: Vec<FinalCount<V>>,
}

impl<V> FinalCounts<V> {
    /// Wraps an already sorted, duplicate-free list.
    pub(crate) fn from_sorted(counts: Vec<FinalCount<V>>) -> Self {
        debug_assert!(counts.windows(2).all(|w| w[0].word < w[1].word));
        FinalCounts { counts }
    }

    pub fn get(&self, word: &str) -> Option<&V> {
        self.counts
            .binary_search_by(|count| count.word.as_str().cmp(word))
            .ok()
            .map(|i| &self.counts[i].total)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn as_slice(&self) -> &[FinalCount<V>] {
        &self.counts
    }

    pub fn iter(&self) -> slice::Iter<FinalCount<V>> {
        self.counts.iter()
    }
}

impl<V: Clone> FinalCounts<V> {
    pub fn to_pairs(&self) -> Vec<(String, V)> {
        self.counts
            .iter()
            .map(|count| (count.word.clone(), count.total.clone()))
            .collect()
    }
}

impl<'a, V> IntoIterator for &'a FinalCounts<V> {
    type Item = &'a FinalCount<V>;
    type IntoIter = slice::Iter<'a, FinalCount<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
