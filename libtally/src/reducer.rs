use std::collections::BTreeMap;

use combiner::Combinable;
use errors::*;
use intermediate::{FinalCount, FinalCounts, IntermediateInputKV, PartitionOutput};

/// The `Reduce` trait defines a function for performing a reduce operation.
///
/// # Arguments
///
/// * `input` - A `IntermediateInputKV` containing every value shipped for one key, across all
///             partitions.
///
/// # Outputs
///
/// The final value for the key.
pub trait Reduce<V> {
    fn reduce(&self, input: IntermediateInputKV<V>) -> Result<V>;
}

/// `SumReducer` folds all values of a key together with `Combinable::combine`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumReducer;

impl<V: Combinable> Reduce<V> for SumReducer {
    fn reduce(&self, input: IntermediateInputKV<V>) -> Result<V> {
        let key = input.key;
        let mut values = input.values.into_iter();
        let mut total = values
            .next()
            .chain_err(|| ErrorKind::ReduceFailed(key.clone()))?;
        for value in values {
            total.combine(value);
        }
        Ok(total)
    }
}

/// `merge` groups the output of every partition by key and reduces each group.
///
/// The result is sorted by key. Partition outputs are only read, so merging the same outputs
/// again yields the same result.
pub fn merge<V, R>(reducer: &R, outputs: &[PartitionOutput<V>]) -> Result<FinalCounts<V>>
where
    V: Clone,
    R: Reduce<V>,
{
    let mut groups: BTreeMap<&str, Vec<V>> = BTreeMap::new();
    for output in outputs {
        for &(ref key, ref value) in &output.pairs {
            groups
                .entry(key.as_str())
                .or_insert_with(Vec::new)
                .push(value.clone());
        }
    }

    let mut counts = Vec::with_capacity(groups.len());
    for (key, values) in groups {
        let total = reducer
            .reduce(IntermediateInputKV::new(key.to_owned(), values))
            .chain_err(|| ErrorKind::ReduceFailed(key.to_owned()))?;
        counts.push(FinalCount {
            word: key.to_owned(),
            total,
        });
    }

    Ok(FinalCounts::from_sorted(counts))
}
