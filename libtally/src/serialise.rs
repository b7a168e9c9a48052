use serde::Serialize;

use intermediate::{FinalCount, FinalCounts};

/// `FinalOutputObject` is the JSON representation of the output of a job.
#[derive(Serialize)]
pub struct FinalOutputObject<'a, V: Serialize + 'a> {
    pub counts: &'a [FinalCount<V>],
}

impl<'a, V: Serialize + 'a> FinalOutputObject<'a, V> {
    pub fn new(counts: &'a FinalCounts<V>) -> Self {
        FinalOutputObject { counts: counts.as_slice() }
    }
}
