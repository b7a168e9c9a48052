use combiner::{Combinable, PartialCounts};
use errors::*;

/// The `EmitIntermediate` trait specifies structs which can receive the key-value pairs produced
/// by a map operation.
pub trait EmitIntermediate<K, V> {
    /// Takes ownership of a key-value pair and moves it somewhere else.
    ///
    /// Returns an empty `Result` used for error handling.
    fn emit(&mut self, key: K, value: V) -> Result<()>;
}

/// A struct implementing `EmitIntermediate` which emits to a `std::vec::Vec`.
pub struct IntermediateVecEmitter<'a, K: 'a, V: 'a> {
    sink: &'a mut Vec<(K, V)>,
}

impl<'a, K, V> IntermediateVecEmitter<'a, K, V> {
    /// Constructs a new `IntermediateVecEmitter` with a mutable reference to a given `Vec`.
    ///
    /// # Arguments
    ///
    /// * `sink` - A mutable reference to the `Vec` to receive the emitted values.
    pub fn new(sink: &'a mut Vec<(K, V)>) -> Self {
        IntermediateVecEmitter { sink }
    }
}

impl<'a, K, V> EmitIntermediate<K, V> for IntermediateVecEmitter<'a, K, V> {
    fn emit(&mut self, key: K, value: V) -> Result<()> {
        self.sink.push((key, value));
        Ok(())
    }
}

/// A struct implementing `EmitIntermediate` which combines every emitted pair straight into a
/// `PartialCounts`, so ungrouped pairs are never buffered.
pub struct CombiningEmitter<'a, V: 'a> {
    sink: &'a mut PartialCounts<V>,
}

impl<'a, V: Combinable> CombiningEmitter<'a, V> {
    pub fn new(sink: &'a mut PartialCounts<V>) -> Self {
        CombiningEmitter { sink }
    }
}

impl<'a, V: Combinable> EmitIntermediate<String, V> for CombiningEmitter<'a, V> {
    fn emit(&mut self, key: String, value: V) -> Result<()> {
        self.sink.insert(key, value);
        Ok(())
    }
}
