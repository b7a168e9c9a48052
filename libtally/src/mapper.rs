use combiner::Combinable;
use emitter::EmitIntermediate;
use errors::*;
use tokenizer::tokenize;

/// The `MapInputKV` is a struct for passing input data to a `Map`.
///
/// `key` is the index of the record in the whole input and `value` is its decoded text.
#[derive(Debug, PartialEq)]
pub struct MapInputKV<'a> {
    pub key: usize,
    pub value: &'a str,
}

impl<'a> MapInputKV<'a> {
    pub fn new(key: usize, value: &'a str) -> Self {
        MapInputKV { key, value }
    }
}

/// The `Map` trait defines a function for performing a map operation.
///
/// The output value type is decided by the implementation of this trait. It must be
/// `Combinable` so the pipeline can pre-aggregate it inside each partition.
///
/// # Arguments
///
/// * `input` - A `MapInputKV` containing the record to map.
/// * `emitter` - A struct implementing the `EmitIntermediate` trait, provided by the map runner.
///
/// # Outputs
///
/// An empty result used for returning an error. Outputs of the map operation are sent out through
/// the `emitter`.
pub trait Map {
    type Value: Combinable;
    fn map<E>(&self, input: MapInputKV, emitter: E) -> Result<()>
    where
        E: EmitIntermediate<String, Self::Value>;
}

/// `WordCountMapper` emits `(word, 1)` for every whitespace separated token of a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountMapper;

impl Map for WordCountMapper {
    type Value = u64;
    fn map<E>(&self, input: MapInputKV, mut emitter: E) -> Result<()>
    where
        E: EmitIntermediate<String, Self::Value>,
    {
        for (word, count) in tokenize(input.value) {
            emitter.emit(word.to_owned(), count).chain_err(|| {
                format!("Error emitting pair for '{}'.", word)
            })?;
        }
        Ok(())
    }
}
