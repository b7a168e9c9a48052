#![recursion_limit = "1024"]

extern crate chrono;
#[macro_use]
extern crate error_chain;
extern crate futures;
extern crate futures_cpupool;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate uuid;

pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }

        errors {
            InputReadError(input: String, record: usize) {
                description("input could not be read")
                display("Error reading input '{}' at record {}", input, record)
            }
            PartitionTimeout(partition: usize, timeout: ::std::time::Duration) {
                description("partition exceeded its time budget")
                display("Partition {} did not finish within {:?}", partition, timeout)
            }
            EncodingError(partition: usize, record: usize) {
                description("record is not valid UTF-8")
                display("Partition {}: record {} is not valid UTF-8", partition, record)
            }
            MapFailed(partition: usize, record: usize) {
                description("map operation failed")
                display("Partition {}: map operation failed on record {}", partition, record)
            }
            PartitionPanicked(partition: usize) {
                description("partition worker panicked")
                display("Partition {}: worker panicked", partition)
            }
            PartitionAborted(partition: usize) {
                description("partition stopped after another partition failed")
                display("Partition {} was aborted", partition)
            }
            ReduceFailed(key: String) {
                description("reduce operation failed")
                display("Reduce operation failed for key '{}'", key)
            }
            InvalidConfig(reason: String) {
                description("invalid pipeline configuration")
                display("Invalid pipeline configuration: {}", reason)
            }
        }
    }
}

pub mod combiner;
pub mod config;
pub mod counters;
pub mod emitter;
pub mod intermediate;
pub mod io;
pub mod mapper;
pub mod partition;
pub mod reducer;
pub mod registry;
pub mod runner;
pub mod serialise;
pub mod tokenizer;

pub use combiner::{Combinable, PartialCounts};
pub use config::{PipelineConfig, Partitioning};
pub use counters::{JobCounters, JobSummary};
pub use emitter::{CombiningEmitter, EmitIntermediate, IntermediateVecEmitter};
pub use errors::*;
pub use intermediate::{FinalCount, FinalCounts, IntermediateInputKV, PartitionOutput, Record};
pub use io::{read_records, write_final_output, OutputFormat};
pub use mapper::{Map, MapInputKV, WordCountMapper};
pub use partition::{partition_records, ContiguousPartitioner, HashPartitioner, Partition,
                    RoundRobinPartitioner};
pub use reducer::{merge, Reduce, SumReducer};
pub use registry::{Job, JobBuilder};
pub use runner::JobOutput;
pub use tokenizer::{tokenize, Tokens};

/// Runs a plain word count over `records` using the default mapper and reducer.
pub fn word_count(records: Vec<Record>, config: PipelineConfig) -> Result<JobOutput<u64>> {
    let job = JobBuilder::new()
        .mapper(WordCountMapper)
        .reducer(SumReducer)
        .config(config)
        .build()
        .chain_err(|| "Error building word count job.")?;

    job.run(records)
}
