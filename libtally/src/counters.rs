use chrono::prelude::*;
use serde_json;

use config::PipelineConfig;
use errors::*;
use intermediate::PartitionOutput;

/// `JobCounters` are the standard MapReduce job counters.
///
/// `reduce_input_records` is the number of records crossing from the partitions to the merge
/// stage. Comparing it with `map_output_records` shows how much the combiner saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounters {
    pub partitions: u64,
    pub map_input_records: u64,
    pub map_output_records: u64,
    pub combine_input_records: u64,
    pub combine_output_records: u64,
    pub reduce_input_records: u64,
    pub reduce_input_groups: u64,
    pub reduce_output_records: u64,
}

impl JobCounters {
    /// Adds the counters of one finished partition.
    pub fn record_partition<V>(&mut self, output: &PartitionOutput<V>) {
        let shipped = output.pairs.len() as u64;

        self.partitions += 1;
        self.map_input_records += output.input_records;
        self.map_output_records += output.map_output_records;
        if output.combined {
            self.combine_input_records += output.map_output_records;
            self.combine_output_records += shipped;
        }
        self.reduce_input_records += shipped;
    }

    /// Records the size of the merged output.
    pub fn record_reduce(&mut self, groups: usize) {
        self.reduce_input_groups = groups as u64;
        self.reduce_output_records = groups as u64;
    }
}

/// `JobSummary` describes a finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub time_started: DateTime<Utc>,
    pub time_completed: DateTime<Utc>,
    pub duration_ms: i64,
    pub config: PipelineConfig,
    pub counters: JobCounters,
}

impl JobSummary {
    pub fn new(
        job_id: String,
        time_started: DateTime<Utc>,
        config: PipelineConfig,
        counters: JobCounters,
    ) -> Self {
        let time_completed = Utc::now();
        JobSummary {
            job_id,
            time_started,
            time_completed,
            duration_ms: time_completed
                .signed_duration_since(time_started)
                .num_milliseconds(),
            config,
            counters,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).chain_err(|| "Error serialising job summary.")
    }
}
