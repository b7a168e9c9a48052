use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serde_json;

use errors::*;

const DEFAULT_PARTITION_COUNT: usize = 4;
const DEFAULT_PARTITION_TIMEOUT_MS: u64 = 60_000;

/// Upper bound on `partition_count`. Every partition gets its own worker thread.
pub const MAX_PARTITION_COUNT: usize = 1024;

/// `Partitioning` selects how input records are assigned to partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partitioning {
    /// Fixed-size contiguous chunks.
    Contiguous,
    /// Record `i` goes to partition `i mod partition_count`.
    RoundRobin,
    /// Partition chosen from a hash of the line content.
    Hash,
}

impl Default for Partitioning {
    fn default() -> Self {
        Partitioning::Contiguous
    }
}

impl Partitioning {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "contiguous" => Ok(Partitioning::Contiguous),
            "round-robin" => Ok(Partitioning::RoundRobin),
            "hash" => Ok(Partitioning::Hash),
            _ => Err(
                ErrorKind::InvalidConfig(format!("unknown partitioning '{}'", name)).into(),
            ),
        }
    }
}

/// `PipelineConfig` holds the options recognised by a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of partitions, which is also the number of worker threads.
    pub partition_count: usize,
    /// Time budget of each partition, in milliseconds.
    pub per_partition_timeout_ms: u64,
    pub partitioning: Partitioning,
    /// Whether map output is combined inside each partition before the merge.
    pub use_combiner: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            partition_count: DEFAULT_PARTITION_COUNT,
            per_partition_timeout_ms: DEFAULT_PARTITION_TIMEOUT_MS,
            partitioning: Partitioning::default(),
            use_combiner: true,
        }
    }
}

impl PipelineConfig {
    pub fn per_partition_timeout(&self) -> Duration {
        Duration::from_millis(self.per_partition_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(
                ErrorKind::InvalidConfig("partition_count must be at least 1".to_owned()).into(),
            );
        }
        if self.partition_count > MAX_PARTITION_COUNT {
            return Err(
                ErrorKind::InvalidConfig(format!(
                    "partition_count must be at most {}, got {}",
                    MAX_PARTITION_COUNT,
                    self.partition_count
                )).into(),
            );
        }
        if self.per_partition_timeout_ms == 0 {
            return Err(
                ErrorKind::InvalidConfig("per_partition_timeout_ms must be positive".to_owned())
                    .into(),
            );
        }
        Ok(())
    }

    /// Reads a JSON configuration. Missing fields take their default values.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_reader(source).chain_err(
            || "Error parsing pipeline configuration JSON.",
        )?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).chain_err(|| {
            format!("Error opening configuration file {}", path.display())
        })?;
        PipelineConfig::from_reader(BufReader::new(file)).chain_err(|| {
            format!("Error loading configuration file {}", path.display())
        })
    }
}
