use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use config::{Partitioning, MAX_PARTITION_COUNT};
use errors::*;
use intermediate::Record;

/// The `PartitionInput` is a struct for passing input data to a `Partition`.
///
/// `position` is the position of the record in the input being partitioned, which is not
/// necessarily equal to `record.index`.
#[derive(Debug, PartialEq)]
pub struct PartitionInput<'a> {
    pub position: usize,
    pub record: &'a Record,
}

impl<'a> PartitionInput<'a> {
    pub fn new(position: usize, record: &'a Record) -> Self {
        PartitionInput { position, record }
    }
}

/// The `Partition` trait defines a function for assigning input records to partitions.
///
/// # Arguments
///
/// * `input` - A `PartitionInput` containing the record and its position.
///
/// # Outputs
///
/// A `Result<usize>`, representing the partition for the given record. Implementations must be
/// deterministic.
pub trait Partition {
    fn partition(&self, input: PartitionInput) -> Result<usize>;
}

/// `ContiguousPartitioner` splits the input into contiguous chunks of equal size. The last chunk
/// may be shorter.
pub struct ContiguousPartitioner {
    partition_count: usize,
    chunk_size: usize,
}

impl ContiguousPartitioner {
    pub fn new(partition_count: usize, record_count: usize) -> Self {
        let partition_count = partition_count.max(1);
        let remainder = (record_count % partition_count != 0) as usize;
        let chunk_size = (record_count / partition_count + remainder).max(1);
        ContiguousPartitioner {
            partition_count,
            chunk_size,
        }
    }
}

impl Partition for ContiguousPartitioner {
    fn partition(&self, input: PartitionInput) -> Result<usize> {
        Ok((input.position / self.chunk_size).min(self.partition_count - 1))
    }
}

/// `RoundRobinPartitioner` deals records out to partitions in turn.
pub struct RoundRobinPartitioner {
    partition_count: usize,
}

impl RoundRobinPartitioner {
    pub fn new(partition_count: usize) -> Self {
        RoundRobinPartitioner { partition_count: partition_count.max(1) }
    }
}

impl Partition for RoundRobinPartitioner {
    fn partition(&self, input: PartitionInput) -> Result<usize> {
        Ok(input.position % self.partition_count)
    }
}

/// `HashPartitioner` picks a partition from a hash of the record's content, so identical lines
/// always land in the same partition.
pub struct HashPartitioner {
    partition_count: usize,
}

impl HashPartitioner {
    pub fn new(partition_count: usize) -> Self {
        HashPartitioner { partition_count: partition_count.max(1) }
    }

    fn calculate_hash<T: Hash>(&self, t: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }
}

impl Partition for HashPartitioner {
    fn partition(&self, input: PartitionInput) -> Result<usize> {
        let hash = self.calculate_hash(&input.record.line);
        Ok((hash % self.partition_count as u64) as usize)
    }
}

/// Assigns every record to one of `partition_count` partitions using `partitioner`.
///
/// Always returns exactly `partition_count` partitions, some of which may be empty. Records keep
/// their relative order inside a partition.
pub fn assign_partitions<P: Partition>(
    partitioner: &P,
    partition_count: usize,
    records: Vec<Record>,
) -> Result<Vec<Vec<Record>>> {
    let mut partitions: Vec<Vec<Record>> = (0..partition_count).map(|_| Vec::new()).collect();

    for (position, record) in records.into_iter().enumerate() {
        let partition = partitioner
            .partition(PartitionInput::new(position, &record))
            .chain_err(|| format!("Error partitioning record {}", record.index))?;
        if partition >= partition_count {
            return Err(
                format!(
                    "Partitioner returned partition {} for record {}, but there are only {}",
                    partition,
                    record.index,
                    partition_count
                ).into(),
            );
        }
        partitions[partition].push(record);
    }

    Ok(partitions)
}

/// Splits `records` into `partition_count` partitions with the given strategy.
pub fn partition_records(
    records: Vec<Record>,
    partition_count: usize,
    partitioning: Partitioning,
) -> Result<Vec<Vec<Record>>> {
    if partition_count == 0 || partition_count > MAX_PARTITION_COUNT {
        return Err(
            ErrorKind::InvalidConfig(format!(
                "partition_count must be between 1 and {}, got {}",
                MAX_PARTITION_COUNT,
                partition_count
            )).into(),
        );
    }

    match partitioning {
        Partitioning::Contiguous => {
            let partitioner = ContiguousPartitioner::new(partition_count, records.len());
            assign_partitions(&partitioner, partition_count, records)
        }
        Partitioning::RoundRobin => {
            let partitioner = RoundRobinPartitioner::new(partition_count);
            assign_partitions(&partitioner, partition_count, records)
        }
        Partitioning::Hash => {
            let partitioner = HashPartitioner::new(partition_count);
            assign_partitions(&partitioner, partition_count, records)
        }
    }
}
