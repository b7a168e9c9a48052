use std::panic::{self, AssertUnwindSafe};
use std::str;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use chrono::prelude::*;
use futures::future;
use futures::prelude::*;
use futures::sync::oneshot;
use futures_cpupool;

use combiner::PartialCounts;
use counters::{JobCounters, JobSummary};
use emitter::{CombiningEmitter, IntermediateVecEmitter};
use errors::*;
use intermediate::{FinalCounts, PartitionOutput, Record};
use mapper::{Map, MapInputKV};
use partition::partition_records;
use reducer::{merge, Reduce};
use registry::Job;

/// `JobOutput` is the result of a successful job.
#[derive(Debug)]
pub struct JobOutput<V> {
    pub counts: FinalCounts<V>,
    pub summary: JobSummary,
}

impl<M, R> Job<M, R>
where
    M: Map + Send + Sync + 'static,
    M::Value: Clone + Send + 'static,
    R: Reduce<M::Value>,
{
    /// Runs the job over `records`.
    ///
    /// The input is split into partitions which are mapped, and combined if enabled, on a pool
    /// of worker threads. Once every partition has finished the outputs are merged and reduced
    /// on the calling thread. If any partition fails or runs out of time, the job fails with the
    /// error of that partition and produces no output.
    pub fn run(&self, records: Vec<Record>) -> Result<JobOutput<M::Value>> {
        let time_started = Utc::now();
        info!(
            "Job {}: {} records, {} partitions ({:?}), combiner {}",
            self.id,
            records.len(),
            self.config.partition_count,
            self.config.partitioning,
            if self.config.use_combiner { "on" } else { "off" }
        );

        let partitions = partition_records(
            records,
            self.config.partition_count,
            self.config.partitioning,
        ).chain_err(|| "Error partitioning job input.")?;

        let outputs = self.run_partitions(partitions).map_err(|err| {
            warn!("Job {} failed: {}", self.id, err);
            err
        })?;

        let mut counters = JobCounters::default();
        for output in &outputs {
            counters.record_partition(output);
        }

        let counts = merge(&self.reducer, &outputs).chain_err(
            || "Error merging partition outputs.",
        )?;
        counters.record_reduce(counts.len());

        let summary = JobSummary::new(
            self.id.clone(),
            time_started,
            self.config.clone(),
            counters,
        );
        info!(
            "Job {}: {} words from {} map output records ({} shuffled) in {}ms",
            self.id,
            counts.len(),
            summary.counters.map_output_records,
            summary.counters.reduce_input_records,
            summary.duration_ms
        );

        Ok(JobOutput { counts, summary })
    }

    /// Maps every partition on its own worker and waits for all of them.
    ///
    /// Each partition's future is raced against a timeout oneshot, fired by a watchdog thread
    /// once the time budget has passed. The first failure sets the abort flag so the remaining
    /// workers stop at their next record.
    fn run_partitions(
        &self,
        partitions: Vec<Vec<Record>>,
    ) -> Result<Vec<PartitionOutput<M::Value>>> {
        let timeout = self.config.per_partition_timeout();
        let use_combiner = self.config.use_combiner;
        let cpu_pool = futures_cpupool::Builder::new()
            .pool_size(partitions.len())
            .name_prefix("tally-worker-")
            .create();
        let abort = Arc::new(AtomicBool::new(false));

        let mut timeout_senders = Vec::with_capacity(partitions.len());
        let mut partition_futures = Vec::with_capacity(partitions.len());
        for (partition, records) in partitions.into_iter().enumerate() {
            let (timeout_send, timeout_recv) = oneshot::channel::<()>();
            timeout_senders.push(timeout_send);

            let mapper = Arc::clone(&self.mapper);
            let worker_abort = Arc::clone(&abort);
            let work = cpu_pool.spawn_fn(move || {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    run_partition(&*mapper, partition, records, use_combiner, &worker_abort)
                })).unwrap_or_else(|_| Err(ErrorKind::PartitionPanicked(partition).into()))
            });
            let expiry = timeout_recv.then(move |_| {
                Err::<PartitionOutput<M::Value>, Error>(
                    ErrorKind::PartitionTimeout(partition, timeout).into(),
                )
            });

            let failure_abort = Arc::clone(&abort);
            let partition_future = work.select(expiry)
                // Whichever of the work and the timeout resolves first decides the partition.
                .map(|(win, _)| win)
                .map_err(|(err, _)| err)
                .map_err(move |err| {
                    failure_abort.store(true, Ordering::SeqCst);
                    err
                });
            partition_futures.push(partition_future);
        }

        let (done_send, done_recv) = mpsc::channel::<()>();
        let watchdog = thread::Builder::new()
            .name("tally-watchdog".to_owned())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = done_recv.recv_timeout(timeout) {
                    for sender in timeout_senders {
                        // The partition may already be finished, in which case nobody listens.
                        let _ = sender.send(());
                    }
                }
            })
            .chain_err(|| "Error starting partition watchdog.")?;

        let result = future::join_all(partition_futures).wait();

        let _ = done_send.send(());
        if watchdog.join().is_err() {
            warn!("Job {}: partition watchdog panicked", self.id);
        }

        result
    }
}

fn run_partition<M>(
    mapper: &M,
    partition: usize,
    records: Vec<Record>,
    use_combiner: bool,
    abort: &AtomicBool,
) -> Result<PartitionOutput<M::Value>>
where
    M: Map,
{
    debug!("Partition {}: mapping {} records", partition, records.len());
    let input_records = records.len() as u64;

    let output = if use_combiner {
        let mut partial = PartialCounts::new();
        map_records(partition, &records, abort, |input| {
            mapper.map(input, CombiningEmitter::new(&mut partial))
        })?;

        PartitionOutput {
            partition,
            input_records,
            map_output_records: partial.input_records(),
            combined: true,
            pairs: partial.into_pairs(),
        }
    } else {
        let mut pairs = Vec::new();
        map_records(partition, &records, abort, |input| {
            mapper.map(input, IntermediateVecEmitter::new(&mut pairs))
        })?;

        PartitionOutput {
            partition,
            input_records,
            map_output_records: pairs.len() as u64,
            combined: false,
            pairs,
        }
    };

    debug!(
        "Partition {}: {} map output records, {} shipped",
        partition,
        output.map_output_records,
        output.pairs.len()
    );
    Ok(output)
}

fn map_records<F>(
    partition: usize,
    records: &[Record],
    abort: &AtomicBool,
    mut map_fn: F,
) -> Result<()>
where
    F: FnMut(MapInputKV) -> Result<()>,
{
    for record in records {
        if abort.load(Ordering::SeqCst) {
            return Err(ErrorKind::PartitionAborted(partition).into());
        }

        let line = str::from_utf8(&record.line).chain_err(|| {
            ErrorKind::EncodingError(partition, record.index)
        })?;
        map_fn(MapInputKV::new(record.index, line)).chain_err(|| {
            ErrorKind::MapFailed(partition, record.index)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use config::{Partitioning, PipelineConfig};
    use emitter::EmitIntermediate;
    use mapper::WordCountMapper;
    use reducer::SumReducer;
    use registry::JobBuilder;

    fn config(partition_count: usize) -> PipelineConfig {
        PipelineConfig {
            partition_count,
            ..Default::default()
        }
    }

    fn run_word_count(lines: Vec<&str>, config: PipelineConfig) -> Result<JobOutput<u64>> {
        JobBuilder::new()
            .mapper(WordCountMapper)
            .reducer(SumReducer)
            .config(config)
            .build()?
            .run(Record::from_lines(lines))
    }

    /// Sleeps on every record of the given line content.
    struct SleepyMapper {
        trigger: &'static str,
        delay: Duration,
    }

    impl Map for SleepyMapper {
        type Value = u64;
        fn map<E>(&self, input: MapInputKV, emitter: E) -> Result<()>
        where
            E: EmitIntermediate<String, Self::Value>,
        {
            if input.value == self.trigger {
                thread::sleep(self.delay);
            }
            WordCountMapper.map(input, emitter)
        }
    }

    struct FailingMapper;

    impl Map for FailingMapper {
        type Value = u64;
        fn map<E>(&self, input: MapInputKV, emitter: E) -> Result<()>
        where
            E: EmitIntermediate<String, Self::Value>,
        {
            if input.value.contains("boom") {
                return Err("mapper exploded".into());
            }
            WordCountMapper.map(input, emitter)
        }
    }

    struct PanickingMapper;

    impl Map for PanickingMapper {
        type Value = u64;
        fn map<E>(&self, input: MapInputKV, emitter: E) -> Result<()>
        where
            E: EmitIntermediate<String, Self::Value>,
        {
            if input.value == "boom" {
                panic!("mapper panicked on {}", input.key);
            }
            WordCountMapper.map(input, emitter)
        }
    }

    #[test]
    fn single_partition_word_count() {
        let lines = vec!["hello hadoop", "hello docker", "hello world"];

        let output = run_word_count(lines, config(1)).unwrap();

        assert_eq!(
            vec![
                ("docker".to_owned(), 1),
                ("hadoop".to_owned(), 1),
                ("hello".to_owned(), 3),
                ("world".to_owned(), 1),
            ],
            output.counts.to_pairs()
        );
    }

    #[test]
    fn three_partitions_match_one() {
        let lines = vec!["hello hadoop", "hello docker", "hello world"];

        let one = run_word_count(lines.clone(), config(1)).unwrap();
        let three = run_word_count(lines, config(3)).unwrap();

        assert_eq!(one.counts, three.counts);
        assert_eq!(3, three.summary.counters.partitions);
    }

    #[test]
    fn case_sensitive_counts() {
        let output = run_word_count(vec!["Hello hello"], config(2)).unwrap();

        assert_eq!(
            vec![("Hello".to_owned(), 1), ("hello".to_owned(), 1)],
            output.counts.to_pairs()
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        let output = run_word_count(Vec::new(), config(4)).unwrap();

        assert!(output.counts.is_empty());
        assert_eq!(0, output.summary.counters.map_input_records);
    }

    #[test]
    fn combiner_shrinks_shuffle() {
        let lines = vec!["a a a b", "a b b b"];
        let mut without = config(1);
        without.use_combiner = false;

        let combined = run_word_count(lines.clone(), config(1)).unwrap();
        let uncombined = run_word_count(lines, without).unwrap();

        assert_eq!(combined.counts, uncombined.counts);
        assert_eq!(8, combined.summary.counters.map_output_records);
        assert_eq!(2, combined.summary.counters.reduce_input_records);
        assert_eq!(8, uncombined.summary.counters.reduce_input_records);
        assert_eq!(0, uncombined.summary.counters.combine_input_records);
    }

    #[test]
    fn invalid_utf8_is_encoding_error() {
        let records = vec![
            Record::new(0, "fine line"),
            Record::new(1, "another"),
            Record::new(2, vec![b'o', b'k', b' ', 0xc3, 0x28]),
        ];
        let job = JobBuilder::new()
            .mapper(WordCountMapper)
            .reducer(SumReducer)
            .config(config(2))
            .build()
            .unwrap();

        let err = job.run(records).unwrap_err();

        match *err.kind() {
            ErrorKind::EncodingError(1, 2) => {}
            ref other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn mapper_failure_names_partition_and_record() {
        let job = JobBuilder::new()
            .mapper(FailingMapper)
            .reducer(SumReducer)
            .config(PipelineConfig {
                partition_count: 2,
                partitioning: Partitioning::RoundRobin,
                ..Default::default()
            })
            .build()
            .unwrap();

        let err = job.run(Record::from_lines(vec!["a", "b", "c", "boom"]))
            .unwrap_err();

        match *err.kind() {
            ErrorKind::MapFailed(1, 3) => {}
            ref other => panic!("unexpected error: {}", other),
        }
        assert_eq!(1, err.iter().skip(1).count());
    }

    #[test]
    fn mapper_panic_fails_the_partition() {
        let job = JobBuilder::new()
            .mapper(PanickingMapper)
            .reducer(SumReducer)
            .config(config(2))
            .build()
            .unwrap();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            job.run(Record::from_lines(vec!["a", "boom"]))
        }));

        let err = result.expect("panic escaped the job").unwrap_err();
        match *err.kind() {
            ErrorKind::PartitionPanicked(1) => {}
            ref other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn oversized_partition_count_is_rejected() {
        let err = run_word_count(vec!["hello world"], config(usize::max_value())).unwrap_err();

        assert!(err.iter().any(|cause| {
            cause.to_string().contains("partition_count must be at most")
        }));
    }

    #[test]
    fn slow_partition_times_out() {
        let job = JobBuilder::new()
            .mapper(SleepyMapper {
                trigger: "slow",
                delay: Duration::from_millis(2_000),
            })
            .reducer(SumReducer)
            .config(PipelineConfig {
                partition_count: 2,
                per_partition_timeout_ms: 100,
                ..Default::default()
            })
            .build()
            .unwrap();

        let err = job.run(Record::from_lines(vec!["fast", "slow"])).unwrap_err();

        match *err.kind() {
            ErrorKind::PartitionTimeout(1, timeout) => {
                assert_eq!(Duration::from_millis(100), timeout)
            }
            ref other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn partitions_within_budget_succeed() {
        let job = JobBuilder::new()
            .mapper(SleepyMapper {
                trigger: "slow",
                delay: Duration::from_millis(10),
            })
            .reducer(SumReducer)
            .config(PipelineConfig {
                partition_count: 2,
                per_partition_timeout_ms: 5_000,
                ..Default::default()
            })
            .build()
            .unwrap();

        let output = job.run(Record::from_lines(vec!["slow", "slow fast"])).unwrap();

        assert_eq!(Some(&2), output.counts.get("slow"));
        assert_eq!(Some(&1), output.counts.get("fast"));
    }

    #[test]
    fn failure_stops_other_partitions() {
        let abort = AtomicBool::new(true);
        let records = Record::from_lines(vec!["a b"]);

        let err = run_partition(&WordCountMapper, 3, records, true, &abort).unwrap_err();

        match *err.kind() {
            ErrorKind::PartitionAborted(3) => {}
            ref other => panic!("unexpected error: {}", other),
        }
    }
}
