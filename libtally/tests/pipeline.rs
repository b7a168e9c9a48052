/// Property tests for the whole pipeline, run over seeded random corpora.
extern crate rand;
extern crate tally;

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, XorShiftRng};

use tally::*;

const VOCABULARY: &[&str] = &[
    "hello", "Hello", "hadoop", "docker", "world", "map", "reduce", "combine", "shuffle", "sort",
    "a", "ünïcödé", "word,", "word",
];
const SEPARATORS: &[&str] = &[" ", "  ", "\t", " \t "];

fn random_lines(seed: u32, line_count: usize) -> Vec<String> {
    let mut rng: XorShiftRng = SeedableRng::from_seed([seed, 0x9e37_79b9, 7, 1]);
    (0..line_count)
        .map(|_| {
            let word_count = rng.gen_range(0, 12);
            let mut line = String::new();
            if rng.gen_range(0, 4) == 0 {
                line.push(' ');
            }
            for i in 0..word_count {
                if i > 0 {
                    line.push_str(SEPARATORS[rng.gen_range(0, SEPARATORS.len())]);
                }
                line.push_str(VOCABULARY[rng.gen_range(0, VOCABULARY.len())]);
            }
            line
        })
        .collect()
}

/// Counts words by grouping every pair directly, without partitions or a combiner.
fn direct_counts(lines: &[String]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for line in lines {
        for (word, count) in tokenize(line) {
            *counts.entry(word.to_owned()).or_insert(0) += count;
        }
    }
    counts.into_iter().collect()
}

fn run(lines: &[String], config: PipelineConfig) -> JobOutput<u64> {
    word_count(Record::from_lines(lines.to_vec()), config).unwrap()
}

fn config(
    partition_count: usize,
    partitioning: Partitioning,
    use_combiner: bool,
) -> PipelineConfig {
    PipelineConfig {
        partition_count,
        partitioning,
        use_combiner,
        ..Default::default()
    }
}

#[test]
fn combiner_transparency_over_partitionings() {
    for seed in 1..6 {
        let lines = random_lines(seed, 40 + seed as usize * 13);
        let expected = direct_counts(&lines);

        for &partitioning in &[
            Partitioning::Contiguous,
            Partitioning::RoundRobin,
            Partitioning::Hash,
        ] {
            for &partition_count in &[1, 2, 3, 7, 16] {
                for &use_combiner in &[true, false] {
                    let output = run(
                        &lines,
                        config(partition_count, partitioning, use_combiner),
                    );
                    assert_eq!(
                        expected,
                        output.counts.to_pairs(),
                        "seed {} partitioning {:?} partitions {} combiner {}",
                        seed,
                        partitioning,
                        partition_count,
                        use_combiner
                    );
                }
            }
        }
    }
}

#[test]
fn output_is_strictly_sorted() {
    let lines = random_lines(42, 200);

    let output = run(&lines, config(5, Partitioning::RoundRobin, true));

    let words: Vec<&str> = output.counts.iter().map(|c| c.word.as_str()).collect();
    assert!(words.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(output.counts.iter().all(|c| c.total >= 1));
}

#[test]
fn counters_account_for_every_pair() {
    let lines = random_lines(9, 120);
    let total_words: u64 = direct_counts(&lines).iter().map(|&(_, count)| count).sum();

    let combined = run(&lines, config(4, Partitioning::Contiguous, true));
    let uncombined = run(&lines, config(4, Partitioning::Contiguous, false));

    let with = &combined.summary.counters;
    assert_eq!(120, with.map_input_records);
    assert_eq!(total_words, with.map_output_records);
    assert_eq!(total_words, with.combine_input_records);
    assert_eq!(with.combine_output_records, with.reduce_input_records);
    assert!(with.reduce_input_records <= with.map_output_records);
    assert_eq!(combined.counts.len() as u64, with.reduce_output_records);

    let without = &uncombined.summary.counters;
    assert_eq!(total_words, without.reduce_input_records);
    assert_eq!(0, without.combine_output_records);
}

#[test]
fn tutorial_example() {
    let lines = vec![
        "hello hadoop".to_owned(),
        "hello docker".to_owned(),
        "hello world".to_owned(),
    ];
    let expected = vec![
        ("docker".to_owned(), 1),
        ("hadoop".to_owned(), 1),
        ("hello".to_owned(), 3),
        ("world".to_owned(), 1),
    ];

    for &partition_count in &[1, 3] {
        let output = run(&lines, config(partition_count, Partitioning::Contiguous, true));
        assert_eq!(expected, output.counts.to_pairs());
    }
}

#[test]
fn reading_and_writing_round_trip_through_the_pipeline() {
    let input = "Hello hello\r\nhello\n";
    let records = read_records(input.as_bytes(), "inline", 0).unwrap();

    let output = word_count(records, PipelineConfig::default()).unwrap();
    let mut sink = Vec::new();
    write_final_output(&mut sink, &output.counts, OutputFormat::Text).unwrap();

    assert_eq!("Hello\t1\nhello\t2\n", String::from_utf8(sink).unwrap());
}

#[test]
fn merging_partial_counts_in_a_tree_matches_serial_merge() {
    let lines = random_lines(3, 64);
    let partials: Vec<PartialCounts<u64>> = lines
        .chunks(8)
        .map(|chunk| {
            tally::combiner::combine(chunk.iter().flat_map(|line| {
                tokenize(line)
                    .map(|(word, count)| (word.to_owned(), count))
                    .collect::<Vec<_>>()
            }))
        })
        .collect();

    let mut serial = PartialCounts::new();
    for partial in partials.clone() {
        serial.merge(partial);
    }

    let mut level = partials;
    while level.len() > 1 {
        let mut next = Vec::new();
        let mut iter = level.into_iter();
        while let Some(mut left) = iter.next() {
            if let Some(right) = iter.next() {
                left.merge(right);
            }
            next.push(left);
        }
        level = next;
    }

    let tree = level.pop().unwrap();
    let mut serial_pairs = serial.into_pairs();
    let mut tree_pairs = tree.into_pairs();
    serial_pairs.sort();
    tree_pairs.sort();
    assert_eq!(serial_pairs, tree_pairs);
    assert_eq!(direct_counts(&lines), serial_pairs);
}
