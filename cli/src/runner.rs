use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Write};

use clap::ArgMatches;

use errors::*;
use tally::{read_records, word_count, write_final_output, OutputFormat, Partitioning,
            PipelineConfig, Record};

const STDIN_NAME: &str = "-";

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: ::std::str::FromStr,
    T::Err: ::std::fmt::Display,
{
    match matches.value_of(name) {
        None => Ok(None),
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => Err(
                format!(
                    "Error occured while converting '{}' for --{}: {}",
                    value,
                    name,
                    err
                ).into(),
            ),
        },
    }
}

/// Loads the configuration file if one was given and applies the command-line overrides.
pub fn build_config(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.value_of("config") {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(partition_count) = parse_arg(matches, "partitions")? {
        config.partition_count = partition_count;
    }
    if let Some(timeout) = parse_arg(matches, "timeout")? {
        config.per_partition_timeout_ms = timeout;
    }
    if let Some(partitioning) = matches.value_of("partitioning") {
        config.partitioning = Partitioning::from_name(partitioning)?;
    }
    if matches.is_present("no-combiner") {
        config.use_combiner = false;
    }

    config.validate()?;
    Ok(config)
}

fn read_input(matches: &ArgMatches) -> Result<Vec<Record>> {
    let inputs: Vec<&str> = match matches.values_of("input") {
        Some(values) => values.collect(),
        None => vec![STDIN_NAME],
    };

    let mut records = Vec::new();
    for input in inputs {
        let first_index = records.len();
        let mut input_records = if input == STDIN_NAME {
            let stdin = io::stdin();
            let source = stdin.lock();
            read_records(source, "<stdin>", first_index)?
        } else {
            let file = File::open(input).chain_err(|| {
                ::tally::ErrorKind::InputReadError(input.to_owned(), first_index)
            })?;
            read_records(BufReader::new(file), input, first_index)?
        };
        records.append(&mut input_records);
    }

    Ok(records)
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches).chain_err(|| "Invalid pipeline configuration.")?;
    let format = OutputFormat::from_name(matches.value_of("format").unwrap_or("text"))?;

    let records = read_input(matches).chain_err(|| "Error reading input.")?;
    let output = word_count(records, config).chain_err(|| "Word count job failed.")?;

    match matches.value_of("output") {
        Some(path) => {
            let file = File::create(path).chain_err(|| {
                format!("Error creating output file {}", path)
            })?;
            let mut sink = BufWriter::new(file);
            write_final_output(&mut sink, &output.counts, format)?;
            info!("Wrote {} words to {}", output.counts.len(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            write_final_output(&mut sink, &output.counts, format)?;
        }
    }

    if matches.is_present("counters") {
        let summary = output.summary.to_json()?;
        writeln!(io::stderr(), "{}", summary)?;
    }

    Ok(())
}
