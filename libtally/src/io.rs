use std::fmt::Display;
use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json;

use errors::*;
use intermediate::{FinalCounts, Record};
use serialise::FinalOutputObject;

/// `OutputFormat` selects how final counts are written to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `word<TAB>total` line per word.
    Text,
    /// A single `{"counts":[...]}` JSON object.
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format '{}'", name).into()),
        }
    }
}

/// `read_records` reads every line of `source` as a `Record`.
///
/// Lines are kept as raw bytes with the trailing `\n` or `\r\n` removed; they are decoded when
/// they are mapped. Records are numbered from `first_index` so several sources can be read into
/// one input. `name` identifies the source in errors.
pub fn read_records<R: BufRead>(
    mut source: R,
    name: &str,
    first_index: usize,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut index = first_index;

    loop {
        let mut line = Vec::new();
        let bytes_read = source.read_until(b'\n', &mut line).chain_err(|| {
            ErrorKind::InputReadError(name.to_owned(), index)
        })?;
        if bytes_read == 0 {
            break;
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        records.push(Record::new(index, line));
        index += 1;
    }

    if records.is_empty() {
        warn!("No records read from {}", name);
    } else {
        debug!("Read {} records from {}", records.len(), name);
    }
    Ok(records)
}

/// `write_final_output` writes the final counts of a job to `sink` in the given format.
pub fn write_final_output<W, V>(
    sink: &mut W,
    counts: &FinalCounts<V>,
    format: OutputFormat,
) -> Result<()>
where
    W: Write,
    V: Display + Serialize,
{
    match format {
        OutputFormat::Text => {
            for count in counts {
                writeln!(sink, "{}\t{}", count.word, count.total).chain_err(
                    || "Error writing final output.",
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *sink, &FinalOutputObject::new(counts))
                .chain_err(|| "Error serialising final output.")?;
            writeln!(sink).chain_err(|| "Error writing final output.")?;
        }
    }
    sink.flush().chain_err(|| "Error flushing final output.")?;
    Ok(())
}
