extern crate tally;
#[macro_use]
extern crate error_chain;

use std::io::{stdin, stdout};

use tally::*;

/// Counts words read from stdin, ignoring case and surrounding punctuation.
struct CaseFoldingMapper;
impl Map for CaseFoldingMapper {
    type Value = u64;
    fn map<E>(&self, input: MapInputKV, mut emitter: E) -> Result<()>
    where
        E: EmitIntermediate<String, Self::Value>,
    {
        for (token, count) in tokenize(input.value) {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if !word.is_empty() {
                emitter.emit(word, count).chain_err(
                    || "Error emitting map key-value pair.",
                )?;
            }
        }
        Ok(())
    }
}

fn run() -> Result<()> {
    let stdin = stdin();
    let records = read_records(stdin.lock(), "<stdin>", 0)?;

    let job = JobBuilder::new()
        .mapper(CaseFoldingMapper)
        .reducer(SumReducer)
        .config(PipelineConfig {
            partition_count: 8,
            ..Default::default()
        })
        .build()
        .chain_err(|| "Error building job.")?;

    let output = job.run(records)?;
    write_final_output(&mut stdout(), &output.counts, OutputFormat::Text)
}

quick_main!(run);
