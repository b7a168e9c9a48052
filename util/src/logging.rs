use env_logger::Builder;
use error_chain::ChainedError;
use errors::*;
use std::env;

// Everything outside the pipeline library only reports warnings unless RUST_LOG says otherwise.
const DEFAULT_LOG_CONFIG: &str = "warn,tally=info,cli=info";
const VERBOSE_LOG_CONFIG: &str = "warn,tally=debug,cli=debug";

/// Initialises `env_logger` from `RUST_LOG`, falling back to the default filters.
///
/// `verbose` switches the fallback to debug output for the pipeline crates. An explicit
/// `RUST_LOG` always wins.
pub fn init_logger(verbose: bool) -> Result<()> {
    let mut builder = Builder::new();
    match env::var("RUST_LOG") {
        Ok(log_config) => builder.parse(&log_config),
        Err(_) => builder.parse(if verbose {
            VERBOSE_LOG_CONFIG
        } else {
            DEFAULT_LOG_CONFIG
        }),
    };

    builder.try_init().chain_err(|| "Failed to build env_logger")?;
    Ok(())
}

pub fn output_error<E: ChainedError>(err: &E) {
    error!("{}", err);

    for e in err.iter().skip(1) {
        error!("caused by: {}", e);
    }

    if let Some(backtrace) = err.backtrace() {
        error!("backtrace: {:?}", backtrace);
    }
}

/// Renders an error and its causes on separate lines, for places where no logger is available.
pub fn describe_error<E: ChainedError>(err: &E) -> String {
    let mut description = err.to_string();
    for e in err.iter().skip(1) {
        description.push_str("\ncaused by: ");
        description.push_str(&e.to_string());
    }
    description
}
