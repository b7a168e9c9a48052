use clap::{App, Arg, ArgMatches};

pub fn parse_command_line<'a>() -> ArgMatches<'a> {
    App::new("tally")
        .version(crate_version!())
        .author("Tally Authors <tally@users.noreply.github.com>")
        .about("Count word frequencies with a local map, combine and reduce pipeline")
        .arg(
            Arg::with_name("input")
                .help("Input files, read in order. Reads stdin when none are given or for '-'")
                .multiple(true)
                .required(false),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .help("JSON pipeline configuration file. Flags override its values")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("partitions")
                .long("partitions")
                .short("p")
                .help("Number of partitions, which is also the number of worker threads")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout-ms")
                .short("t")
                .help("Time budget of each partition in milliseconds")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("partitioning")
                .long("partitioning")
                .help("How input lines are assigned to partitions")
                .takes_value(true)
                .possible_values(&["contiguous", "round-robin", "hash"])
                .required(false),
        )
        .arg(
            Arg::with_name("no-combiner")
                .long("no-combiner")
                .help("Ship every map output pair to the reducer without combining")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .short("f")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .help("Output file, stdout if not given")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("counters")
                .long("counters")
                .help("Print the job summary and counters as JSON to stderr")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Log pipeline progress at debug level")
                .takes_value(false)
                .required(false),
        )
        .get_matches()
}
