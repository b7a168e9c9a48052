#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate tally;
extern crate util;

mod errors {
    error_chain!{
        links {
            Tally(::tally::Error, ::tally::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}

mod parser;
mod runner;

fn main() {
    let matches = parser::parse_command_line();

    let logging_ready = match util::init_logger(matches.is_present("verbose")) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("{}", util::describe_error(&err));
            false
        }
    };

    if let Err(ref err) = runner::run(&matches) {
        if logging_ready {
            util::output_error(err);
        } else {
            eprintln!("{}", util::describe_error(err));
        }

        ::std::process::exit(1);
    }
}
