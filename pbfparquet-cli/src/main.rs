//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::error::Error;

use pbfparquet_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = pbfparquet_cli::run() {
        report(&err);
        std::process::exit(err.exit_code());
    }
}

fn report(err: &CliError) {
    if let CliError::ArgumentParsing(clap_err) = err {
        if let Err(print_err) = clap_err.print() {
            eprintln!("error: failed to print usage: {print_err}");
        }
        return;
    }
    if err.shows_usage() {
        eprintln!("{}", pbfparquet_cli::convert_usage());
    }
    eprintln!("error: {}: {err}", err.kind());
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = cause.source();
    }
}
