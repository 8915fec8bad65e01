//! Command-line interface for converting OSM PBF extracts to GeoParquet.
#![forbid(unsafe_code)]

use clap::{CommandFactory, Parser, Subcommand};
use std::{
    ffi::OsString,
    io::{self, Write},
};

mod convert;
mod error;
mod inspect;

pub use error::CliError;

use convert::ConvertArgs;
use inspect::InspectArgs;

const CONVERT_COMMAND: &str = "convert";
const ARG_PBF_FILE: &str = "pbf_file";
const ARG_PARQUET_FILE: &str = "parquet_file";
const ENV_PBF_FILE: &str = "PBFPARQUET_CMDS_CONVERT_PBF_FILE";
const ENV_PARQUET_FILE: &str = "PBFPARQUET_CMDS_INSPECT_PARQUET_FILE";

/// Directory that receives results when `output_dir` is omitted.
pub const DEFAULT_OUTPUT_DIR: &str = "files_all_relations";

/// Run the pbfparquet CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_with(std::env::args_os(), &mut stdout)
}

/// Run the CLI with explicit arguments, writing command output to `writer`.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run_with<I, T>(args: I, writer: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        Command::Convert(args) => convert::run_convert(args, writer),
        Command::Inspect(args) => inspect::run_inspect(args, writer),
    }
}

/// Usage line of the `convert` subcommand.
#[must_use]
pub fn convert_usage() -> String {
    let mut command = Cli::command();
    command.build();
    let usage = match command.find_subcommand_mut(CONVERT_COMMAND) {
        Some(subcommand) => subcommand.render_usage(),
        None => command.render_usage(),
    };
    usage.to_string()
}

#[derive(Debug, Parser)]
#[command(
    name = "pbfparquet",
    about = "Convert OpenStreetMap PBF extracts into GeoParquet files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a PBF file into a GeoParquet result.
    Convert(ConvertArgs),
    /// Summarise the features stored in a GeoParquet result.
    Inspect(InspectArgs),
}

#[cfg(test)]
mod tests;
