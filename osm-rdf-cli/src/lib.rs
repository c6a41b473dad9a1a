//! Command-line interface for converting OSM extracts into statements.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod convert;
mod error;

pub use error::CliError;

use convert::ConvertArgs;

const ARG_INPUT: &str = "input";
const ARG_ADD_WAY_LOC: &str = "add-way-loc";
const ARG_CACHE_TYPE: &str = "cache-type";
const ARG_CACHE_FILE: &str = "cache-file";
const ENV_INPUT: &str = "OSM_RDF_CMDS_CONVERT_INPUT";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Convert(args) => convert::run_convert(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osm-rdf",
    about = "Map OpenStreetMap extracts to RDF statements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an OSM PBF file and report what was mapped.
    Convert(ConvertArgs),
}

#[cfg(test)]
mod tests;
