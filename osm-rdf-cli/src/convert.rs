//! Convert command implementation.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osm_rdf_core::{CacheType, EntityKind, Options, Statement, StatementSink};
use osm_rdf_data::{ConvertReport, convert_osm_pbf, fs::is_regular_file};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{ARG_ADD_WAY_LOC, ARG_CACHE_FILE, ARG_CACHE_TYPE, ARG_INPUT, CliError, ENV_INPUT};

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Convert an OpenStreetMap PBF extract into typed statements \
                 and print the run's counters. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Convert an OSM PBF extract"
)]
#[ortho_config(prefix = "OSM_RDF")]
pub(crate) struct ConvertArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Attach line geometries to ways.
    #[arg(
        long = ARG_ADD_WAY_LOC,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) add_way_loc: Option<bool>,
    /// Node location cache layout: `sparse` or `dense`.
    #[arg(long = ARG_CACHE_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) cache_type: Option<String>,
    /// Back the node location cache with this file instead of memory.
    #[arg(long = ARG_CACHE_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_file: Option<Utf8PathBuf>,
}

impl ConvertArgs {
    pub(crate) fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Resolved `convert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) options: Options,
}

impl ConvertConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;
        let cache_type = args
            .cache_type
            .as_deref()
            .map(CacheType::from_name)
            .unwrap_or_default();
        Ok(Self {
            input,
            options: Options {
                add_way_loc: args.add_way_loc.unwrap_or(false),
                cache_type,
                cache_file: args.cache_file.filter(|path| !path.as_str().is_empty()),
            },
        })
    }
}

/// Sink that tallies what a serializer would have written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatementCounter {
    pub(crate) entities: u64,
    pub(crate) statements: u64,
    pub(crate) deletions: u64,
}

impl StatementSink for StatementCounter {
    fn emit(&mut self, _kind: EntityKind, _id: i64, statements: &[Statement]) {
        self.entities += 1;
        self.statements += u64::try_from(statements.len()).unwrap_or(u64::MAX);
    }

    fn delete(&mut self, _kind: EntityKind, _id: i64) {
        self.deletions += 1;
    }
}

pub(crate) fn run_convert(args: ConvertArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_convert_with(args, &mut stdout)
}

pub(crate) fn run_convert_with(args: ConvertArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_convert_config(args)?;
    let mut counter = StatementCounter::default();
    let report = convert_osm_pbf(&config.input, &config.options, &mut counter)?;
    write_report(writer, &report, &counter)
}

fn resolve_convert_config(args: ConvertArgs) -> Result<ConvertConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_report(
    writer: &mut dyn Write,
    report: &ConvertReport,
    counter: &StatementCounter,
) -> Result<(), CliError> {
    write_report_lines(writer, report, counter).map_err(CliError::WriteOutput)
}

fn write_report_lines(
    writer: &mut dyn Write,
    report: &ConvertReport,
    counter: &StatementCounter,
) -> std::io::Result<()> {
    writeln!(writer, "{}", report.summary.stats)?;
    writeln!(
        writer,
        "Statements: {} across {} entities; {} deletions",
        counter.statements, counter.entities, counter.deletions
    )?;
    writeln!(
        writer,
        "Last timestamp: {} ms",
        report.summary.last_timestamp.as_millis()
    )?;
    writeln!(
        writer,
        "Location index: {}",
        report.index.as_deref().unwrap_or("none")
    )
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ConvertConfig, CliError> {
    let merged = ConvertArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ConvertConfig::try_from(merged)
}
