//! Error types emitted by the `osm-rdf` CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osm_rdf_data::OsmConvertError;
use thiserror::Error;

/// Errors emitted by the `osm-rdf` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Converting the OSM data failed.
    #[error("failed to convert OSM data: {0}")]
    Convert(#[from] OsmConvertError),
    /// Writing the run report failed.
    #[error("failed to write conversion report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
