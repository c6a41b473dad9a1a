//! Streaming conversion of OSM PBF files into statements.

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use osm_rdf_core::{
    EntityHandler, IndexStrategy, Options, OsmEntity, RunSummary, SinkError, StatementSink,
};
use osmpbf::ElementReader;
use thiserror::Error;

use crate::fs::open_input;
use crate::location::{LocationIndexError, open_location_index};
use crate::wkb::WkbEncoder;

mod elements;

/// Entities processed between progress lines.
pub const STATS_INTERVAL: u64 = 1_000_000;

/// Errors returned when converting an OSM PBF file.
#[derive(Debug, Error)]
pub enum OsmConvertError {
    /// The input file could not be opened.
    #[error("failed to open OSM PBF file at {path}")]
    Open {
        /// Input file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input was not valid PBF data.
    #[error("failed to decode OSM PBF data from {path}")]
    Decode {
        /// Input file location.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: osmpbf::Error,
    },
    /// The node location index failed.
    #[error(transparent)]
    LocationIndex(#[from] LocationIndexError),
    /// The sink failed to flush its output.
    #[error(transparent)]
    Flush(#[from] SinkError),
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Final counters and high-water timestamp.
    pub summary: RunSummary,
    /// Location index descriptor in use, if way geometries were enabled.
    pub index: Option<String>,
}

/// Convert every entity in `path`, emitting statements into `sink`.
///
/// Entities are handled in file order on the calling thread. Node locations
/// are stored before the node itself is mapped, so ways that follow can
/// resolve their geometry.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use osm_rdf_core::{EntityKind, Options, Statement, StatementSink};
/// use osm_rdf_data::convert_osm_pbf;
///
/// struct Discard;
///
/// impl StatementSink for Discard {
///     fn emit(&mut self, _kind: EntityKind, _id: i64, _statements: &[Statement]) {}
/// }
///
/// # fn main() -> Result<(), osm_rdf_data::OsmConvertError> {
/// let report = convert_osm_pbf(Utf8Path::new("berlin.osm.pbf"), &Options::default(), Discard)?;
/// println!("{}", report.summary.stats);
/// # Ok(())
/// # }
/// ```
pub fn convert_osm_pbf<S: StatementSink>(
    path: &Utf8Path,
    options: &Options,
    sink: S,
) -> Result<ConvertReport, OsmConvertError> {
    let file = open_input(path).map_err(|source| OsmConvertError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let strategy = IndexStrategy::select(options);
    let index = match &strategy {
        Some(strategy) => {
            info!("Storing node locations in {strategy}");
            Some(open_location_index(strategy)?)
        }
        None => None,
    };

    let mut handler = EntityHandler::new(options, WkbEncoder::new(index), sink);
    let mut index_error: Option<LocationIndexError> = None;
    let mut seen: u64 = 0;

    ElementReader::new(file)
        .for_each(|element| {
            let entity = elements::to_entity(&element);
            if let OsmEntity::Node(node) = &entity
                && index_error.is_none()
                && let Err(err) = handler.geometry_mut().store_location(node)
            {
                index_error = Some(err);
            }
            handler.process(&entity);
            seen += 1;
            if seen.is_multiple_of(STATS_INTERVAL) {
                log_stats(&mut handler);
            }
        })
        .map_err(|source| OsmConvertError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(err) = index_error {
        return Err(err.into());
    }
    log_stats(&mut handler);
    let summary = handler.finish()?;
    Ok(ConvertReport {
        summary,
        index: strategy.map(|strategy| strategy.to_string()),
    })
}

fn log_stats<S: StatementSink>(handler: &mut EntityHandler<WkbEncoder, S>) {
    let line = handler.format_stats();
    if !line.is_empty() {
        info!("{line}");
    }
}
