//! Facade crate for the OSM to RDF statement mapper.
//!
//! Re-exports the mapping types from `osm-rdf-core` and, with the `pbf`
//! feature, the PBF conversion driver and geometry backends.

#![forbid(unsafe_code)]

pub use osm_rdf_core::{
    CacheType, EntityHandler, EntityKind, EntityMeta, GeometryEncoder, GeometryError, Location,
    Member, Node, Options, OsmEntity, Relation, RunSummary, SinkError, Statement, StatementKind,
    StatementSink, StatementValue, Stats, Timestamp, Way, vocab,
};

#[cfg(feature = "pbf")]
pub use osm_rdf_data::{
    ConvertReport, LocationIndex, LocationIndexError, OsmConvertError, WkbEncoder,
    convert_osm_pbf, open_location_index,
};
