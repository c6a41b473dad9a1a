//! Statement mapping for OpenStreetMap entities.
//!
//! Responsibilities:
//! - Turn nodes, ways and relations into typed `(kind, predicate, value)`
//!   statements for an RDF output pipeline.
//! - Classify every entity as added, skipped or deleted and keep the run's
//!   counters and high-water timestamp.
//! - Choose a location index backend for way geometries.
//!
//! Boundaries:
//! - Decoding OSM files, encoding geometries and rendering RDF syntax happen
//!   behind [`GeometryEncoder`] and [`StatementSink`].
//!
//! Invariants:
//! - Single-threaded and synchronous; entities arrive in source order.
//! - A failure while mapping one entity never aborts the run.

pub mod entity;
pub mod finalize;
pub mod geometry;
pub mod handler;
pub mod index;
pub mod members;
pub mod statement;
pub mod stats;
pub mod tags;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod vocab;

pub use entity::{
    EntityKind, EntityMeta, Location, Member, Node, OsmEntity, OsmObject, Relation, Tags,
    Timestamp, Way,
};
pub use finalize::{HighWaterMark, finalize_object};
pub use geometry::{GeometryEncoder, GeometryError, append_linestring, append_point};
pub use handler::{EntityHandler, RunSummary, SinkError, StatementSink};
pub use index::{CacheType, IndexStrategy, Options, UnknownIndexStrategy, index_descriptor};
pub use members::encode_members;
pub use statement::{Statement, StatementKind, StatementValue, loc_err};
pub use stats::{Counts, Outcome, Stats, StatsTracker};
pub use tags::filter_tags;
