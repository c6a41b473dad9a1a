//! OSM PBF input and geometry backends for the statement mapper.
//!
//! Responsibilities:
//! - Decode PBF files into [`osm_rdf_core::OsmEntity`] values.
//! - Store node locations so ways can be encoded as lines.
//! - Encode geometries as well-known binary.
//!
//! Boundaries:
//! - Statement mapping rules live in `osm-rdf-core`.
//! - Rendering statements into an RDF syntax is the sink's concern.
//!
//! Invariants:
//! - Entities are processed sequentially in file order.
//! - Filesystem access goes through `cap-std` with UTF-8 paths.

mod convert;
pub mod fs;
pub mod location;
pub mod wkb;

pub use convert::{ConvertReport, OsmConvertError, STATS_INTERVAL, convert_osm_pbf};
pub use location::{LocationIndex, LocationIndexError, open_location_index};
pub use wkb::WkbEncoder;
