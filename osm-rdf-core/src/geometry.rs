//! Geometry attachment.
//!
//! Encoding itself lives behind [`GeometryEncoder`]; this module only turns
//! its outcome into statements. An encoding failure degrades the entity to
//! carrying [`loc_err`] rather than aborting the run.

use log::debug;
use thiserror::Error;

use crate::vocab::LOC;
use crate::{Node, Statement, StatementKind, Way, loc_err};

/// Errors raised while encoding an entity's geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The node has no location, or a way node is missing from the index.
    #[error("node {node_id} has no known location")]
    MissingLocation {
        /// Node whose location could not be found.
        node_id: i64,
    },
    /// The location lies outside the WGS84 range.
    #[error("node {node_id} has an out-of-range location")]
    InvalidLocation {
        /// Node carrying the invalid location.
        node_id: i64,
    },
    /// A line needs at least two distinct points.
    #[error("way {way_id} has fewer than two distinct points")]
    TooFewPoints {
        /// Way that could not be turned into a line.
        way_id: i64,
    },
    /// The line has more points than the encoding can count.
    #[error("way {way_id} has too many points to encode")]
    TooManyPoints {
        /// Way that could not be encoded.
        way_id: i64,
    },
    /// The backing store failed while resolving locations.
    #[error("failed to resolve locations: {message}")]
    Lookup {
        /// Description of the store failure.
        message: String,
    },
}

/// Encodes entity geometries into a binary literal.
pub trait GeometryEncoder {
    /// Encode a node's location as a point.
    fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError>;

    /// Encode a way's node locations as a line.
    fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError>;
}

impl<G: GeometryEncoder + ?Sized> GeometryEncoder for &mut G {
    fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError> {
        (**self).encode_point(node)
    }

    fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError> {
        (**self).encode_linestring(way)
    }
}

/// Append a node's point geometry, or the error placeholder.
pub fn append_point<G: GeometryEncoder + ?Sized>(
    encoder: &mut G,
    node: &Node,
    statements: &mut Vec<Statement>,
) {
    let statement = match encoder.encode_point(node) {
        Ok(bytes) => Statement::new(StatementKind::Point, LOC, bytes),
        Err(err) => {
            debug!("Node {} geometry skipped: {err}", node.meta.id);
            loc_err()
        }
    };
    statements.push(statement);
}

/// Append a way's line geometry, or the error placeholder.
pub fn append_linestring<G: GeometryEncoder + ?Sized>(
    encoder: &mut G,
    way: &Way,
    statements: &mut Vec<Statement>,
) {
    let statement = match encoder.encode_linestring(way) {
        Ok(bytes) => Statement::new(StatementKind::Way, LOC, bytes),
        Err(err) => {
            debug!("Way {} geometry skipped: {err}", way.meta.id);
            loc_err()
        }
    };
    statements.push(statement);
}
