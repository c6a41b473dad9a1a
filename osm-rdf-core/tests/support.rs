//! Shared helpers for the statement mapping integration tests.

use osm_rdf_core::{EntityMeta, GeometryEncoder, GeometryError, Node, Tags, Timestamp, Way};

pub use osm_rdf_core::test_support::RecordingSink;

/// Payload returned for every successfully encoded geometry.
pub const GEOMETRY: [u8; 3] = [0x01, 0x02, 0x03];

/// Encoder that succeeds only for nodes with a valid location.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationCheckingGeometry;

impl GeometryEncoder for LocationCheckingGeometry {
    fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError> {
        match node.location {
            Some(location) if location.is_valid() => Ok(GEOMETRY.to_vec()),
            Some(_) => Err(GeometryError::InvalidLocation {
                node_id: node.meta.id,
            }),
            None => Err(GeometryError::MissingLocation {
                node_id: node.meta.id,
            }),
        }
    }

    fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError> {
        if way.node_refs.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                way_id: way.meta.id,
            });
        }
        Ok(GEOMETRY.to_vec())
    }
}

/// Build owned tags from string pairs.
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

/// Metadata for a live entity edited at `millis`.
pub fn meta(id: i64, millis: i64) -> EntityMeta {
    EntityMeta {
        id,
        version: 1,
        user: "mapper".to_owned(),
        timestamp: Timestamp::from_millis(millis),
        changeset: 42,
        deleted: false,
    }
}
