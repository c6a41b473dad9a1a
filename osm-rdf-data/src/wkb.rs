//! Well-known binary geometry encoding.
//!
//! Points and lines are written as little-endian ISO WKB with `(lon, lat)`
//! coordinate order. Way geometries resolve their node references through a
//! [`LocationIndex`]; without one, every way degrades to the location error
//! statement.

use geo::{Coord, LineString, Point};
use osm_rdf_core::{GeometryEncoder, GeometryError, Location, Node, Way};

use crate::location::{LocationIndex, LocationIndexError};

const LITTLE_ENDIAN: u8 = 1;
const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const HEADER_BYTES: usize = 1 + 4;
const COORD_BYTES: usize = 16;

/// [`GeometryEncoder`] producing WKB, optionally backed by a location index.
pub struct WkbEncoder {
    index: Option<Box<dyn LocationIndex>>,
}

impl std::fmt::Debug for WkbEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WkbEncoder")
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

impl WkbEncoder {
    /// Create an encoder. Pass `None` when way geometries are disabled.
    pub fn new(index: Option<Box<dyn LocationIndex>>) -> Self {
        Self { index }
    }

    /// Record a node's location for later way lookups.
    ///
    /// Nodes without a location, or any node when no index is attached, are
    /// ignored.
    pub fn store_location(&mut self, node: &Node) -> Result<(), LocationIndexError> {
        match (self.index.as_mut(), node.location) {
            (Some(index), Some(location)) => index.set(node.meta.id, location),
            _ => Ok(()),
        }
    }

    fn resolve(&mut self, way: &Way) -> Result<LineString<f64>, GeometryError> {
        let Some(index) = self.index.as_mut() else {
            return Err(GeometryError::Lookup {
                message: "way locations are not being tracked".to_owned(),
            });
        };
        let mut coords: Vec<Coord<f64>> = Vec::with_capacity(way.node_refs.len());
        let mut previous: Option<Location> = None;
        for &node_id in &way.node_refs {
            let location = index
                .get(node_id)
                .map_err(|err| GeometryError::Lookup {
                    message: err.to_string(),
                })?
                .ok_or(GeometryError::MissingLocation { node_id })?;
            if !location.is_valid() {
                return Err(GeometryError::InvalidLocation { node_id });
            }
            if previous != Some(location) {
                coords.push(location.to_coord());
                previous = Some(location);
            }
        }
        if coords.len() < 2 {
            return Err(GeometryError::TooFewPoints { way_id: way.meta.id });
        }
        Ok(LineString::new(coords))
    }
}

impl GeometryEncoder for WkbEncoder {
    fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError> {
        let node_id = node.meta.id;
        let location = node
            .location
            .ok_or(GeometryError::MissingLocation { node_id })?;
        if !location.is_valid() {
            return Err(GeometryError::InvalidLocation { node_id });
        }
        Ok(point_wkb(Point::from(location.to_coord())))
    }

    fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError> {
        let line = self.resolve(way)?;
        linestring_wkb(&line).ok_or(GeometryError::TooManyPoints { way_id: way.meta.id })
    }
}

/// Encode a point as little-endian WKB.
pub fn point_wkb(point: Point<f64>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_BYTES + COORD_BYTES);
    write_header(&mut buf, WKB_POINT);
    write_coord(&mut buf, point.0);
    buf
}

/// Encode a line as little-endian WKB.
///
/// Returns `None` when the point count does not fit the 32-bit counter.
pub fn linestring_wkb(line: &LineString<f64>) -> Option<Vec<u8>> {
    let count = u32::try_from(line.0.len()).ok()?;
    let mut buf = Vec::with_capacity(HEADER_BYTES + 4 + line.0.len() * COORD_BYTES);
    write_header(&mut buf, WKB_LINESTRING);
    write_u32(&mut buf, count);
    for coord in line.coords() {
        write_coord(&mut buf, *coord);
    }
    Some(buf)
}

fn write_header(buf: &mut Vec<u8>, geometry_type: u32) {
    buf.push(LITTLE_ENDIAN);
    write_u32(buf, geometry_type);
}

#[expect(
    clippy::little_endian_bytes,
    reason = "WKB declares little-endian byte order in its header"
)]
fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[expect(
    clippy::little_endian_bytes,
    reason = "WKB declares little-endian byte order in its header"
)]
fn write_coord(buf: &mut Vec<u8>, coord: Coord<f64>) {
    buf.extend_from_slice(&coord.x.to_le_bytes());
    buf.extend_from_slice(&coord.y.to_le_bytes());
}
