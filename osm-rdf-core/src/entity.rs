//! Owned views over parsed OpenStreetMap objects.
//!
//! Readers convert whatever their decoder yields into these types before
//! handing them to [`crate::EntityHandler`]. Only the fields the statement
//! mapper reads are kept.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinates are stored as fixed-point integers with seven decimal places.
const COORDINATE_PRECISION: i32 = 10_000_000;
const MAX_LON: i32 = 180 * COORDINATE_PRECISION;
const MAX_LAT: i32 = 90 * COORDINATE_PRECISION;

/// Modification time of an entity, in milliseconds since the Unix epoch.
///
/// # Examples
/// ```
/// use osm_rdf_core::Timestamp;
///
/// let stamp = Timestamp::from_millis(1_700_000_000_000);
/// assert!(stamp > Timestamp::EPOCH);
/// assert_eq!(stamp.as_millis(), 1_700_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch, used as the initial high-water mark.
    pub const EPOCH: Self = Self(0);

    /// Wrap a millisecond count.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

/// A WGS84 position in 1e-7 degree fixed-point units.
///
/// # Examples
/// ```
/// use osm_rdf_core::Location;
///
/// let berlin = Location::from_decimicro(134_049_540, 525_200_080);
/// assert!(berlin.is_valid());
/// assert!(!Location::from_decimicro(i32::MAX, 0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    lon: i32,
    lat: i32,
}

impl Location {
    /// Build a location from decimicro-degree longitude and latitude.
    pub const fn from_decimicro(lon: i32, lat: i32) -> Self {
        Self { lon, lat }
    }

    /// Longitude in 1e-7 degrees.
    pub const fn decimicro_lon(self) -> i32 {
        self.lon
    }

    /// Latitude in 1e-7 degrees.
    pub const fn decimicro_lat(self) -> i32 {
        self.lat
    }

    /// Whether the location lies within the WGS84 coordinate range.
    pub const fn is_valid(self) -> bool {
        self.lon >= -MAX_LON && self.lon <= MAX_LON && self.lat >= -MAX_LAT && self.lat <= MAX_LAT
    }

    /// Convert to a floating-point coordinate with `x = longitude`, `y = latitude`.
    #[expect(
        clippy::float_arithmetic,
        reason = "fixed-point to degree conversion requires float division"
    )]
    pub fn to_coord(self) -> Coord<f64> {
        let scale = f64::from(COORDINATE_PRECISION);
        Coord {
            x: f64::from(self.lon) / scale,
            y: f64::from(self.lat) / scale,
        }
    }
}

/// The three OSM primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A point feature.
    Node,
    /// An ordered list of node references.
    Way,
    /// A grouping of members with roles.
    Relation,
}

impl EntityKind {
    /// One-letter code written as the `osmm:type` value.
    pub const fn type_code(self) -> &'static str {
        match self {
            Self::Node => "n",
            Self::Way => "w",
            Self::Relation => "r",
        }
    }

    /// Prefix used to build a qualified identifier such as `osmway:42`.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Node => "osmnode:",
            Self::Way => "osmway:",
            Self::Relation => "osmrel:",
        }
    }

    /// Qualified identifier for an entity of this kind.
    ///
    /// ```
    /// use osm_rdf_core::EntityKind;
    ///
    /// assert_eq!(EntityKind::Relation.qualified_id(7), "osmrel:7");
    /// ```
    pub fn qualified_id(self, id: i64) -> String {
        format!("{}{id}", self.id_prefix())
    }
}

/// Ordered key/value tags as they appear in the source.
pub type Tags = Vec<(String, String)>;

/// Version metadata shared by every entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityMeta {
    /// OSM identifier, unique per kind.
    pub id: i64,
    /// Object version.
    pub version: i32,
    /// Display name of the last editor.
    pub user: String,
    /// Time of the last edit.
    pub timestamp: Timestamp,
    /// Changeset that produced this version.
    pub changeset: i64,
    /// Whether this version marks a deletion.
    pub deleted: bool,
}

impl EntityMeta {
    /// Metadata with the given identifier and empty history fields.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Common accessors used by the tag filter and finaliser.
pub trait OsmObject {
    /// The kind of this object.
    const KIND: EntityKind;

    /// Version metadata.
    fn meta(&self) -> &EntityMeta;

    /// Tags in source order.
    fn tags(&self) -> &[(String, String)];
}

/// A node with an optional location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Version metadata.
    pub meta: EntityMeta,
    /// Tags in source order.
    pub tags: Tags,
    /// Position, absent for deleted nodes or lossy sources.
    pub location: Option<Location>,
}

/// A way referencing an ordered list of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Way {
    /// Version metadata.
    pub meta: EntityMeta,
    /// Tags in source order.
    pub tags: Tags,
    /// Node identifiers in traversal order.
    pub node_refs: Vec<i64>,
}

impl Way {
    /// A way is closed when it has nodes and starts where it ends.
    ///
    /// ```
    /// use osm_rdf_core::{EntityMeta, Way};
    ///
    /// let ring = Way {
    ///     meta: EntityMeta::with_id(1),
    ///     tags: Vec::new(),
    ///     node_refs: vec![1, 2, 3, 1],
    /// };
    /// assert!(ring.is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        match (self.node_refs.first(), self.node_refs.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

/// A single relation member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Kind of the referenced entity.
    pub kind: EntityKind,
    /// Identifier of the referenced entity.
    pub id: i64,
    /// Role within the relation; may be empty.
    pub role: String,
}

impl Member {
    /// Construct a member reference.
    pub fn new(kind: EntityKind, id: i64, role: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            role: role.into(),
        }
    }
}

/// A relation grouping other entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    /// Version metadata.
    pub meta: EntityMeta,
    /// Tags in source order.
    pub tags: Tags,
    /// Members in source order.
    pub members: Vec<Member>,
}

impl OsmObject for Node {
    const KIND: EntityKind = EntityKind::Node;

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn tags(&self) -> &[(String, String)] {
        &self.tags
    }
}

impl OsmObject for Way {
    const KIND: EntityKind = EntityKind::Way;

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn tags(&self) -> &[(String, String)] {
        &self.tags
    }
}

impl OsmObject for Relation {
    const KIND: EntityKind = EntityKind::Relation;

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn tags(&self) -> &[(String, String)] {
        &self.tags
    }
}

/// Any OSM entity, for producers that dispatch through a single entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsmEntity {
    /// A node.
    Node(Node),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
}
