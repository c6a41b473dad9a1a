//! Vocabulary terms and namespace prefixes shared with serializers.

/// Predicate for the one-letter entity type code.
pub const TYPE: &str = "osmm:type";
/// Predicate for the object version.
pub const VERSION: &str = "osmm:version";
/// Predicate for the last editor.
pub const USER: &str = "osmm:user";
/// Predicate for the last edit time.
pub const TIMESTAMP: &str = "osmm:timestamp";
/// Predicate for the changeset id.
pub const CHANGESET: &str = "osmm:changeset";
/// Predicate for point and line geometries.
pub const LOC: &str = "osmm:loc";
/// Predicate recorded when a geometry cannot be encoded.
pub const LOC_ERROR: &str = "osmm:loc:error";
/// Message stored with [`LOC_ERROR`].
pub const LOC_ERROR_MESSAGE: &str = "Unable to parse location data";
/// Predicate for way closedness.
pub const IS_CLOSED: &str = "osmm:isClosed";
/// Predicate linking a relation to each member.
pub const HAS: &str = "osmm:has";

/// Tag key carrying editor attribution; never emitted.
pub const PROVENANCE_TAG: &str = "created_by";

/// Namespace prefixes as `(prefix, iri)` pairs.
pub const PREFIXES: &[(&str, &str)] = &[
    ("wd", "http://www.wikidata.org/entity/"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("geo", "http://www.opengis.net/ont/geosparql#"),
    ("schema", "http://schema.org/"),
    ("osmroot", "https://www.openstreetmap.org"),
    ("osmnode", "https://www.openstreetmap.org/node/"),
    ("osmway", "https://www.openstreetmap.org/way/"),
    ("osmrel", "https://www.openstreetmap.org/relation/"),
    ("osmt", "https://wiki.openstreetmap.org/wiki/Key:"),
    ("osmm", "https://www.openstreetmap.org/meta/"),
];
