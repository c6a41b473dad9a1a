//! Per-entity orchestration.
//!
//! [`EntityHandler`] receives nodes, ways and relations one at a time in
//! source order, builds each entity's statement batch, classifies it as
//! added, skipped or deleted, and hands non-empty batches to a
//! [`StatementSink`]. Deleted entities are reported to the sink by id only.
//!
//! Invariants:
//! - Every entity increments exactly one counter bucket.
//! - Provenance is only attached to non-empty, non-deleted batches.
//! - Geometry failures never abort processing.

use log::warn;
use thiserror::Error;

use crate::finalize::finalize_object;
use crate::geometry::{append_linestring, append_point};
use crate::members::encode_members;
use crate::vocab::IS_CLOSED;
use crate::{
    EntityKind, GeometryEncoder, HighWaterMark, Node, Options, OsmEntity, OsmObject, Outcome,
    Relation, Statement, StatementKind, Stats, StatsTracker, Timestamp, Way, filter_tags,
};

/// Error raised when a sink cannot persist its statements.
#[derive(Debug, Error)]
#[error("failed to flush statement sink: {message}")]
pub struct SinkError {
    /// Description of the failure.
    pub message: String,
    /// Underlying I/O error, if any.
    #[source]
    pub source: Option<std::io::Error>,
}

impl SinkError {
    /// Wrap an I/O failure.
    pub fn io(source: std::io::Error) -> Self {
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Consumer of finished statement batches.
pub trait StatementSink {
    /// Receive the statements of one entity, in emission order.
    fn emit(&mut self, kind: EntityKind, id: i64, statements: &[Statement]);

    /// Note that the entity is deleted in this version.
    fn delete(&mut self, _kind: EntityKind, _id: i64) {}

    /// Persist anything buffered.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    fn emit(&mut self, kind: EntityKind, id: i64, statements: &[Statement]) {
        (**self).emit(kind, id, statements);
    }

    fn delete(&mut self, kind: EntityKind, id: i64) {
        (**self).delete(kind, id);
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Counters at the end of the run.
    pub stats: Stats,
    /// Newest timestamp among entities that produced statements.
    pub last_timestamp: Timestamp,
}

/// Maps entities to statements and keeps the run's accounting.
///
/// Call [`EntityHandler::finish`] once the producer is exhausted. A handler
/// dropped without finishing still flushes its sink.
///
/// # Examples
/// ```
/// use osm_rdf_core::{
///     EntityHandler, EntityKind, EntityMeta, GeometryEncoder, GeometryError, Node, Options,
///     Statement, StatementSink, Way,
/// };
///
/// struct NoGeometry;
///
/// impl GeometryEncoder for NoGeometry {
///     fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError> {
///         Err(GeometryError::MissingLocation { node_id: node.meta.id })
///     }
///
///     fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError> {
///         Err(GeometryError::TooFewPoints { way_id: way.meta.id })
///     }
/// }
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl StatementSink for Count {
///     fn emit(&mut self, _kind: EntityKind, _id: i64, statements: &[Statement]) {
///         self.0 += statements.len();
///     }
/// }
///
/// let mut count = Count::default();
/// let mut handler = EntityHandler::new(&Options::default(), NoGeometry, &mut count);
/// handler.on_node(&Node {
///     meta: EntityMeta::with_id(1),
///     tags: vec![("amenity".into(), "cafe".into())],
///     location: None,
/// });
/// let summary = handler.finish()?;
/// assert_eq!(summary.stats.added.nodes, 1);
/// drop(handler);
/// // tag, location error placeholder and five provenance statements
/// assert_eq!(count.0, 7);
/// # Ok::<(), osm_rdf_core::SinkError>(())
/// ```
#[derive(Debug)]
pub struct EntityHandler<G: GeometryEncoder, S: StatementSink> {
    add_way_loc: bool,
    geometry: G,
    sink: S,
    stats: StatsTracker,
    high_water: HighWaterMark,
    flushed: bool,
}

impl<G: GeometryEncoder, S: StatementSink> EntityHandler<G, S> {
    /// Create a handler writing into `sink`.
    pub fn new(options: &Options, geometry: G, sink: S) -> Self {
        Self {
            add_way_loc: options.add_way_loc,
            geometry,
            sink,
            stats: StatsTracker::default(),
            high_water: HighWaterMark::default(),
            flushed: false,
        }
    }

    /// Dispatch on the entity kind.
    pub fn process(&mut self, entity: &OsmEntity) {
        match entity {
            OsmEntity::Node(node) => self.on_node(node),
            OsmEntity::Way(way) => self.on_way(way),
            OsmEntity::Relation(relation) => self.on_relation(relation),
        }
    }

    /// Map a node: tags, then its point geometry.
    pub fn on_node(&mut self, node: &Node) {
        let mut statements = filter_tags(node).unwrap_or_default();
        let outcome = if statements.is_empty() {
            Self::idle_outcome(node)
        } else {
            append_point(&mut self.geometry, node, &mut statements);
            Outcome::Added
        };
        self.complete(node, statements, outcome);
    }

    /// Map a way: tags, closedness, then its line geometry when enabled.
    ///
    /// A way without content tags is skipped regardless of closedness.
    pub fn on_way(&mut self, way: &Way) {
        let mut statements = filter_tags(way).unwrap_or_default();
        let outcome = if statements.is_empty() {
            Self::idle_outcome(way)
        } else {
            statements.push(Statement::new(
                StatementKind::Bool,
                IS_CLOSED,
                way.is_closed(),
            ));
            if self.add_way_loc {
                append_linestring(&mut self.geometry, way, &mut statements);
            }
            Outcome::Added
        };
        self.complete(way, statements, outcome);
    }

    /// Map a relation: tags, then two statements per member.
    ///
    /// Any relation with members counts as added, even without tags.
    pub fn on_relation(&mut self, relation: &Relation) {
        let mut statements = filter_tags(relation).unwrap_or_default();
        let outcome = if relation.members.is_empty() {
            Self::idle_outcome(relation)
        } else {
            encode_members(&relation.members, &mut statements);
            Outcome::Added
        };
        self.complete(relation, statements, outcome);
    }

    /// Counters so far.
    pub const fn stats(&self) -> Stats {
        self.stats.stats()
    }

    /// Summary line for progress logs; empty when nothing changed since the last call.
    pub fn format_stats(&mut self) -> String {
        self.stats.format()
    }

    /// Newest timestamp among entities that produced statements.
    pub const fn last_timestamp(&self) -> Timestamp {
        self.high_water.get()
    }

    /// The geometry encoder, e.g. to feed a location index between entities.
    pub const fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// The statement sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Flush the sink and report the run's final state.
    pub fn finish(&mut self) -> Result<RunSummary, SinkError> {
        self.flushed = true;
        self.sink.flush()?;
        Ok(RunSummary {
            stats: self.stats(),
            last_timestamp: self.last_timestamp(),
        })
    }

    fn idle_outcome<E: OsmObject>(entity: &E) -> Outcome {
        if entity.meta().deleted {
            Outcome::Deleted
        } else {
            Outcome::Skipped
        }
    }

    fn complete<E: OsmObject>(
        &mut self,
        entity: &E,
        mut statements: Vec<Statement>,
        outcome: Outcome,
    ) {
        self.stats.record(E::KIND, outcome);
        finalize_object(entity, &mut statements, &mut self.high_water);
        let id = entity.meta().id;
        if entity.meta().deleted {
            self.sink.delete(E::KIND, id);
        } else if !statements.is_empty() {
            self.sink.emit(E::KIND, id, &statements);
        }
    }
}

impl<G: GeometryEncoder, S: StatementSink> Drop for EntityHandler<G, S> {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        if let Err(err) = self.sink.flush() {
            warn!("Statement sink flush failed during shutdown: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingSink, StubGeometry};
    use crate::{EntityMeta, Location, Member, StatementValue, Tags, loc_err};
    use rstest::{fixture, rstest};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn meta(id: i64, millis: i64, deleted: bool) -> EntityMeta {
        EntityMeta {
            id,
            version: 2,
            user: "alice".into(),
            timestamp: Timestamp::from_millis(millis),
            changeset: 900,
            deleted,
        }
    }

    #[fixture]
    fn sink() -> RecordingSink {
        RecordingSink::default()
    }

    fn handler(
        add_way_loc: bool,
        geometry: StubGeometry,
        sink: &mut RecordingSink,
    ) -> EntityHandler<StubGeometry, &mut RecordingSink> {
        let options = Options {
            add_way_loc,
            ..Options::default()
        };
        EntityHandler::new(&options, geometry, sink)
    }

    fn predicates(statements: &[Statement]) -> Vec<&str> {
        statements.iter().map(|s| s.predicate.as_str()).collect()
    }

    #[rstest]
    fn tagged_node_gets_tags_point_and_provenance(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_node(&Node {
                meta: meta(1, 10, false),
                tags: tags(&[("highway", "residential")]),
                location: Some(Location::from_decimicro(10, 20)),
            });
            handler.stats()
        };

        assert_eq!(stats.added.nodes, 1);
        let (kind, id, statements) = sink.only_batch();
        assert_eq!((kind, id), (EntityKind::Node, 1));
        assert_eq!(
            predicates(statements),
            [
                "highway",
                "osmm:loc",
                "osmm:type",
                "osmm:version",
                "osmm:user",
                "osmm:timestamp",
                "osmm:changeset",
            ]
        );
        assert_eq!(
            statements.get(1).map(|s| s.kind),
            Some(StatementKind::Point)
        );
    }

    #[rstest]
    fn failed_point_still_counts_as_added(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::failing(), &mut sink);
            handler.on_node(&Node {
                meta: meta(2, 10, false),
                tags: tags(&[("amenity", "bench")]),
                location: None,
            });
            handler.stats()
        };
        assert_eq!(stats.added.nodes, 1);
        let (_, _, statements) = sink.only_batch();
        assert_eq!(statements.get(1), Some(&loc_err()));
    }

    #[rstest]
    #[case(false, Outcome::Skipped)]
    #[case(true, Outcome::Deleted)]
    fn untagged_nodes_emit_nothing(
        mut sink: RecordingSink,
        #[case] deleted: bool,
        #[case] expected: Outcome,
    ) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_node(&Node {
                meta: meta(3, 10, deleted),
                tags: Tags::new(),
                location: None,
            });
            handler.stats()
        };
        let mut reference = Stats::default();
        reference.record(EntityKind::Node, expected);
        assert_eq!(stats, reference);
        assert!(sink.batches.is_empty());
    }

    #[rstest]
    fn deleted_tagged_node_is_counted_as_deleted(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_node(&Node {
                meta: meta(4, 10, true),
                tags: tags(&[("shop", "bakery")]),
                location: None,
            });
            handler.stats()
        };
        assert_eq!(stats.deleted.nodes, 1);
        assert!(sink.batches.is_empty());
        assert_eq!(sink.deletions, [(EntityKind::Node, 4)]);
    }

    #[rstest]
    fn attribution_only_node_is_skipped(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_node(&Node {
                meta: meta(5, 10, false),
                tags: tags(&[("created_by", "JOSM")]),
                location: None,
            });
            handler.stats()
        };
        assert_eq!(stats.skipped.nodes, 1);
        assert!(sink.batches.is_empty());
    }

    #[rstest]
    #[case(false, vec!["highway", "osmm:isClosed"])]
    #[case(true, vec!["highway", "osmm:isClosed", "osmm:loc"])]
    fn tagged_way_gets_closedness_and_optional_line(
        mut sink: RecordingSink,
        #[case] add_way_loc: bool,
        #[case] expected_head: Vec<&str>,
    ) {
        {
            let mut handler = handler(add_way_loc, StubGeometry::default(), &mut sink);
            handler.on_way(&Way {
                meta: meta(6, 10, false),
                tags: tags(&[("highway", "service")]),
                node_refs: vec![1, 2, 3, 1],
            });
        }
        let (kind, _, statements) = sink.only_batch();
        assert_eq!(kind, EntityKind::Way);
        let head: Vec<&str> = predicates(statements)
            .into_iter()
            .take(expected_head.len())
            .collect();
        assert_eq!(head, expected_head);
        assert_eq!(
            statements.get(1).map(|s| &s.value),
            Some(&StatementValue::Bool(true))
        );
        assert_eq!(statements.len(), expected_head.len() + 5);
        if add_way_loc {
            assert_eq!(
                statements.get(2).map(|s| &s.value),
                Some(&StatementValue::Bytes(StubGeometry::LINE.to_vec()))
            );
        }
    }

    #[rstest]
    fn tagless_closed_way_is_skipped(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_way(&Way {
                meta: meta(7, 10, false),
                tags: Tags::new(),
                node_refs: vec![1, 2, 1],
            });
            handler.stats()
        };
        assert_eq!(stats.skipped.ways, 1);
        assert!(sink.batches.is_empty());
    }

    #[rstest]
    fn untagged_relation_with_members_is_added(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_relation(&Relation {
                meta: meta(8, 10, false),
                tags: Tags::new(),
                members: vec![
                    Member::new(EntityKind::Way, 456, "inner"),
                    Member::new(EntityKind::Node, 789, ""),
                ],
            });
            handler.stats()
        };
        assert_eq!(stats.added.relations, 1);
        let (_, _, statements) = sink.only_batch();
        assert_eq!(statements.len(), 9);
        assert_eq!(
            predicates(statements).get(..4),
            Some(&["osmm:has", "osmway:456", "osmm:has", "osmnode:789"][..])
        );
    }

    #[rstest]
    fn tagged_relation_without_members_is_skipped_but_emitted(mut sink: RecordingSink) {
        let stats = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_relation(&Relation {
                meta: meta(9, 10, false),
                tags: tags(&[("type", "multipolygon")]),
                members: Vec::new(),
            });
            handler.stats()
        };
        assert_eq!(stats.skipped.relations, 1);
        let (_, _, statements) = sink.only_batch();
        assert_eq!(statements.len(), 6);
    }

    #[rstest]
    fn deleted_relation_with_members_counts_as_added(mut sink: RecordingSink) {
        let (stats, last_timestamp) = {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.on_relation(&Relation {
                meta: meta(10, 10, true),
                tags: Tags::new(),
                members: vec![Member::new(EntityKind::Relation, 1, "subarea")],
            });
            (handler.stats(), handler.last_timestamp())
        };
        assert_eq!(stats.added.relations, 1);
        assert_eq!(last_timestamp, Timestamp::EPOCH);
        assert!(sink.batches.is_empty());
        assert_eq!(sink.deletions, [(EntityKind::Relation, 10)]);
    }

    #[rstest]
    #[case::tagged_way(OsmEntity::Way(Way {
        meta: meta(11, 10, true),
        tags: tags(&[("highway", "service")]),
        node_refs: vec![1, 2, 3, 1],
    }))]
    #[case::memberless_relation(OsmEntity::Relation(Relation {
        meta: meta(12, 10, true),
        tags: Tags::new(),
        members: Vec::new(),
    }))]
    fn deleted_entities_are_counted_and_reported(
        mut sink: RecordingSink,
        #[case] entity: OsmEntity,
    ) {
        let (kind, id) = match &entity {
            OsmEntity::Node(node) => (EntityKind::Node, node.meta.id),
            OsmEntity::Way(way) => (EntityKind::Way, way.meta.id),
            OsmEntity::Relation(relation) => (EntityKind::Relation, relation.meta.id),
        };
        let stats = {
            let mut handler = handler(true, StubGeometry::default(), &mut sink);
            handler.process(&entity);
            handler.stats()
        };
        assert_eq!(stats.deleted.of(kind), 1);
        assert_eq!(stats.total(), 1);
        assert!(sink.batches.is_empty(), "deleted entities emit no statements");
        assert_eq!(sink.deletions, [(kind, id)]);
    }

    #[rstest]
    fn high_water_mark_ignores_skipped_and_deleted(mut sink: RecordingSink) {
        let mut handler = handler(false, StubGeometry::default(), &mut sink);
        handler.on_node(&Node {
            meta: meta(1, 500, false),
            tags: tags(&[("name", "A")]),
            location: None,
        });
        handler.on_node(&Node {
            meta: meta(2, 900, false),
            tags: Tags::new(),
            location: None,
        });
        handler.on_node(&Node {
            meta: meta(3, 950, true),
            tags: tags(&[("name", "B")]),
            location: None,
        });
        handler.on_way(&Way {
            meta: meta(4, 700, false),
            tags: tags(&[("name", "C")]),
            node_refs: vec![1, 2],
        });
        assert_eq!(handler.last_timestamp(), Timestamp::from_millis(700));
    }

    #[rstest]
    fn finishing_flushes_once(mut sink: RecordingSink) {
        {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            let summary = handler.finish().expect("recording sink flushes");
            assert_eq!(summary.stats.total(), 0);
            assert_eq!(summary.last_timestamp, Timestamp::EPOCH);
        }
        assert_eq!(sink.flushes, 1);
    }

    #[rstest]
    fn dropping_without_finish_still_flushes(mut sink: RecordingSink) {
        {
            let mut handler = handler(false, StubGeometry::default(), &mut sink);
            handler.process(&OsmEntity::Node(Node {
                meta: meta(1, 1, false),
                tags: tags(&[("name", "A")]),
                location: None,
            }));
        }
        assert_eq!(sink.flushes, 1);
    }
}
