//! Test-only sink and geometry encoder used by unit and behaviour tests.

use crate::{
    EntityKind, GeometryEncoder, GeometryError, Node, SinkError, Statement, StatementSink, Way,
};

/// One emitted batch: entity kind, entity id and its statements.
pub type Batch = (EntityKind, i64, Vec<Statement>);

/// Sink that keeps every batch and deletion in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    /// Emitted batches in order.
    pub batches: Vec<Batch>,
    /// Deleted entities in order.
    pub deletions: Vec<(EntityKind, i64)>,
    /// Number of flushes received.
    pub flushes: usize,
}

impl RecordingSink {
    /// The single emitted batch.
    ///
    /// # Panics
    /// Panics unless exactly one batch was emitted.
    pub fn only_batch(&self) -> (EntityKind, i64, &[Statement]) {
        match self.batches.as_slice() {
            [(kind, id, statements)] => (*kind, *id, statements.as_slice()),
            other => panic!("expected exactly one batch, found {}", other.len()),
        }
    }

    /// All statements across batches.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.batches.iter().flat_map(|(_, _, statements)| statements)
    }
}

impl StatementSink for RecordingSink {
    fn emit(&mut self, kind: EntityKind, id: i64, statements: &[Statement]) {
        self.batches.push((kind, id, statements.to_vec()));
    }

    fn delete(&mut self, kind: EntityKind, id: i64) {
        self.deletions.push((kind, id));
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Encoder returning fixed payloads, or failing for every entity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StubGeometry {
    fail: bool,
}

impl StubGeometry {
    /// Payload returned for every point.
    pub const POINT: [u8; 2] = [0xAA, 0x01];
    /// Payload returned for every line.
    pub const LINE: [u8; 2] = [0xBB, 0x02];

    /// An encoder that rejects every geometry.
    pub const fn failing() -> Self {
        Self { fail: true }
    }
}

impl GeometryEncoder for StubGeometry {
    fn encode_point(&mut self, node: &Node) -> Result<Vec<u8>, GeometryError> {
        if self.fail {
            return Err(GeometryError::MissingLocation {
                node_id: node.meta.id,
            });
        }
        Ok(Self::POINT.to_vec())
    }

    fn encode_linestring(&mut self, way: &Way) -> Result<Vec<u8>, GeometryError> {
        if self.fail {
            return Err(GeometryError::TooFewPoints {
                way_id: way.meta.id,
            });
        }
        Ok(Self::LINE.to_vec())
    }
}
