//! Provenance statements and the high-water timestamp.

use crate::vocab::{CHANGESET, TIMESTAMP, TYPE, USER, VERSION};
use crate::{OsmObject, Statement, StatementKind, Timestamp};

/// Latest timestamp among entities that contributed statements.
///
/// Never decreases.
///
/// # Examples
/// ```
/// use osm_rdf_core::{HighWaterMark, Timestamp};
///
/// let mut mark = HighWaterMark::default();
/// mark.observe(Timestamp::from_millis(20));
/// mark.observe(Timestamp::from_millis(10));
/// assert_eq!(mark.get(), Timestamp::from_millis(20));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighWaterMark(Timestamp);

impl HighWaterMark {
    /// Raise the mark if `timestamp` is newer.
    pub fn observe(&mut self, timestamp: Timestamp) {
        if timestamp > self.0 {
            self.0 = timestamp;
        }
    }

    /// Current mark; the Unix epoch until an entity has been finalised.
    pub const fn get(self) -> Timestamp {
        self.0
    }
}

/// Append the provenance block to a non-empty, non-deleted batch.
///
/// The block is always `type`, `version`, `user`, `timestamp`,
/// `changeset`, in that order. Empty or deleted batches are left untouched
/// and do not move the high-water mark.
pub fn finalize_object<E: OsmObject>(
    entity: &E,
    statements: &mut Vec<Statement>,
    high_water: &mut HighWaterMark,
) {
    let meta = entity.meta();
    if statements.is_empty() || meta.deleted {
        return;
    }

    high_water.observe(meta.timestamp);

    statements.extend([
        Statement::new(StatementKind::Str, TYPE, E::KIND.type_code()),
        Statement::new(StatementKind::Int, VERSION, meta.version),
        Statement::new(StatementKind::Str, USER, meta.user.as_str()),
        Statement::new(StatementKind::Date, TIMESTAMP, meta.timestamp),
        Statement::new(StatementKind::Int, CHANGESET, meta.changeset),
    ]);
}
