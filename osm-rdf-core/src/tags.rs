//! Tag filtering.
//!
//! Turns an entity's tags into `Tag` statements, dropping editor
//! attribution. Deleted and untagged entities yield nothing.

use crate::vocab::PROVENANCE_TAG;
use crate::{OsmObject, Statement, StatementKind};

/// Convert the entity's tags into statements.
///
/// Returns `None` when the entity is deleted or carries no tags. A tag set
/// holding only editor attribution yields an empty list.
///
/// # Examples
/// ```
/// use osm_rdf_core::{EntityMeta, Node, filter_tags};
///
/// let node = Node {
///     meta: EntityMeta::with_id(1),
///     tags: vec![
///         ("highway".into(), "residential".into()),
///         ("created_by".into(), "JOSM".into()),
///     ],
///     location: None,
/// };
/// let statements = filter_tags(&node).unwrap_or_default();
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].predicate, "highway");
/// ```
pub fn filter_tags<E: OsmObject>(entity: &E) -> Option<Vec<Statement>> {
    let tags = entity.tags();
    if tags.is_empty() || entity.meta().deleted {
        return None;
    }

    Some(
        tags.iter()
            .filter(|(key, _)| key != PROVENANCE_TAG)
            .map(|(key, value)| Statement::new(StatementKind::Tag, key.as_str(), value.as_str()))
            .collect(),
    )
}
