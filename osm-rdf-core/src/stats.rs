//! Per-run accounting of processed entities.

use std::fmt;

use crate::EntityKind;

/// Terminal classification of a processed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The entity produced content statements.
    Added,
    /// The entity exists but carried nothing worth emitting.
    Skipped,
    /// The entity version marks a deletion.
    Deleted,
}

/// Added, skipped and deleted counts per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Nodes.
    pub nodes: u64,
    /// Ways.
    pub ways: u64,
    /// Relations.
    pub relations: u64,
}

impl Counts {
    const fn bump(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Node => self.nodes = self.nodes.saturating_add(1),
            EntityKind::Way => self.ways = self.ways.saturating_add(1),
            EntityKind::Relation => self.relations = self.relations.saturating_add(1),
        }
    }

    /// Count for a single kind.
    pub const fn of(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Node => self.nodes,
            EntityKind::Way => self.ways,
            EntityKind::Relation => self.relations,
        }
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n {}w {}r", self.nodes, self.ways, self.relations)
    }
}

/// The nine counters of a run.
///
/// # Examples
/// ```
/// use osm_rdf_core::{EntityKind, Outcome, Stats};
///
/// let mut stats = Stats::default();
/// stats.record(EntityKind::Way, Outcome::Added);
/// assert_eq!(
///     stats.to_string(),
///     "Added: 0n 1w 0r;  Skipped: 0n 0w 0r;  Deleted: 0n 0w 0r"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Entities that produced statements.
    pub added: Counts,
    /// Entities with nothing to emit.
    pub skipped: Counts,
    /// Deleted entities.
    pub deleted: Counts,
}

impl Stats {
    /// Count one entity of `kind` under `outcome`.
    pub const fn record(&mut self, kind: EntityKind, outcome: Outcome) {
        match outcome {
            Outcome::Added => self.added.bump(kind),
            Outcome::Skipped => self.skipped.bump(kind),
            Outcome::Deleted => self.deleted.bump(kind),
        }
    }

    /// Total number of entities seen.
    pub fn total(&self) -> u64 {
        [self.added, self.skipped, self.deleted]
            .iter()
            .map(|counts| counts.nodes + counts.ways + counts.relations)
            .sum()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added: {};  Skipped: {};  Deleted: {}",
            self.added, self.skipped, self.deleted
        )
    }
}

/// Counters plus change-suppressed rendering for progress logs.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    stats: Stats,
    last_rendered: String,
}

impl StatsTracker {
    /// Count one entity of `kind` under `outcome`.
    pub const fn record(&mut self, kind: EntityKind, outcome: Outcome) {
        self.stats.record(kind, outcome);
    }

    /// Snapshot of the counters.
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Render the summary line, or `""` if it matches the previous rendering.
    ///
    /// ```
    /// use osm_rdf_core::StatsTracker;
    ///
    /// let mut tracker = StatsTracker::default();
    /// assert!(!tracker.format().is_empty());
    /// assert!(tracker.format().is_empty());
    /// ```
    pub fn format(&mut self) -> String {
        let rendered = self.stats.to_string();
        if rendered == self.last_rendered {
            return String::new();
        }
        self.last_rendered.clone_from(&rendered);
        rendered
    }
}
