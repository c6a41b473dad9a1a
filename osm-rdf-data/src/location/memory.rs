//! In-memory location indexes.

use std::collections::HashMap;

use log::warn;
use osm_rdf_core::Location;

use super::{LocationIndex, LocationIndexError, UNDEFINED, defined};

/// Hash map keyed by node id; suits extracts with scattered ids.
#[derive(Debug, Default)]
pub struct SparseMemIndex {
    locations: HashMap<i64, Location>,
}

impl LocationIndex for SparseMemIndex {
    fn set(&mut self, id: i64, location: Location) -> Result<(), LocationIndexError> {
        self.locations.insert(id, location);
        Ok(())
    }

    fn get(&mut self, id: i64) -> Result<Option<Location>, LocationIndexError> {
        Ok(self.locations.get(&id).copied())
    }
}

/// Vector addressed by node id; suits planet-scale inputs.
#[derive(Debug, Default)]
pub struct DenseMemIndex {
    slots: Vec<Location>,
}

impl LocationIndex for DenseMemIndex {
    fn set(&mut self, id: i64, location: Location) -> Result<(), LocationIndexError> {
        let Some(slot) = dense_slot(id) else {
            return Ok(());
        };
        if slot >= self.slots.len() {
            self.slots.resize(slot.saturating_add(1), UNDEFINED);
        }
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = location;
        }
        Ok(())
    }

    fn get(&mut self, id: i64) -> Result<Option<Location>, LocationIndexError> {
        Ok(usize::try_from(id)
            .ok()
            .and_then(|slot| self.slots.get(slot).copied())
            .and_then(defined))
    }
}

fn dense_slot(id: i64) -> Option<usize> {
    let slot = usize::try_from(id).ok();
    if slot.is_none() {
        warn!("Skipped location for node {id}: dense indexes cannot store this identifier");
    }
    slot
}
