//! Node location indexes for way geometries.
//!
//! Every backend maps a node id to its fixed-point [`Location`]. Backends
//! are selected through an [`IndexStrategy`], typically derived from the
//! mapper options with [`IndexStrategy::select`].
//!
//! Dense backends address slots by id and cannot hold negative ids; such
//! nodes are logged and skipped.

use camino::Utf8PathBuf;
use osm_rdf_core::{IndexStrategy, Location, UnknownIndexStrategy};
use thiserror::Error;

mod file;
mod memory;

pub use file::{DenseFileIndex, SparseFileIndex};
pub use memory::{DenseMemIndex, SparseMemIndex};

/// Marker stored in unused dense slots; outside the valid coordinate range.
const UNDEFINED: Location = Location::from_decimicro(i32::MAX, i32::MAX);

/// Errors raised by location index backends.
#[derive(Debug, Error)]
pub enum LocationIndexError {
    /// Creating, reading or writing the cache file failed.
    #[error("location cache I/O failed at {path}: {source}")]
    Io {
        /// Cache file location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The descriptor names no known backend.
    #[error(transparent)]
    UnknownBackend(#[from] UnknownIndexStrategy),
}

/// Storage for node locations, keyed by node id.
pub trait LocationIndex {
    /// Record the location of a node, replacing any earlier value.
    fn set(&mut self, id: i64, location: Location) -> Result<(), LocationIndexError>;

    /// Look up a node's location.
    fn get(&mut self, id: i64) -> Result<Option<Location>, LocationIndexError>;
}

/// Open the backend described by `strategy`.
///
/// File-backed strategies create or truncate their cache file.
pub fn open_location_index(
    strategy: &IndexStrategy,
) -> Result<Box<dyn LocationIndex>, LocationIndexError> {
    Ok(match strategy {
        IndexStrategy::SparseFile(path) => Box::new(SparseFileIndex::create(path)?),
        IndexStrategy::SparseMem => Box::new(SparseMemIndex::default()),
        IndexStrategy::DenseFile(path) => Box::new(DenseFileIndex::create(path)?),
        IndexStrategy::DenseMmap => Box::new(DenseMemIndex::default()),
    })
}

/// Open a backend from a descriptor such as `dense_file_array,/tmp/nodes`.
pub fn open_location_index_from_descriptor(
    descriptor: &str,
) -> Result<Box<dyn LocationIndex>, LocationIndexError> {
    let strategy: IndexStrategy = descriptor.parse()?;
    open_location_index(&strategy)
}

fn defined(location: Location) -> Option<Location> {
    (location != UNDEFINED).then_some(location)
}
