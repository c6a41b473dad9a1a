//! Location index selection.
//!
//! Way geometries need the coordinates of every referenced node. The
//! backing store for that lookup is a memory/disk and dense/sparse
//! trade-off chosen by configuration, not computed adaptively.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the location index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CacheType {
    /// Store only the ids that were seen.
    Sparse,
    /// Address slots directly by node id; also used for unknown names.
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Dense,
}

impl CacheType {
    /// Interpret a configuration value; anything but `sparse` means dense.
    ///
    /// ```
    /// use osm_rdf_core::CacheType;
    ///
    /// assert_eq!(CacheType::from_name("sparse"), CacheType::Sparse);
    /// assert_eq!(CacheType::from_name("flat"), CacheType::Dense);
    /// ```
    pub fn from_name(name: &str) -> Self {
        if name == "sparse" {
            Self::Sparse
        } else {
            Self::Dense
        }
    }
}

/// Mapper configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Attach line geometries to ways; also enables the location index.
    #[cfg_attr(feature = "serde", serde(default))]
    pub add_way_loc: bool,
    /// Sparse or dense location index.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cache_type: CacheType,
    /// Back the location index with this file instead of memory.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cache_file: Option<Utf8PathBuf>,
}

/// Concrete location index backend.
///
/// Renders to, and parses from, the descriptor strings understood by the
/// index factory (`sparse_file_array,<path>`, `sparse_mem_array`,
/// `dense_file_array,<path>`, `dense_mmap_array`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStrategy {
    /// Sorted id/location records in a file.
    SparseFile(Utf8PathBuf),
    /// Hash map in memory.
    SparseMem,
    /// Fixed-size slots in a file, addressed by id.
    DenseFile(Utf8PathBuf),
    /// Fixed-size slots in memory, addressed by id.
    DenseMmap,
}

const SPARSE_FILE: &str = "sparse_file_array";
const SPARSE_MEM: &str = "sparse_mem_array";
const DENSE_FILE: &str = "dense_file_array";
const DENSE_MMAP: &str = "dense_mmap_array";

impl IndexStrategy {
    /// Pick a backend from the options, or `None` when ways carry no geometry.
    ///
    /// # Examples
    /// ```
    /// use osm_rdf_core::{CacheType, IndexStrategy, Options};
    ///
    /// let options = Options {
    ///     add_way_loc: true,
    ///     cache_type: CacheType::Sparse,
    ///     cache_file: Some("nodes.cache".into()),
    /// };
    /// let strategy = IndexStrategy::select(&options);
    /// assert_eq!(
    ///     strategy.map(|s| s.to_string()).as_deref(),
    ///     Some("sparse_file_array,nodes.cache")
    /// );
    /// ```
    pub fn select(options: &Options) -> Option<Self> {
        if !options.add_way_loc {
            return None;
        }
        let file = options
            .cache_file
            .as_ref()
            .filter(|path| !path.as_str().is_empty())
            .cloned();
        Some(match (options.cache_type, file) {
            (CacheType::Sparse, Some(path)) => Self::SparseFile(path),
            (CacheType::Sparse, None) => Self::SparseMem,
            (CacheType::Dense, Some(path)) => Self::DenseFile(path),
            (CacheType::Dense, None) => Self::DenseMmap,
        })
    }
}

/// Descriptor string for the options, or `None` when no index is needed.
pub fn index_descriptor(options: &Options) -> Option<String> {
    IndexStrategy::select(options).map(|strategy| strategy.to_string())
}

impl fmt::Display for IndexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SparseFile(path) => write!(f, "{SPARSE_FILE},{path}"),
            Self::SparseMem => f.write_str(SPARSE_MEM),
            Self::DenseFile(path) => write!(f, "{DENSE_FILE},{path}"),
            Self::DenseMmap => f.write_str(DENSE_MMAP),
        }
    }
}

/// Error returned when a descriptor names no known backend.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown location index descriptor {descriptor:?}")]
pub struct UnknownIndexStrategy {
    /// The rejected descriptor.
    pub descriptor: String,
}

impl FromStr for IndexStrategy {
    type Err = UnknownIndexStrategy;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let (name, path) = match descriptor.split_once(',') {
            Some((name, path)) => (name, Some(Utf8PathBuf::from(path))),
            None => (descriptor, None),
        };
        match (name, path) {
            (SPARSE_FILE, Some(path)) => Ok(Self::SparseFile(path)),
            (SPARSE_MEM, None) => Ok(Self::SparseMem),
            (DENSE_FILE, Some(path)) => Ok(Self::DenseFile(path)),
            (DENSE_MMAP, None) => Ok(Self::DenseMmap),
            _ => Err(UnknownIndexStrategy {
                descriptor: descriptor.to_owned(),
            }),
        }
    }
}
