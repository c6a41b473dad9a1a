//! File-backed location indexes.
//!
//! Coordinates are stored as big-endian `i32` pairs so cache files are
//! portable between hosts.

use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::File;
use log::warn;
use osm_rdf_core::Location;

use super::{LocationIndex, LocationIndexError, UNDEFINED, defined};
use crate::fs::create_cache_file;

const LOCATION_BYTES: usize = 8;
const SPARSE_RECORD_BYTES: usize = 16;
/// Gap records written per batch when a dense file grows.
const FILL_BATCH: u64 = 4096;

/// Fixed 8-byte slots addressed by node id.
///
/// Slots between written ids hold an undefined marker, so a zeroed slot is
/// never mistaken for the `0,0` coordinate.
#[derive(Debug)]
pub struct DenseFileIndex {
    file: File,
    path: Utf8PathBuf,
    slots: u64,
}

impl DenseFileIndex {
    /// Create or truncate the cache file at `path`.
    pub fn create(path: &Utf8Path) -> Result<Self, LocationIndexError> {
        let file = create_cache_file(path).map_err(|source| io_error(path, source))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            slots: 0,
        })
    }

    fn fill_gap(&mut self, until: u64) -> Result<(), LocationIndexError> {
        let mut remaining = until.saturating_sub(self.slots);
        if remaining == 0 {
            return Ok(());
        }
        self.seek_slot(self.slots)?;
        let batch: Vec<u8> = (0..FILL_BATCH).flat_map(|_| encode(UNDEFINED)).collect();
        while remaining > 0 {
            let records = remaining.min(FILL_BATCH);
            let bytes = usize::try_from(records).unwrap_or(0) * LOCATION_BYTES;
            let chunk = batch.get(..bytes).unwrap_or(batch.as_slice());
            self.file
                .write_all(chunk)
                .map_err(|source| io_error(&self.path, source))?;
            remaining -= records;
        }
        self.slots = until;
        Ok(())
    }

    fn seek_slot(&mut self, slot: u64) -> Result<(), LocationIndexError> {
        let offset = slot.saturating_mul(LOCATION_BYTES as u64);
        self.file
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|source| io_error(&self.path, source))
    }
}

impl LocationIndex for DenseFileIndex {
    fn set(&mut self, id: i64, location: Location) -> Result<(), LocationIndexError> {
        let Ok(slot) = u64::try_from(id) else {
            warn!("Skipped location for node {id}: dense indexes cannot store this identifier");
            return Ok(());
        };
        self.fill_gap(slot)?;
        self.seek_slot(slot)?;
        self.file
            .write_all(&encode(location))
            .map_err(|source| io_error(&self.path, source))?;
        self.slots = self.slots.max(slot.saturating_add(1));
        Ok(())
    }

    fn get(&mut self, id: i64) -> Result<Option<Location>, LocationIndexError> {
        let Ok(slot) = u64::try_from(id) else {
            return Ok(None);
        };
        if slot >= self.slots {
            return Ok(None);
        }
        self.seek_slot(slot)?;
        let mut record = [0_u8; LOCATION_BYTES];
        self.file
            .read_exact(&mut record)
            .map_err(|source| io_error(&self.path, source))?;
        Ok(defined(decode(record)))
    }
}

/// Appended `(id, location)` records, sorted into memory on first lookup.
///
/// Writes stay sequential while nodes stream in; ways only start looking
/// locations up once every node has been stored.
#[derive(Debug)]
pub struct SparseFileIndex {
    writer: BufWriter<File>,
    path: Utf8PathBuf,
    loaded: Option<Vec<(i64, Location)>>,
}

impl SparseFileIndex {
    /// Create or truncate the cache file at `path`.
    pub fn create(path: &Utf8Path) -> Result<Self, LocationIndexError> {
        let file = create_cache_file(path).map_err(|source| io_error(path, source))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            loaded: None,
        })
    }

    fn load(&mut self) -> Result<Vec<(i64, Location)>, LocationIndexError> {
        self.writer
            .flush()
            .map_err(|source| io_error(&self.path, source))?;
        let file = self.writer.get_mut();
        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.read_to_end(&mut bytes))
            .map_err(|source| io_error(&self.path, source))?;

        let mut records: Vec<(i64, Location)> = bytes
            .chunks_exact(SPARSE_RECORD_BYTES)
            .filter_map(decode_sparse)
            .collect();
        // Newest write first so deduplication keeps the latest location.
        records.reverse();
        records.sort_by_key(|(id, _)| *id);
        records.dedup_by_key(|(id, _)| *id);
        Ok(records)
    }
}

impl LocationIndex for SparseFileIndex {
    fn set(&mut self, id: i64, location: Location) -> Result<(), LocationIndexError> {
        self.writer
            .write_all(&encode_sparse(id, location))
            .map_err(|source| io_error(&self.path, source))?;
        if let Some(records) = self.loaded.as_mut() {
            match records.binary_search_by_key(&id, |(known, _)| *known) {
                Ok(position) => {
                    if let Some(entry) = records.get_mut(position) {
                        entry.1 = location;
                    }
                }
                Err(position) => records.insert(position, (id, location)),
            }
        }
        Ok(())
    }

    fn get(&mut self, id: i64) -> Result<Option<Location>, LocationIndexError> {
        let records = match self.loaded.take() {
            Some(records) => records,
            None => self.load()?,
        };
        let found = records
            .binary_search_by_key(&id, |(known, _)| *known)
            .ok()
            .and_then(|position| records.get(position))
            .map(|(_, location)| *location);
        self.loaded = Some(records);
        Ok(found)
    }
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> LocationIndexError {
    LocationIndexError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[expect(
    clippy::big_endian_bytes,
    reason = "cache files use a fixed network byte order"
)]
fn encode(location: Location) -> [u8; LOCATION_BYTES] {
    let mut record = [0_u8; LOCATION_BYTES];
    let (lon, lat) = record.split_at_mut(4);
    lon.copy_from_slice(&location.decimicro_lon().to_be_bytes());
    lat.copy_from_slice(&location.decimicro_lat().to_be_bytes());
    record
}

#[expect(
    clippy::big_endian_bytes,
    reason = "cache files use a fixed network byte order"
)]
fn decode(record: [u8; LOCATION_BYTES]) -> Location {
    let [a, b, c, d, e, f, g, h] = record;
    Location::from_decimicro(
        i32::from_be_bytes([a, b, c, d]),
        i32::from_be_bytes([e, f, g, h]),
    )
}

#[expect(
    clippy::big_endian_bytes,
    reason = "cache files use a fixed network byte order"
)]
fn encode_sparse(id: i64, location: Location) -> [u8; SPARSE_RECORD_BYTES] {
    let mut record = [0_u8; SPARSE_RECORD_BYTES];
    let (id_bytes, location_bytes) = record.split_at_mut(8);
    id_bytes.copy_from_slice(&id.to_be_bytes());
    location_bytes.copy_from_slice(&encode(location));
    record
}

#[expect(
    clippy::big_endian_bytes,
    reason = "cache files use a fixed network byte order"
)]
fn decode_sparse(chunk: &[u8]) -> Option<(i64, Location)> {
    let (id_bytes, location_bytes) = chunk.split_at_checked(8)?;
    let id = i64::from_be_bytes(id_bytes.try_into().ok()?);
    let location = decode(location_bytes.try_into().ok()?);
    Some((id, location))
}
