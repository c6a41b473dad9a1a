//! Builds small OSM PBF files for integration tests.
//!
//! Blobs are stored uncompressed. Only the fields the reader needs are
//! written; string table index 0 is the empty string.

use std::fs;

use camino::Utf8PathBuf;
use tempfile::TempDir;

const STRINGS: [&str; 9] = [
    "",
    "amenity",
    "cafe",
    "created_by",
    "JOSM",
    "highway",
    "residential",
    "outer",
    "alice",
];

/// String table index of `value`.
fn sid(value: &str) -> u64 {
    let position = STRINGS
        .iter()
        .position(|entry| *entry == value)
        .unwrap_or_else(|| panic!("{value} missing from string table"));
    u64::try_from(position).expect("small index")
}

fn varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push(u8::try_from(value & 0x7f).expect("masked") | 0x80);
        value >>= 7;
    }
    buf.push(u8::try_from(value).expect("final byte"));
}

fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn key(buf: &mut Vec<u8>, field: u64, wire_type: u64) {
    varint(buf, (field << 3) | wire_type);
}

fn uint_field(buf: &mut Vec<u8>, field: u64, value: u64) {
    key(buf, field, 0);
    varint(buf, value);
}

fn bytes_field(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    key(buf, field, 2);
    varint(buf, u64::try_from(bytes.len()).expect("length"));
    buf.extend_from_slice(bytes);
}

fn packed(values: impl IntoIterator<Item = u64>) -> Vec<u8> {
    let mut buf = Vec::new();
    for value in values {
        varint(&mut buf, value);
    }
    buf
}

fn delta_zigzag(values: &[i64]) -> Vec<u8> {
    let mut previous = 0;
    packed(values.iter().map(|value| {
        let delta = value - previous;
        previous = *value;
        zigzag(delta)
    }))
}

fn info(version: u64, seconds: u64, changeset: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    uint_field(&mut buf, 1, version);
    uint_field(&mut buf, 2, seconds);
    uint_field(&mut buf, 3, changeset);
    uint_field(&mut buf, 5, sid("alice"));
    buf
}

fn tag_fields(buf: &mut Vec<u8>, tags: &[(&str, &str)]) {
    if tags.is_empty() {
        return;
    }
    bytes_field(buf, 2, &packed(tags.iter().map(|(k, _)| sid(k))));
    bytes_field(buf, 3, &packed(tags.iter().map(|(_, v)| sid(v))));
}

fn node(id: i64, lon: i64, lat: i64, tags: &[(&str, &str)], seconds: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    uint_field(&mut buf, 1, zigzag(id));
    tag_fields(&mut buf, tags);
    bytes_field(&mut buf, 4, &info(1, seconds, 100));
    uint_field(&mut buf, 8, zigzag(lat));
    uint_field(&mut buf, 9, zigzag(lon));
    buf
}

fn way(id: u64, refs: &[i64], tags: &[(&str, &str)], seconds: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    uint_field(&mut buf, 1, id);
    tag_fields(&mut buf, tags);
    bytes_field(&mut buf, 4, &info(2, seconds, 101));
    bytes_field(&mut buf, 8, &delta_zigzag(refs));
    buf
}

fn relation(id: u64, way_member: i64, role: &str, seconds: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    uint_field(&mut buf, 1, id);
    bytes_field(&mut buf, 4, &info(3, seconds, 102));
    bytes_field(&mut buf, 8, &packed([sid(role)]));
    bytes_field(&mut buf, 9, &delta_zigzag(&[way_member]));
    bytes_field(&mut buf, 10, &packed([1]));
    buf
}

fn blob(kind: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    bytes_field(&mut body, 1, payload);
    uint_field(&mut body, 2, u64::try_from(payload.len()).expect("length"));

    let mut header = Vec::new();
    bytes_field(&mut header, 1, kind.as_bytes());
    uint_field(&mut header, 3, u64::try_from(body.len()).expect("length"));

    let mut out = Vec::new();
    out.extend_from_slice(&u32::try_from(header.len()).expect("length").to_be_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    out
}

/// PBF bytes for three nodes around Berlin, a residential way over them and
/// an untagged relation using the way as its outer member.
///
/// Node 1 carries `amenity=cafe` plus editor attribution; nodes 2 and 3 are
/// untagged. Timestamps increase from node 1 (1000 s) to the relation
/// (5000 s).
pub fn sample_pbf() -> Vec<u8> {
    let mut header_block = Vec::new();
    bytes_field(&mut header_block, 4, b"OsmSchema-V0.6");

    let mut string_table = Vec::new();
    for entry in STRINGS {
        bytes_field(&mut string_table, 1, entry.as_bytes());
    }

    let mut group = Vec::new();
    bytes_field(
        &mut group,
        1,
        &node(1, 134_000_000, 525_000_000, &[("amenity", "cafe"), ("created_by", "JOSM")], 1_000),
    );
    bytes_field(&mut group, 1, &node(2, 134_100_000, 525_100_000, &[], 2_000));
    bytes_field(&mut group, 1, &node(3, 134_200_000, 525_000_000, &[], 3_000));
    bytes_field(&mut group, 3, &way(10, &[1, 2, 3], &[("highway", "residential")], 4_000));
    bytes_field(&mut group, 4, &relation(20, 10, "outer", 5_000));

    let mut block = Vec::new();
    bytes_field(&mut block, 1, &string_table);
    bytes_field(&mut block, 2, &group);

    let mut file = blob("OSMHeader", &header_block);
    file.extend(blob("OSMData", &block));
    file
}

/// Write `bytes` to `name` inside `dir`.
pub fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("temp dir should be UTF-8");
    fs::write(path.as_std_path(), bytes).expect("write fixture");
    path
}
