//! Filesystem access built on `cap-std` and `camino`.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open an input file for reading.
pub fn open_input(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create or truncate a read/write cache file, creating parent directories.
pub fn create_cache_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, file_name) = open_parent_dir(path, true)?;
    let mut options = fs_utf8::OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    dir.open_with(file_name, &options)
}

/// Whether `path` names an existing regular file.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, file_name) = match open_parent_dir(path, false) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(file_name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

fn open_parent_dir(path: &Utf8Path, create: bool) -> io::Result<(fs_utf8::Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    if create {
        fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())?;
    }
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}
