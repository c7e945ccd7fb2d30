//! Atomic replacement of a single file inside a capability directory.
//!
//! Contents go to a hidden sibling temp file which is synced and renamed over
//! the target, so readers see either the old or the new collection.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` in `dir` with `contents`.
///
/// `file_name` must be a single normal path component.
///
/// # Errors
///
/// Returns the underlying I/O error; the temp file is removed on failure.
pub(super) fn write_atomic(dir: &Dir, file_name: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let mut components = file_name.components();
    let (Some(Utf8Component::Normal(name)), None) = (components.next(), components.next()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{file_name}` is not a plain file name"),
        ));
    };

    let tmp_name = temp_name(name);
    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        discard(dir, &tmp_name);
        return Err(err);
    }
    if let Err(err) = replace(dir, &tmp_name, name) {
        discard(dir, &tmp_name);
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name(name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(".{name}.tmp.{}.{nanos}.{counter}", std::process::id())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

fn discard(dir: &Dir, tmp_name: &str) {
    match dir.remove_file(tmp_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => tracing::debug!(error = %err, tmp_name, "could not remove temp file"),
    }
}

fn sync_directory(dir: &Dir) {
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        tracing::debug!(error = %err, "directory sync skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        (tmp, dir)
    }

    #[test]
    fn replaces_existing_contents() {
        let (_tmp, dir) = temp_dir();
        let name = Utf8Path::new("store.json");

        write_atomic(&dir, name, b"[1]").expect("first write");
        write_atomic(&dir, name, b"[2]").expect("second write");

        assert_eq!(dir.read_to_string("store.json").expect("read"), "[2]");
        let leftovers = dir
            .entries()
            .expect("entries")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn rejects_nested_paths() {
        let (_tmp, dir) = temp_dir();
        let error = write_atomic(&dir, Utf8Path::new("a/b.json"), b"[]").expect_err("nested");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
