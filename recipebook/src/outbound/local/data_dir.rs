//! Capability-scoped data directory for the local emulator files.
//!
//! JSON files are replaced atomically: contents go to a hidden temporary file
//! in the same directory, which is then renamed over the target, so readers
//! never observe a partial write.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Directory holding the emulator's JSON files.
#[derive(Debug, Clone)]
pub struct LocalDataDir {
    dir: Arc<Dir>,
}

impl LocalDataDir {
    /// Open `path`, creating it (and parents) when missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// Read and decode `name`; `Ok(None)` when the file does not exist.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> io::Result<Option<T>> {
        let contents = match self.dir.read_to_string(name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("{name}: {err}")))
    }

    /// Encode `value` as pretty JSON and replace `name` atomically.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        write_atomic(&self.dir, Utf8Path::new(name), &contents)
    }
}

fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &str) -> io::Result<()> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{path}' must be a bare file name"),
        ));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    if let Err(err) = replace(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    // Best-effort directory sync.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));
    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::collections::BTreeMap;

    use rstest::rstest;

    #[rstest]
    fn missing_files_read_as_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let data = LocalDataDir::open(tmp.path()).expect("open");
        let value: Option<BTreeMap<String, bool>> = data.read_json("absent.json").expect("read");
        assert!(value.is_none());
    }

    #[rstest]
    fn writes_replace_previous_contents() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let data = LocalDataDir::open(&tmp.path().join("nested").join("dir")).expect("open");
        data.write_json("flags.json", &BTreeMap::from([("a", true)]))
            .expect("first write");
        data.write_json("flags.json", &BTreeMap::from([("b", false)]))
            .expect("second write");

        let value: BTreeMap<String, bool> =
            data.read_json("flags.json").expect("read").expect("present");
        assert_eq!(value, BTreeMap::from([("b".to_owned(), false)]));

        let leftovers = std::fs::read_dir(tmp.path().join("nested").join("dir"))
            .expect("list")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[rstest]
    fn rejects_nested_target_names() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let data = LocalDataDir::open(tmp.path()).expect("open");
        let err = data
            .write_json("sub/flags.json", &true)
            .expect_err("nested path");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn corrupt_files_surface_invalid_data() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("bad.json"), "{ not json").expect("seed");
        let data = LocalDataDir::open(tmp.path()).expect("open");
        let err = data
            .read_json::<BTreeMap<String, bool>>("bad.json")
            .expect_err("corrupt");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
