//! File-backed store adapter.
//!
//! Each key maps to `<key>.json` inside a capability-scoped directory. Writes
//! go to a hidden temporary file first and are renamed over the target, so a
//! crash mid-write leaves the previous value intact.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::ports::{KeyValueStore, KeyValueStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// [`KeyValueStore`] persisting each key as a JSON file in one directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the store directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Path) -> Result<Self, KeyValueStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|err| {
            KeyValueStoreError::io(format!("create {}: {err}", path.display()))
        })?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| KeyValueStoreError::io(format!("open {}: {err}", path.display())))?;
        Ok(Self::from_dir(dir))
    }

    /// Wrap an already opened directory.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyValueStoreError> {
        let file_name = slot_file_name(key)?;
        match self.dir.read(&file_name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::io(format!("read {file_name}: {err}"))),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError> {
        let file_name = slot_file_name(key)?;
        write_atomic(&self.dir, &file_name, value)
    }
}

fn slot_file_name(key: &str) -> Result<String, KeyValueStoreError> {
    let mut components = Utf8Path::new(key).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) if name == key && !name.starts_with('.') => {
            Ok(format!("{name}.json"))
        }
        _ => Err(KeyValueStoreError::invalid_key(key)),
    }
}

fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> Result<(), KeyValueStoreError> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    if let Err(err) = write_temp_file(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(KeyValueStoreError::io(format!("write {tmp_name}: {err}")));
    }
    if let Err(err) = dir.rename(&tmp_name, dir, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(KeyValueStoreError::io(format!("rename to {file_name}: {err}")));
    }
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        debug!(error = %err, "directory sync after coin store write failed");
    }
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}
