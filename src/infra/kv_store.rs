use std::{
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::PathBuf,
};

use fs2::FileExt;

use crate::infra::{contracts::KeyValueStore, error::StorageError};

const LOCK_FILE_NAME: &str = "store.lock";
const VALUE_EXTENSION: &str = "json";

/// One file per key under a data directory.
///
/// Holds an exclusive advisory lock on the directory for its lifetime.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    _lock: File,
}

impl FileKeyValueStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;

        let lock_path = dir.join(LOCK_FILE_NAME);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StorageError::Io {
                path: lock_path.clone(),
                source,
            })?;

        lock.try_lock_exclusive().map_err(|source| {
            if source.kind() == fs2::lock_contended_error().kind() {
                StorageError::Busy { path: dir.clone() }
            } else {
                StorageError::Io {
                    path: lock_path.clone(),
                    source,
                }
            }
        })?;

        tracing::debug!(dir = %dir.display(), "opened file key-value store");
        Ok(Self { dir, _lock: lock })
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey {
                key: key.to_owned(),
            });
        }

        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        let tmp_path = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));

        fs::write(&tmp_path, value).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}
