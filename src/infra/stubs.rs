use std::collections::HashMap;

use parking_lot::Mutex;

use crate::infra::{contracts::KeyValueStore, error::StorageError};

#[cfg(test)]
use crate::infra::{config::AppConfig, contracts::ConfigAdapter};

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

#[cfg(test)]
impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> anyhow::Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Process-local key-value store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[cfg(test)]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.lock().insert(key.to_owned(), value.to_owned());
        store
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Fails the next `failures` writes or deletes, then behaves like memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FlakyKeyValueStore {
    pub inner: MemoryKeyValueStore,
    failures: Mutex<usize>,
    pub write_attempts: Mutex<usize>,
}

#[cfg(test)]
impl FlakyKeyValueStore {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures: Mutex::new(failures),
            ..Self::default()
        }
    }

    pub fn fail_next(&self, failures: usize) {
        *self.failures.lock() = failures;
    }

    pub fn attempts(&self) -> usize {
        *self.write_attempts.lock()
    }

    fn maybe_fail(&self, key: &str) -> Result<(), StorageError> {
        *self.write_attempts.lock() += 1;
        let mut failures = self.failures.lock();
        if *failures == 0 {
            return Ok(());
        }

        *failures -= 1;
        Err(StorageError::Io {
            path: std::path::PathBuf::from(key),
            source: std::io::Error::other("injected write failure"),
        })
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.maybe_fail(key)?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.maybe_fail(key)?;
        self.inner.delete(key)
    }
}
