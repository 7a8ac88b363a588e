use std::collections::HashSet;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::infra::{contracts::KeyValueStore, error::StorageError};

const CORRUPT_SUFFIX: &str = "corrupt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no entry with id `{id}`")]
    NotFound { id: String },
    #[error("failed to persist collection: {0}")]
    Persistence(#[source] StorageError),
    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_owned() }
    }

    /// Short text for the user; the cause stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { id } => format!("Nothing found with id {id}."),
            Self::Persistence(_) | Self::Encode(_) => {
                "The change could not be saved. Please try again.".to_owned()
            }
        }
    }
}

/// An element of a collection persisted as one JSON array.
pub trait PersistedItem: Serialize + DeserializeOwned + Clone {
    fn item_id(&self) -> &str;

    /// Restores per-item invariants after loading. Returns true when changed.
    fn repair(&mut self) -> bool {
        false
    }
}

/// In-memory collection written through to a single storage key.
///
/// `commit` swaps in the new contents only after the write succeeded, so a
/// failed write leaves the previous state untouched.
#[derive(Debug)]
pub struct PersistedCollection<T, S> {
    storage: S,
    key: String,
    items: Vec<T>,
}

impl<T, S> PersistedCollection<T, S>
where
    T: PersistedItem,
    S: KeyValueStore,
{
    pub fn hydrate(storage: S, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();

        let items = match storage.get(&key).map_err(StoreError::Persistence)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => repair_items(&key, items),
                Err(error) => {
                    tracing::warn!(
                        key = %key,
                        error = %error,
                        "persisted collection is malformed, starting empty"
                    );
                    stash_corrupt(&storage, &key, &raw);
                    Vec::new()
                }
            },
        };

        tracing::debug!(key = %key, count = items.len(), "hydrated persisted collection");
        Ok(Self {
            storage,
            key,
            items,
        })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn commit(&mut self, next: Vec<T>) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&next).map_err(StoreError::Encode)?;
        retry_once(&self.key, "write", || self.storage.set(&self.key, &encoded))?;

        self.items = next;
        Ok(())
    }

    /// Empties the collection and deletes its key.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        retry_once(&self.key, "delete", || self.storage.delete(&self.key))?;

        self.items.clear();
        Ok(())
    }
}

fn retry_once(
    key: &str,
    action: &'static str,
    mut attempt: impl FnMut() -> Result<(), StorageError>,
) -> Result<(), StoreError> {
    match attempt() {
        Ok(()) => Ok(()),
        Err(first) => {
            tracing::warn!(key, action, error = %first, "persistence failed, retrying once");
            attempt().map_err(|error| {
                tracing::error!(key, action, error = %error, "persistence failed after retry");
                StoreError::Persistence(error)
            })
        }
    }
}

fn repair_items<T: PersistedItem>(key: &str, items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut dropped = 0usize;
    let mut repaired = 0usize;

    let items = items
        .into_iter()
        .filter_map(|mut item| {
            if !seen.insert(item.item_id().to_owned()) {
                dropped += 1;
                return None;
            }
            if item.repair() {
                repaired += 1;
            }
            Some(item)
        })
        .collect();

    if dropped > 0 || repaired > 0 {
        tracing::warn!(key, dropped, repaired, "repaired persisted collection on load");
    }

    items
}

/// Key that receives a copy of malformed data found under `key`.
pub fn stash_key(key: &str) -> String {
    format!("{key}.{CORRUPT_SUFFIX}")
}

fn stash_corrupt<S: KeyValueStore>(storage: &S, key: &str, raw: &str) {
    let stash = stash_key(key);
    if let Err(error) = storage.set(&stash, raw) {
        tracing::warn!(key = %stash, error = %error, "could not keep a copy of malformed data");
    }
}
