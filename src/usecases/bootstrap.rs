use std::{path::Path, sync::Arc};

use crate::{
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter, StorageConfig},
        contracts::{ConfigAdapter, ContactSource},
        directory::JsonDirectory,
        error::AppError,
        kv_store::FileKeyValueStore,
        storage_layout::StorageLayout,
        stubs::MemoryKeyValueStore,
    },
    usecases::{
        context::{AppContext, SharedStorage},
        list_store::ListStore,
        persisted::stash_key,
        starred_store::StarredStore,
    },
};

/// Where the stores keep their data for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Persistent,
    /// Process memory only.
    Ephemeral,
}

pub fn bootstrap(config_path: Option<&Path>, mode: StorageMode) -> Result<AppContext, AppError> {
    let config = FileConfigAdapter::new(config_path)
        .load()
        .map_err(AppError::Other)?;
    let layout = StorageLayout::resolve(config.storage.data_dir.as_deref())?;
    layout.ensure_dirs()?;

    let log_guard = infra::logging::init(&config.logging, &layout.logs_dir)?;
    let context = build_context(config, layout, mode)?;

    Ok(context.with_log_guard(log_guard))
}

pub(crate) fn build_context(
    config: AppConfig,
    layout: StorageLayout,
    mode: StorageMode,
) -> Result<AppContext, AppError> {
    check_distinct_keys(&config.storage)?;

    let storage: SharedStorage = match mode {
        StorageMode::Persistent => Arc::new(FileKeyValueStore::open(&layout.store_dir)?),
        StorageMode::Ephemeral => Arc::new(MemoryKeyValueStore::default()),
    };

    let lists = ListStore::open(Arc::clone(&storage), config.storage.lists_key.clone())?;
    let starred = StarredStore::open(storage, config.storage.starred_key.clone())?;
    let directory = JsonDirectory::load(&config.directory)?;

    tracing::debug!(
        store_dir = %layout.store_dir.display(),
        ?mode,
        lists = lists.len(),
        starred = starred.len(),
        contacts = directory.contacts().len(),
        "application context ready"
    );

    Ok(AppContext::new(config, layout, lists, starred, directory))
}

/// Both stores share one key-value store, so neither may read or stash into
/// the other's key.
fn check_distinct_keys(storage: &StorageConfig) -> Result<(), AppError> {
    let lists = storage.lists_key.as_str();
    let starred = storage.starred_key.as_str();

    if lists == starred || stash_key(lists) == starred || stash_key(starred) == lists {
        return Err(AppError::StorageKeyConflict {
            lists_key: lists.to_owned(),
            starred_key: starred.to_owned(),
        });
    }
    Ok(())
}
