use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    infra::{
        config::AppConfig, contracts::KeyValueStore, directory::JsonDirectory,
        storage_layout::StorageLayout,
    },
    usecases::{list_store::ListStore, starred_store::StarredStore},
};

/// Key-value backend shared by both stores.
pub type SharedStorage = Arc<dyn KeyValueStore + Send + Sync>;

pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub lists: ListStore<SharedStorage>,
    pub starred: StarredStore<SharedStorage>,
    pub directory: JsonDirectory,
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        lists: ListStore<SharedStorage>,
        starred: StarredStore<SharedStorage>,
        directory: JsonDirectory,
    ) -> Self {
        Self {
            config,
            layout,
            lists,
            starred,
            directory,
            log_guard: None,
        }
    }

    pub fn with_log_guard(mut self, guard: Option<WorkerGuard>) -> Self {
        self.log_guard = guard;
        self
    }

    pub fn has_file_logging(&self) -> bool {
        self.log_guard.is_some()
    }
}
