use std::path::PathBuf;

use thiserror::Error;

use crate::usecases::persisted::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage path: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory at {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage keys `{lists_key}` and `{starred_key}` overlap; each collection needs its own key")]
    StorageKeyConflict {
        lists_key: String,
        starred_key: String,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read directory file at {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse directory file at {path}: {source}")]
    DirectoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown contact id `{id}`")]
    UnknownContact { id: String },
    #[error("unknown message id `{id}`")]
    UnknownMessage { id: String },
    #[error("invalid input: {details}")]
    InvalidInput { details: String },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of the persistent key-value layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid storage key `{key}`")]
    InvalidKey { key: String },
    #[error("storage at {path} is locked by another process")]
    Busy { path: PathBuf },
}
