//! Infrastructure layer: adapters for config, storage, and directories.

pub mod config;
pub mod contracts;
pub mod directory;
pub mod error;
pub mod kv_store;
pub mod logging;
pub mod storage_layout;
pub mod stubs;
