use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub storage: StorageConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// File name under the logs directory. Logs go to stderr when unset.
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Overrides the layout's default store directory.
    pub data_dir: Option<PathBuf>,
    pub lists_key: String,
    pub starred_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            lists_key: "lists".to_owned(),
            starred_key: "starred_messages".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub contacts_file: PathBuf,
    pub chats_file: PathBuf,
    pub messages_file: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            contacts_file: PathBuf::from("contacts.json"),
            chats_file: PathBuf::from("chats.json"),
            messages_file: PathBuf::from("messages.json"),
        }
    }
}
