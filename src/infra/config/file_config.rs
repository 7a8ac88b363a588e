use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, DirectoryConfig, LogConfig, StorageConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub storage: Option<FileStorageConfig>,
    pub directory: Option<FileDirectoryConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(storage) = self.storage {
            storage.merge_into(&mut config.storage);
        }

        if let Some(directory) = self.directory {
            directory.merge_into(&mut config.directory);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileStorageConfig {
    pub data_dir: Option<PathBuf>,
    pub lists_key: Option<String>,
    pub starred_key: Option<String>,
}

impl FileStorageConfig {
    fn merge_into(self, config: &mut StorageConfig) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = Some(data_dir);
        }

        if let Some(lists_key) = self.lists_key {
            config.lists_key = lists_key;
        }

        if let Some(starred_key) = self.starred_key {
            config.starred_key = starred_key;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileDirectoryConfig {
    pub contacts_file: Option<PathBuf>,
    pub chats_file: Option<PathBuf>,
    pub messages_file: Option<PathBuf>,
}

impl FileDirectoryConfig {
    fn merge_into(self, config: &mut DirectoryConfig) {
        if let Some(contacts_file) = self.contacts_file {
            config.contacts_file = contacts_file;
        }

        if let Some(chats_file) = self.chats_file {
            config.chats_file = chats_file;
        }

        if let Some(messages_file) = self.messages_file {
            config.messages_file = messages_file;
        }
    }
}
