use std::{fs, io::ErrorKind, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    domain::{chat::Chat, message::Message, user::User},
    infra::{
        config::DirectoryConfig,
        contracts::{ChatSource, ContactSource, MessageSource},
        error::AppError,
    },
};

/// Contacts, chats and messages read from JSON array files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDirectory {
    contacts: Vec<User>,
    chats: Vec<Chat>,
    messages: Vec<Message>,
}

impl JsonDirectory {
    pub fn load(config: &DirectoryConfig) -> Result<Self, AppError> {
        Ok(Self {
            contacts: read_array(&config.contacts_file)?,
            chats: read_array(&config.chats_file)?,
            messages: read_array(&config.messages_file)?,
        })
    }
}

impl ContactSource for JsonDirectory {
    fn contacts(&self) -> &[User] {
        &self.contacts
    }
}

impl ChatSource for JsonDirectory {
    fn chats(&self) -> &[Chat] {
        &self.chats
    }
}

impl MessageSource for JsonDirectory {
    fn messages(&self) -> &[Message] {
        &self.messages
    }
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "directory file missing, using empty set");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(AppError::DirectoryRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|source| AppError::DirectoryParse {
        path: path.to_path_buf(),
        source,
    })
}
