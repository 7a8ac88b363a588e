use std::sync::Arc;

use crate::{
    domain::{chat::Chat, message::Message, user::User},
    infra::{config::AppConfig, error::StorageError},
};

pub trait ConfigAdapter {
    fn load(&self) -> anyhow::Result<AppConfig>;
}

/// Durable string-keyed storage. Calls block until the change is on disk.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

impl<T> KeyValueStore for Arc<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

pub trait ContactSource {
    fn contacts(&self) -> &[User];

    fn contact(&self, id: &str) -> Option<&User> {
        self.contacts().iter().find(|user| user.id == id)
    }
}

pub trait ChatSource {
    fn chats(&self) -> &[Chat];
}

pub trait MessageSource {
    fn messages(&self) -> &[Message];

    fn message(&self, id: &str) -> Option<&Message> {
        self.messages().iter().find(|message| message.id == id)
    }
}
