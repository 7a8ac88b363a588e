use parking_lot::Mutex;

use crate::{
    domain::message::Message,
    infra::contracts::KeyValueStore,
    usecases::persisted::{PersistedCollection, PersistedItem, StoreError},
};

impl PersistedItem for Message {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// Messages the user starred, keyed by message id, in starring order.
#[derive(Debug)]
pub struct StarredStore<S> {
    state: Mutex<PersistedCollection<Message, S>>,
}

impl<S: KeyValueStore> StarredStore<S> {
    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Self {
            state: Mutex::new(PersistedCollection::hydrate(storage, key)?),
        })
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().items().to_vec()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_starred(&self, message_id: &str) -> bool {
        self.state
            .lock()
            .items()
            .iter()
            .any(|message| message.id == message_id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns false without writing when the message is already starred.
    pub fn add(&self, message: Message) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        if state.items().iter().any(|starred| starred.id == message.id) {
            return Ok(false);
        }

        let message_id = message.id.clone();
        let mut next = state.items().to_vec();
        next.push(message);
        state.commit(next)?;

        tracing::debug!(message_id = %message_id, "message starred");
        Ok(true)
    }

    pub fn remove(&self, message_id: &str) -> Result<Message, StoreError> {
        let mut state = self.state.lock();
        let position = state
            .items()
            .iter()
            .position(|message| message.id == message_id)
            .ok_or_else(|| StoreError::not_found(message_id))?;

        let mut next = state.items().to_vec();
        let removed = next.remove(position);
        state.commit(next)?;

        tracing::debug!(message_id, "message unstarred");
        Ok(removed)
    }

    /// Empties the set and deletes the persisted key.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let cleared = state.items().len();
        state.clear()?;

        tracing::debug!(cleared, "starred messages cleared");
        Ok(())
    }
}
