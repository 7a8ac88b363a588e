use std::collections::HashSet;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    domain::{
        list_entry::{dedup_members, ListEntry, ListPatch, ListType, NewList},
        user::User,
    },
    infra::contracts::KeyValueStore,
    usecases::persisted::{PersistedCollection, PersistedItem, StoreError},
};

impl PersistedItem for ListEntry {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn repair(&mut self) -> bool {
        let before = self.members.len();
        self.members = dedup_members(std::mem::take(&mut self.members));
        before != self.members.len()
    }
}

/// Owns the user's lists. Every mutation is written through before it returns.
///
/// Callers only ever receive clones; the collection itself is reachable only
/// through the methods below.
#[derive(Debug)]
pub struct ListStore<S> {
    state: Mutex<PersistedCollection<ListEntry, S>>,
}

impl<S: KeyValueStore> ListStore<S> {
    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Self {
            state: Mutex::new(PersistedCollection::hydrate(storage, key)?),
        })
    }

    pub fn lists(&self) -> Vec<ListEntry> {
        self.state.lock().items().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<ListEntry> {
        self.state
            .lock()
            .items()
            .iter()
            .find(|list| list.id == id)
            .cloned()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn lists_of_type(&self, list_type: ListType) -> Vec<ListEntry> {
        self.state
            .lock()
            .items()
            .iter()
            .filter(|list| list.list_type == list_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a new list. Name and members are taken as given.
    pub fn create_list(&self, new: NewList) -> Result<ListEntry, StoreError> {
        let mut state = self.state.lock();
        let id = generate_list_id(state.items());
        let entry = ListEntry::create(id, new, Utc::now());

        let mut next = state.items().to_vec();
        next.push(entry.clone());
        state.commit(next)?;

        tracing::debug!(
            list_id = %entry.id,
            members = entry.members.len(),
            list_type = %entry.list_type,
            "list created"
        );
        Ok(entry)
    }

    pub fn update_list(&self, id: &str, patch: ListPatch) -> Result<ListEntry, StoreError> {
        let ((), updated) = self.mutate_list(id, |list, now| list.apply_patch(patch, now))?;

        tracing::debug!(list_id = id, "list updated");
        Ok(updated)
    }

    /// Removes the list and returns it.
    pub fn delete_list(&self, id: &str) -> Result<ListEntry, StoreError> {
        let mut state = self.state.lock();
        let position = state
            .items()
            .iter()
            .position(|list| list.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let mut next = state.items().to_vec();
        let removed = next.remove(position);
        state.commit(next)?;

        tracing::debug!(list_id = id, "list deleted");
        Ok(removed)
    }

    /// Returns how many members were new.
    pub fn add_members(&self, list_id: &str, members: Vec<User>) -> Result<usize, StoreError> {
        let requested = members.len();
        let (added, _) = self.mutate_list(list_id, |list, now| list.add_members(members, now))?;

        tracing::debug!(list_id, requested, added, "members added to list");
        Ok(added)
    }

    /// Returns how many members were removed.
    pub fn remove_members(&self, list_id: &str, member_ids: &[String]) -> Result<usize, StoreError> {
        let (removed, _) =
            self.mutate_list(list_id, |list, now| list.remove_members(member_ids, now))?;

        tracing::debug!(list_id, removed, "members removed from list");
        Ok(removed)
    }

    /// Moves the named lists to the front, in the given order.
    ///
    /// Unknown and repeated ids are ignored. Lists not named keep their
    /// relative order after the named ones; a partial or stale id list
    /// never drops a list.
    pub fn reorder_lists(&self, ordered_ids: &[String]) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let next = reorder_preserving(state.items(), ordered_ids);
        state.commit(next)?;

        tracing::debug!(requested = ordered_ids.len(), "lists reordered");
        Ok(())
    }

    /// Empties the collection and deletes the persisted key.
    pub fn clear_lists(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let cleared = state.items().len();
        state.clear()?;

        tracing::debug!(cleared, "lists cleared");
        Ok(())
    }

    fn mutate_list<R>(
        &self,
        list_id: &str,
        op: impl FnOnce(&mut ListEntry, DateTime<Utc>) -> R,
    ) -> Result<(R, ListEntry), StoreError> {
        let mut state = self.state.lock();
        let mut next = state.items().to_vec();
        let list = next
            .iter_mut()
            .find(|list| list.id == list_id)
            .ok_or_else(|| StoreError::not_found(list_id))?;

        let outcome = op(list, Utc::now());
        let updated = list.clone();
        state.commit(next)?;

        Ok((outcome, updated))
    }
}

fn generate_list_id(existing: &[ListEntry]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if existing.iter().all(|list| list.id != id) {
            return id;
        }
    }
}

fn reorder_preserving(current: &[ListEntry], ordered_ids: &[String]) -> Vec<ListEntry> {
    let mut placed: HashSet<&str> = HashSet::new();
    let mut next = Vec::with_capacity(current.len());

    for id in ordered_ids {
        if placed.contains(id.as_str()) {
            continue;
        }
        if let Some(list) = current.iter().find(|list| &list.id == id) {
            placed.insert(list.id.as_str());
            next.push(list.clone());
        }
    }

    next.extend(
        current
            .iter()
            .filter(|list| !placed.contains(list.id.as_str()))
            .cloned(),
    );
    next
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, thread};

    use super::*;
    use crate::infra::stubs::{FlakyKeyValueStore, MemoryKeyValueStore};

    const KEY: &str = "lists";

    fn user(id: &str) -> User {
        User::new(id, format!("name-{id}"))
    }

    fn store() -> (Arc<MemoryKeyValueStore>, ListStore<Arc<MemoryKeyValueStore>>) {
        let storage = Arc::new(MemoryKeyValueStore::default());
        let store = ListStore::open(Arc::clone(&storage), KEY).expect("store should open");
        (storage, store)
    }

    fn names(store: &ListStore<Arc<MemoryKeyValueStore>>) -> Vec<String> {
        store.lists().into_iter().map(|list| list.name).collect()
    }

    fn ids(store: &ListStore<Arc<MemoryKeyValueStore>>) -> Vec<String> {
        store.lists().into_iter().map(|list| list.id).collect()
    }

    #[test]
    fn create_update_remove_delete_scenario() {
        let (_, store) = store();

        let work = store
            .create_list(NewList::new("Work", vec![user("u1"), user("u2")]))
            .expect("create should succeed");
        assert_eq!(store.len(), 1);
        assert_eq!(work.members.len(), 2);

        let removed = store
            .remove_members(&work.id, &["u1".to_owned()])
            .expect("remove should succeed");
        assert_eq!(removed, 1);
        let members = store.get(&work.id).expect("list exists").members;
        assert_eq!(members, vec![user("u2")]);

        store.delete_list(&work.id).expect("delete should succeed");
        assert!(store.is_empty());
    }

    #[test]
    fn created_ids_are_unique() {
        let (_, store) = store();

        for index in 0..50 {
            store
                .create_list(NewList::new(format!("list-{index}"), vec![]))
                .expect("create should succeed");
        }

        let unique: HashSet<String> = ids(&store).into_iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn create_appends_and_keeps_optional_metadata() {
        let (_, store) = store();
        store
            .create_list(NewList::new("Family", vec![]))
            .expect("create should succeed");

        let created = store
            .create_list(NewList {
                name: "Announcements".to_owned(),
                members: vec![user("u1")],
                description: Some("weekly".to_owned()),
                color: Some("#ff8800".to_owned()),
                list_type: ListType::Bulk,
            })
            .expect("create should succeed");

        assert_eq!(names(&store), ["Family", "Announcements"]);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.lists_of_type(ListType::Bulk), vec![created]);
    }

    #[test]
    fn add_members_twice_is_idempotent() {
        let (_, store) = store();
        let list = store
            .create_list(NewList::new("Work", vec![user("u1")]))
            .expect("create should succeed");
        let batch = vec![user("u2"), user("u3")];

        let first = store
            .add_members(&list.id, batch.clone())
            .expect("first add should succeed");
        let after_first = store.get(&list.id).expect("list exists").members;
        let second = store
            .add_members(&list.id, batch)
            .expect("second add should succeed");
        let after_second = store.get(&list.id).expect("list exists").members;

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn update_merges_fields_and_refreshes_updated_at() {
        let (_, store) = store();
        let list = store
            .create_list(NewList::new("Work", vec![user("u1")]))
            .expect("create should succeed");

        let updated = store
            .update_list(
                &list.id,
                ListPatch {
                    name: Some("Office".to_owned()),
                    color: Some("blue".to_owned()),
                    ..ListPatch::default()
                },
            )
            .expect("update should succeed");

        assert_eq!(updated.name, "Office");
        assert_eq!(updated.color.as_deref(), Some("blue"));
        assert_eq!(updated.members, list.members);
        assert_eq!(updated.created_at, list.created_at);
        assert!(updated.updated_at >= list.updated_at);
        assert_eq!(store.get(&list.id), Some(updated));
    }

    #[test]
    fn operations_on_missing_ids_report_not_found_and_change_nothing() {
        let (storage, store) = store();
        store
            .create_list(NewList::new("Work", vec![]))
            .expect("create should succeed");
        let before = store.lists();
        let persisted = storage.get(KEY).expect("get");

        let results = [
            store.update_list("nope", ListPatch::default()).map(|_| ()),
            store.delete_list("nope").map(|_| ()),
            store.add_members("nope", vec![user("u1")]).map(|_| ()),
            store.remove_members("nope", &["u1".to_owned()]).map(|_| ()),
        ];

        for result in results {
            assert!(matches!(result, Err(StoreError::NotFound { ref id }) if id == "nope"));
        }
        assert_eq!(store.lists(), before);
        assert_eq!(storage.get(KEY).expect("get"), persisted);
    }

    #[test]
    fn reorder_with_full_permutation_applies_exact_order() {
        let (_, store) = store();
        for name in ["a", "b", "c"] {
            store
                .create_list(NewList::new(name, vec![]))
                .expect("create should succeed");
        }
        let current = ids(&store);
        let wanted = vec![current[2].clone(), current[0].clone(), current[1].clone()];

        store.reorder_lists(&wanted).expect("reorder should succeed");

        assert_eq!(ids(&store), wanted);
        assert_eq!(names(&store), ["c", "a", "b"]);
    }

    #[test]
    fn reorder_with_partial_ids_appends_omitted_lists() {
        let (_, store) = store();
        for name in ["a", "b", "c", "d"] {
            store
                .create_list(NewList::new(name, vec![]))
                .expect("create should succeed");
        }
        let current = ids(&store);

        store
            .reorder_lists(&[
                current[3].clone(),
                "stale-id".to_owned(),
                current[1].clone(),
                current[3].clone(),
            ])
            .expect("reorder should succeed");

        assert_eq!(names(&store), ["d", "b", "a", "c"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn state_survives_reopen_in_order() {
        let (storage, store) = store();
        let first = store
            .create_list(NewList::new("first", vec![user("u1")]))
            .expect("create should succeed");
        let second = store
            .create_list(NewList::new("second", vec![]))
            .expect("create should succeed");
        store
            .reorder_lists(&[second.id.clone(), first.id.clone()])
            .expect("reorder should succeed");
        let before = store.lists();
        drop(store);

        let reopened = ListStore::open(storage, KEY).expect("store should reopen");

        assert_eq!(reopened.lists(), before);
    }

    #[test]
    fn persisted_payload_uses_camel_case_json_array() {
        let (storage, store) = store();
        store
            .create_list(NewList::new("Work", vec![user("u1")]))
            .expect("create should succeed");

        let raw = storage.get(KEY).expect("get").expect("key should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

        assert_eq!(value[0]["name"], "Work");
        assert_eq!(value[0]["type"], "normal");
        assert_eq!(value[0]["members"][0]["id"], "u1");
        assert!(value[0]["createdAt"].is_string());
        assert!(value[0]["updatedAt"].is_string());
    }

    #[test]
    fn clear_empties_and_deletes_key() {
        let (storage, store) = store();
        store
            .create_list(NewList::new("Work", vec![]))
            .expect("create should succeed");

        store.clear_lists().expect("clear should succeed");

        assert!(store.is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn failed_write_rolls_back_the_mutation() {
        let storage = Arc::new(FlakyKeyValueStore::default());
        let store = ListStore::open(Arc::clone(&storage), KEY).expect("store should open");
        let list = store
            .create_list(NewList::new("Work", vec![user("u1")]))
            .expect("create should succeed");
        let persisted = storage.get(KEY).expect("get");
        storage.fail_next(2);

        let err = store
            .add_members(&list.id, vec![user("u2")])
            .expect_err("write must fail");

        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.get(&list.id), Some(list));
        assert_eq!(storage.get(KEY).expect("get"), persisted);
    }

    #[test]
    fn failed_reorder_keeps_previous_order() {
        let storage = Arc::new(FlakyKeyValueStore::default());
        let store = ListStore::open(Arc::clone(&storage), KEY).expect("store should open");
        let first = store
            .create_list(NewList::new("A", vec![]))
            .expect("create should succeed");
        let second = store
            .create_list(NewList::new("B", vec![]))
            .expect("create should succeed");
        let persisted = storage.get(KEY).expect("get");
        storage.fail_next(2);

        let err = store
            .reorder_lists(&[second.id.clone(), first.id.clone()])
            .expect_err("write must fail");

        assert!(matches!(err, StoreError::Persistence(_)));
        let order: Vec<String> = store.lists().into_iter().map(|list| list.id).collect();
        assert_eq!(order, vec![first.id, second.id]);
        assert_eq!(storage.get(KEY).expect("get"), persisted);
    }

    #[test]
    fn failed_clear_keeps_lists_and_key() {
        let storage = Arc::new(FlakyKeyValueStore::default());
        let store = ListStore::open(Arc::clone(&storage), KEY).expect("store should open");
        let list = store
            .create_list(NewList::new("Work", vec![user("u1")]))
            .expect("create should succeed");
        let persisted = storage.get(KEY).expect("get");
        storage.fail_next(2);

        let err = store.clear_lists().expect_err("delete must fail");

        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.lists(), vec![list]);
        assert!(storage.inner.contains(KEY));
        assert_eq!(storage.get(KEY).expect("get"), persisted);
    }

    #[test]
    fn hydrate_repairs_duplicate_members() {
        let raw = r#"[{"id":"l1","name":"Work","members":[{"id":"u1"},{"id":"u1"},{"id":"u2"}],
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]"#;
        let storage = MemoryKeyValueStore::with_entry(KEY, raw);

        let store = ListStore::open(storage, KEY).expect("store should open");

        let list = store.get("l1").expect("list exists");
        assert_eq!(list.members.len(), 2);
        assert_eq!(list.list_type, ListType::Normal);
    }

    #[test]
    fn concurrent_adds_keep_members_unique() {
        let (_, store) = store();
        let list = store
            .create_list(NewList::new("Work", vec![]))
            .expect("create should succeed");
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let list_id = list.id.clone();
                thread::spawn(move || {
                    for index in 0..10 {
                        store
                            .add_members(&list_id, vec![user(&format!("u{index}"))])
                            .expect("add should succeed");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker should finish");
        }

        assert_eq!(store.get(&list.id).expect("list exists").members.len(), 10);
    }
}
