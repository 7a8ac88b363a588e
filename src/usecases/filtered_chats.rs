use crate::{
    domain::{
        chat::Chat,
        chat_filter::{filter_chats, ListSelection},
        list_entry::ListEntry,
    },
    infra::contracts::ChatSource,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredChatsQuery {
    pub selection: ListSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredChatsOutput {
    pub chats: Vec<Chat>,
    /// Name of the list the chats were filtered by, when one applied.
    pub applied_list: Option<String>,
    pub fell_back: bool,
}

/// Recomputes the visible chats from the current lists snapshot.
pub fn filtered_chats(
    source: &dyn ChatSource,
    lists: &[ListEntry],
    query: &FilteredChatsQuery,
) -> FilteredChatsOutput {
    let outcome = filter_chats(source.chats(), lists, &query.selection);

    if outcome.fell_back {
        tracing::warn!(
            selection = %query.selection,
            "selected list no longer exists, showing all chats"
        );
    }

    let applied_list = query
        .selection
        .list_id()
        .and_then(|id| lists.iter().find(|list| list.id == id))
        .map(|list| list.name.clone());

    tracing::debug!(
        selection = %query.selection,
        total = source.chats().len(),
        visible = outcome.chats.len(),
        "chat view recomputed"
    );

    FilteredChatsOutput {
        chats: outcome.chats,
        applied_list,
        fell_back: outcome.fell_back,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{chat::Participant, list_entry::NewList, user::User};

    struct StubChats(Vec<Chat>);

    impl ChatSource for StubChats {
        fn chats(&self) -> &[Chat] {
            &self.0
        }
    }

    fn direct_chat(id: &str, counterpart: &str) -> Chat {
        Chat {
            id: id.to_owned(),
            title: None,
            participants: vec![Some(Participant {
                user: Some(User::new(counterpart, counterpart)),
            })],
        }
    }

    fn source() -> StubChats {
        StubChats(vec![direct_chat("c1", "u1"), direct_chat("c2", "u2")])
    }

    fn work_list() -> ListEntry {
        ListEntry::create(
            "work".to_owned(),
            NewList::new("Work", vec![User::new("u2", "Bo")]),
            Utc::now(),
        )
    }

    #[test]
    fn all_selection_returns_every_chat() {
        let output = filtered_chats(&source(), &[work_list()], &FilteredChatsQuery::default());

        assert_eq!(output.chats, source().0);
        assert_eq!(output.applied_list, None);
        assert!(!output.fell_back);
    }

    #[test]
    fn selected_list_narrows_chats_and_reports_its_name() {
        let query = FilteredChatsQuery {
            selection: ListSelection::List("work".to_owned()),
        };

        let output = filtered_chats(&source(), &[work_list()], &query);

        assert_eq!(output.chats, vec![direct_chat("c2", "u2")]);
        assert_eq!(output.applied_list.as_deref(), Some("Work"));
    }

    #[test]
    fn deleted_list_falls_back_to_all_chats() {
        let query = FilteredChatsQuery {
            selection: ListSelection::List("gone".to_owned()),
        };

        let output = filtered_chats(&source(), &[work_list()], &query);

        assert_eq!(output.chats, source().0);
        assert_eq!(output.applied_list, None);
        assert!(output.fell_back);
    }
}
