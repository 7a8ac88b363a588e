use std::{collections::HashSet, fmt};

use super::{chat::Chat, list_entry::ListEntry};

const ALL_SENTINEL: &str = "all";

/// Which chats the chat list shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListSelection {
    #[default]
    All,
    List(String),
}

impl ListSelection {
    /// `None`, blank input and `all` (any case) mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(ALL_SENTINEL) => Self::All,
            Some(value) => Self::List(value.to_owned()),
        }
    }

    pub fn list_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::List(id) => Some(id),
        }
    }
}

impl fmt::Display for ListSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SENTINEL),
            Self::List(id) => f.write_str(id),
        }
    }
}

/// Outcome of applying a selection to a chat set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFilterOutcome {
    pub chats: Vec<Chat>,
    /// Set when a list was selected but no longer exists.
    pub fell_back: bool,
}

/// Chats whose counterpart belongs to the selected list.
///
/// An unknown list id is fail-open: every chat is returned.
pub fn filter_chats(chats: &[Chat], lists: &[ListEntry], selection: &ListSelection) -> ChatFilterOutcome {
    let Some(list_id) = selection.list_id() else {
        return ChatFilterOutcome {
            chats: chats.to_vec(),
            fell_back: false,
        };
    };

    let Some(list) = lists.iter().find(|list| list.id == list_id) else {
        return ChatFilterOutcome {
            chats: chats.to_vec(),
            fell_back: true,
        };
    };

    let member_ids: HashSet<&str> = list.members.iter().map(|m| m.id.as_str()).collect();
    let chats = chats
        .iter()
        .filter(|chat| {
            chat.participant_users()
                .any(|user| member_ids.contains(user.id.as_str()))
        })
        .cloned()
        .collect();

    ChatFilterOutcome {
        chats,
        fell_back: false,
    }
}
