use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// `None` when the backend no longer knows the account.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Individual slots may be `null` in directory payloads.
    #[serde(default)]
    pub participants: Vec<Option<Participant>>,
}

impl Chat {
    /// Users behind the non-null participant slots.
    pub fn participant_users(&self) -> impl Iterator<Item = &User> {
        self.participants
            .iter()
            .filter_map(|slot| slot.as_ref())
            .filter_map(|participant| participant.user.as_ref())
    }

    /// Title, or the participants' names when the chat has none.
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_owned();
        }

        let names: Vec<String> = self.participant_users().map(User::display_name).collect();
        if names.is_empty() {
            self.id.clone()
        } else {
            names.join(", ")
        }
    }
}
