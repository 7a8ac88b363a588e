use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// Display grouping of a list. Both kinds filter chats the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    Normal,
    /// Broadcast grouping.
    Bulk,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bulk => "bulk",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "bulk" => Ok(Self::Bulk),
            other => Err(format!("unknown list type `{other}` (expected normal or bulk)")),
        }
    }
}

/// A named, locally persisted grouping of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(rename = "type", default)]
    pub list_type: ListType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a list; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewList {
    pub name: String,
    pub members: Vec<User>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub list_type: ListType,
}

impl NewList {
    pub fn new(name: impl Into<String>, members: Vec<User>) -> Self {
        Self {
            name: name.into(),
            members,
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub list_type: Option<ListType>,
    pub members: Option<Vec<User>>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.list_type.is_none()
            && self.members.is_none()
    }
}

impl ListEntry {
    pub fn create(id: String, new: NewList, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            members: dedup_members(new.members),
            list_type: new.list_type,
            description: new.description,
            color: new.color,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: ListPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(list_type) = patch.list_type {
            self.list_type = list_type;
        }
        if let Some(members) = patch.members {
            self.members = dedup_members(members);
        }
        self.updated_at = now;
    }

    /// Appends members whose id is not yet present, in input order.
    /// Returns how many were appended.
    pub fn add_members(&mut self, members: Vec<User>, now: DateTime<Utc>) -> usize {
        let mut known: HashSet<String> = self.members.iter().map(|m| m.id.clone()).collect();
        let before = self.members.len();

        for member in members {
            if known.insert(member.id.clone()) {
                self.members.push(member);
            }
        }

        self.updated_at = now;
        self.members.len() - before
    }

    /// Removes every member whose id is listed. Returns how many were removed.
    pub fn remove_members(&mut self, member_ids: &[String], now: DateTime<Utc>) -> usize {
        let doomed: HashSet<&str> = member_ids.iter().map(String::as_str).collect();
        let before = self.members.len();

        self.members.retain(|member| !doomed.contains(member.id.as_str()));

        self.updated_at = now;
        before - self.members.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|member| member.id == member_id)
    }
}

/// Keeps the first occurrence of every member id.
pub fn dedup_members(members: Vec<User>) -> Vec<User> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|member| seen.insert(member.id.clone()))
        .collect()
}
