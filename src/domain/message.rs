use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chat message as delivered by the message directory.
///
/// Fields this crate does not interpret are kept in `extra` so a starred
/// copy round-trips the full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chat_id: None,
            sender_id: None,
            text: text.into(),
            sent_at: None,
            extra: Map::new(),
        }
    }

    /// First line of the text, cut to `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.text.lines().next().unwrap_or_default().trim();
        let mut preview: String = line.chars().take(max_chars).collect();
        if line.chars().count() > max_chars {
            preview.push('…');
        }
        preview
    }
}
