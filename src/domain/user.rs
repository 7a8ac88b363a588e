use serde::{Deserialize, Serialize};

/// Snapshot of a contact record.
///
/// Lists store these by value: editing the contact later does not touch
/// copies already stored inside a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(id: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: None,
            phone: String::new(),
            avatar: None,
        }
    }

    /// Returns "First Last", falling back to the phone number, then the id.
    pub fn display_name(&self) -> String {
        let full = match self.last_name.as_deref() {
            Some(last) if !last.trim().is_empty() => {
                format!("{} {}", self.first_name.trim(), last.trim())
            }
            _ => self.first_name.trim().to_owned(),
        };
        let full = full.trim();

        if !full.is_empty() {
            full.to_owned()
        } else if !self.phone.trim().is_empty() {
            self.phone.trim().to_owned()
        } else {
            self.id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_first_and_last_name() {
        let mut user = User::new("u1", "Ada");
        user.last_name = Some("Lovelace".to_owned());

        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_phone_then_id() {
        let mut user = User::new("u1", "  ");
        user.phone = "+15550100".to_owned();
        assert_eq!(user.display_name(), "+15550100");

        user.phone.clear();
        assert_eq!(user.display_name(), "u1");
    }

    #[test]
    fn deserializes_camel_case_payload_with_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id":"u7","firstName":"Grace"}"#)
            .expect("user payload should parse");

        assert_eq!(user.id, "u7");
        assert_eq!(user.first_name, "Grace");
        assert_eq!(user.last_name, None);
        assert!(user.phone.is_empty());
    }
}
