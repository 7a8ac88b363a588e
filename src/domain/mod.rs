//! Domain layer: core entities and business rules.

pub mod chat;
pub mod chat_filter;
pub mod list_entry;
pub mod message;
pub mod user;
