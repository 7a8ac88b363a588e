//! Use case layer: stores, projections and application wiring.

pub mod bootstrap;
pub mod context;
pub mod filtered_chats;
pub mod list_store;
pub mod persisted;
pub mod starred_store;
