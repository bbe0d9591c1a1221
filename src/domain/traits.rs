//! # Domain Traits
//!
//! Abstract interfaces for the bot's collaborators (Chat, Search, Cache).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::types::SearchResult;

/// Abstract interface for a Chat Provider (e.g., Matrix, Slack, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Edit a message in the room
    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String>;

    /// React to a message with a short key (usually an emoji)
    async fn react(&self, message_id: &str, key: &str) -> Result<(), String>;

    /// Send a notification (not tracked/editable)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// A remote catalogue that can be searched by free text.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs and cache keys.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>>;
}

/// Result cache injected into providers. Entries disappear after their TTL.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<SearchResult>>;

    async fn set(&self, key: &str, value: Vec<SearchResult>, ttl: Duration);
}
