//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::traits::{ChatProvider, SearchProvider};
use crate::domain::types::SearchResult;

#[derive(Default)]
struct ChatLog {
    sent: Vec<(String, String)>,
    edits: Vec<(String, String)>,
    reactions: Vec<(String, String)>,
    notifications: Vec<String>,
}

/// In-memory chat room recording everything the bot does.
#[derive(Clone, Default)]
pub struct MockChat {
    log: Arc<Mutex<ChatLog>>,
    next_id: Arc<AtomicUsize>,
    fail_edits: Arc<AtomicBool>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn last_sent_id(&self) -> String {
        self.sent().last().map(|(id, _)| id.clone()).unwrap_or_default()
    }

    pub fn edits(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().edits.clone()
    }

    pub fn reactions(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().reactions.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.log.lock().unwrap().notifications.clone()
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let id = format!("$event{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.log
            .lock()
            .unwrap()
            .sent
            .push((id.clone(), content.to_string()));
        Ok(id)
    }

    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err("M_FORBIDDEN: cannot edit".to_string());
        }
        self.log
            .lock()
            .unwrap()
            .edits
            .push((message_id.to_string(), content.to_string()));
        Ok(())
    }

    async fn react(&self, message_id: &str, key: &str) -> Result<(), String> {
        self.log
            .lock()
            .unwrap()
            .reactions
            .push((message_id.to_string(), key.to_string()));
        Ok(())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.log
            .lock()
            .unwrap()
            .notifications
            .push(content.to_string());
        Ok(())
    }

    fn room_id(&self) -> String {
        "!room:example.org".to_string()
    }
}

/// Provider answering every query with a fixed result set (or an error).
pub struct StaticProvider {
    pub results: Result<Vec<SearchResult>, String>,
}

impl StaticProvider {
    pub fn titles(titles: &[&str]) -> Self {
        Self {
            results: Ok(titles.iter().map(|t| SearchResult::new(*t)).collect()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            results: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &str) -> anyhow::Result<Vec<SearchResult>> {
        self.results.clone().map_err(|e| anyhow::anyhow!(e))
    }
}
