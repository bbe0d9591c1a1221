//! # Domain Types
//!
//! Common data structures shared between search providers and message formatting.

use serde::{Deserialize, Serialize};

/// One hit from a search provider, already mapped into display fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    /// Extra labelled facts (e.g. "Year", "Album"), shown in order.
    pub fields: Vec<(String, String)>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.push((name.to_string(), value));
        }
        self
    }
}
