//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes usage hints, search failures and the result card layout.

use crate::domain::types::SearchResult;

pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Try `.help`.";

pub fn search_usage(command: &str) -> String {
    format!("Usage: `.{command} <query>`")
}

pub fn no_results(query: &str) -> String {
    format!("🤷 No results for **{query}**.")
}

pub fn search_failed(provider: &str) -> String {
    format!("❌ **Search Failed**: the {provider} service did not answer. Try again later.")
}

/// One result as shown inside a navigator, with its position.
pub fn result_card(result: &SearchResult, position: usize, total: usize) -> String {
    let mut card = match &result.url {
        Some(url) => format!("### [{}]({url})\n", result.title),
        None => format!("### {}\n", result.title),
    };

    if let Some(subtitle) = &result.subtitle {
        card.push_str(&format!("_{subtitle}_\n"));
    }
    if let Some(description) = &result.description {
        card.push_str(&format!("\n{description}\n"));
    }
    if !result.fields.is_empty() {
        card.push('\n');
        for (name, value) in &result.fields {
            card.push_str(&format!("* **{name}**: {value}\n"));
        }
    }
    if let Some(thumbnail) = &result.thumbnail {
        card.push_str(&format!("\n[Cover]({thumbnail})\n"));
    }

    card.push_str(&format!("\n`{}/{}`", position + 1, total));
    card
}
