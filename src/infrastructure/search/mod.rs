//! # Search Providers
//!
//! Keyless HTTP search backends implementing `SearchProvider`.
//! Each provider maps its JSON payload into `SearchResult`s and goes through
//! the injected `ResultCache` before touching the network.

pub mod books;
pub mod music;

use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::config::SearchConfig;

/// Builds the HTTP client shared by all providers.
pub fn http_client(config: &SearchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to create HTTP client")
}

/// Cache key shared by every provider: `provider:normalised query`.
pub fn cache_key(provider: &str, query: &str) -> String {
    let normalised = query.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{provider}:{}", normalised.to_lowercase())
}

async fn fetch_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{provider}: HTTP request failed"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{provider}: API returned {status}");
    }

    response
        .json()
        .await
        .with_context(|| format!("{provider}: failed to parse response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_normalises_query() {
        assert_eq!(cache_key("books", "  The   Hobbit "), "books:the hobbit");
        assert_eq!(cache_key("music", "ABBA"), "music:abba");
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(&SearchConfig::default()).is_ok());
    }
}
