//! Open Library book search (`/search.json`).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{cache_key, fetch_json};
use crate::domain::config::SearchConfig;
use crate::domain::traits::{ResultCache, SearchProvider};
use crate::domain::types::SearchResult;

const BASE_URL: &str = "https://openlibrary.org";
const COVERS_URL: &str = "https://covers.openlibrary.org/b/id";
const FIELDS: &str = "key,title,subtitle,author_name,first_publish_year,number_of_pages_median,cover_i,subject";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    first_publish_year: Option<i32>,
    #[serde(default)]
    number_of_pages_median: Option<u32>,
    #[serde(default)]
    cover_i: Option<i64>,
    #[serde(default)]
    subject: Vec<String>,
}

pub struct OpenLibrary {
    http: Client,
    cache: Arc<dyn ResultCache>,
    base_url: String,
    limit: usize,
    ttl: Duration,
}

impl OpenLibrary {
    pub fn new(http: Client, cache: Arc<dyn ResultCache>, config: &SearchConfig) -> Self {
        Self {
            http,
            cache,
            base_url: BASE_URL.to_string(),
            limit: config.result_limit,
            ttl: config.cache_ttl(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for OpenLibrary {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let key = cache_key(self.name(), query);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let limit = self.limit.to_string();
        let request = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[("q", query), ("limit", limit.as_str()), ("fields", FIELDS)]);
        let response: SearchResponse = fetch_json(self.name(), request).await?;
        let results = map_response(response);

        tracing::info!("Open Library returned {} results for '{}'", results.len(), query);
        self.cache.set(&key, results.clone(), self.ttl).await;
        Ok(results)
    }
}

fn map_response(response: SearchResponse) -> Vec<SearchResult> {
    response
        .docs
        .into_iter()
        .filter_map(|doc| {
            let title = doc.title.filter(|t| !t.trim().is_empty())?;
            let mut result = SearchResult::new(title);
            if !doc.author_name.is_empty() {
                result.subtitle = Some(doc.author_name.join(", "));
            }
            result.description = doc.subtitle;
            result.url = doc.key.map(|k| format!("{BASE_URL}{k}"));
            result.thumbnail = doc.cover_i.map(|id| format!("{COVERS_URL}/{id}-M.jpg"));

            let subjects = doc.subject.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
            Some(
                result
                    .field("First published", doc.first_publish_year.map(|y| y.to_string()).unwrap_or_default())
                    .field("Pages", doc.number_of_pages_median.map(|p| p.to_string()).unwrap_or_default())
                    .field("Subjects", subjects),
            )
        })
        .collect()
}
