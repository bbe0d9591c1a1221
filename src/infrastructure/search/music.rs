//! iTunes Search API, restricted to songs.

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

const BASE_URL: &str = "https://itunes.apple.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Track {
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    collection_name: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    primary_genre_name: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    track_time_millis: Option<u64>,
    #[serde(default)]
    track_view_url: Option<String>,
    #[serde(default)]
    artwork_url100: Option<String>,
}

pub struct ITunes {
    http: Client,
    cache: Arc<dyn ResultCache>,
    base_url: String,
    limit: usize,
    ttl: Duration,
}

impl ITunes {
    pub fn new(http: Client, cache: Arc<dyn ResultCache>, config: &SearchConfig) -> Self {
        Self {
            http,
            cache,
            base_url: BASE_URL.to_string(),
            limit: config.result_limit,
            ttl: config.cache_ttl(),
        }
    }
}

#[async_trait]
impl SearchProvider for ITunes {
    fn name(&self) -> &'static str {
        "music"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let key = cache_key(self.name(), query);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let limit = self.limit.to_string();
        let request = self.http.get(format!("{}/search", self.base_url)).query(&[
            ("term", query),
            ("media", "music"),
            ("entity", "song"),
            ("limit", limit.as_str()),
        ]);
        let response: SearchResponse = fetch_json(self.name(), request).await?;
        let results = map_response(response);

        tracing::info!("iTunes returned {} results for '{}'", results.len(), query);
        self.cache.set(&key, results.clone(), self.ttl).await;
        Ok(results)
    }
}

fn map_response(response: SearchResponse) -> Vec<SearchResult> {
    response
        .results
        .into_iter()
        .filter_map(|track| {
            let title = track
                .track_name
                .clone()
                .or_else(|| track.collection_name.clone())?;
            let mut result = SearchResult::new(title);
            result.subtitle = track.artist_name;
            result.url = track.track_view_url;
            result.thumbnail = track.artwork_url100;

            Some(
                result
                    .field("Album", track.collection_name.unwrap_or_default())
                    .field("Genre", track.primary_genre_name.unwrap_or_default())
                    .field("Released", track.release_date.as_deref().map(release_year).unwrap_or_default())
                    .field("Length", track.track_time_millis.map(format_length).unwrap_or_default()),
            )
        })
        .collect()
}

fn release_year(date: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(date)
        .map(|d| d.format("%Y").to_string())
        .unwrap_or_else(|_| date.chars().take(4).collect())
}

fn format_length(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
