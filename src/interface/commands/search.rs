//! # Search Commands
//!
//! Handles `.books`, `.music` and any other provider-backed command.
//! Runs the search, then opens a result navigator owned by the sender.

use anyhow::{Result, anyhow};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::application::navigator::{self, NavigatorHandle};
use crate::domain::config::NavigatorConfig;
use crate::domain::traits::{ChatProvider, SearchProvider};
use crate::domain::types::SearchResult;
use crate::infrastructure::reactions::{InteractionRouter, ReactionSurface};
use crate::strings::messages;

pub async fn handle_search<C>(
    settings: &NavigatorConfig,
    provider: &Arc<dyn SearchProvider>,
    interactions: &InteractionRouter,
    chat: &C,
    query: &str,
    sender: &str,
) -> Result<Option<NavigatorHandle>>
where
    C: ChatProvider + Clone + 'static,
{
    let query = query.trim();
    if query.is_empty() {
        chat.send_notification(&messages::search_usage(provider.name()))
            .await
            .map_err(|e| anyhow!(e))?;
        return Ok(None);
    }

    let results = match provider.search(query).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("{} search for '{}' failed: {:#}", provider.name(), query, e);
            chat.send_notification(&messages::search_failed(provider.name()))
                .await
                .map_err(|e| anyhow!(e))?;
            return Ok(None);
        }
    };

    if results.is_empty() {
        chat.send_notification(&messages::no_results(query))
            .await
            .map_err(|e| anyhow!(e))?;
        return Ok(None);
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let surface = ReactionSurface::new(chat.clone(), interactions.clone(), tx);
    let handle = navigator::start(
        results,
        render_card,
        sender.to_string(),
        settings.options(),
        surface,
        UnboundedReceiverStream::new(rx),
    )
    .await?;

    tracing::info!(
        "Opened {} navigator {} for {} in {}",
        provider.name(),
        handle.session_id(),
        sender,
        chat.room_id()
    );
    Ok(Some(handle))
}

fn render_card(results: &[SearchResult], position: usize) -> String {
    messages::result_card(&results[position], position, results.len())
}
