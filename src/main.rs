//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, reaction controls, search backends
//! - Application: Router, result navigator, cache
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::{
        reaction::OriginalSyncReactionEvent,
        room::{
            member::{MembershipState, StrippedRoomMemberEvent},
            message::SyncRoomMessageEvent,
            redaction::OriginalSyncRoomRedactionEvent,
        },
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::cache::MemoryCache;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ResultCache, SearchProvider};
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::reactions::InteractionRouter;
use crate::infrastructure::search::{self, books::OpenLibrary, music::ITunes};

#[derive(Parser, Debug)]
#[command(version, about = "Matrix bot that searches books and music")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Directory for the session log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    if !args.data_dir.exists() {
        fs::create_dir_all(&args.data_dir).context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = args.data_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&args.data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting Scout...");

    // 3. Search Backends
    let cache = Arc::new(MemoryCache::new());
    let shared_cache: Arc<dyn ResultCache> = cache.clone();
    let http = search::http_client(&config.search)?;
    let providers: Vec<Arc<dyn SearchProvider>> = vec![
        Arc::new(OpenLibrary::new(http.clone(), shared_cache.clone(), &config.search)),
        Arc::new(ITunes::new(http, shared_cache, &config.search)),
    ];

    let interactions = InteractionRouter::new();
    let router = Arc::new(CommandRouter::new(
        config.clone(),
        providers,
        interactions.clone(),
    ));

    // 4. Matrix Setup
    let matrix = &config.services.matrix;
    let client = Client::builder()
        .homeserver_url(&matrix.homeserver)
        .build()
        .await
        .context("Failed to build Matrix client")?;

    client
        .matrix_auth()
        .login_username(&matrix.username, &matrix.password)
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("Logged in as {}", matrix.username);

    if let Some(name) = &matrix.display_name {
        tracing::info!("Setting display name to: {}", name);
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    // 5. Background cache maintenance
    let purge_interval = config.search.cache_ttl().max(Duration::from_secs(60));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(purge_interval).await;
            let purged = cache.purge_expired().await;
            if purged > 0 {
                tracing::debug!("Purged {} expired cache entries", purged);
            }
        }
    });

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();
    let loop_config = config.clone();
    let loop_router = router.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let config = loop_config.clone();
        let router = loop_router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if original_msg.sender == room.own_user_id()
                || !config.system.allows_room(room.room_id().as_str())
            {
                return;
            }

            if let matrix_sdk::ruma::events::room::message::MessageType::Text(text_content) =
                &original_msg.content.msgtype
            {
                let chat = MatrixService::new(room);
                if let Err(e) = router
                    .route(&chat, &text_content.body, original_msg.sender.as_str())
                    .await
                {
                    tracing::error!("Failed to route message: {:#}", e);
                }
            }
        }
    });

    // Reactions drive navigator controls
    let reaction_router = interactions.clone();
    client.add_event_handler(move |ev: OriginalSyncReactionEvent, room: Room| {
        let interactions = reaction_router.clone();

        async move {
            if ev.sender == room.own_user_id() {
                return;
            }
            let annotation = &ev.content.relates_to;
            interactions
                .dispatch(
                    annotation.event_id.as_str(),
                    ev.event_id.as_str(),
                    &annotation.key,
                    ev.sender.as_str(),
                )
                .await;
        }
    });

    // Removing a reaction toggles the control again
    let redaction_router = interactions.clone();
    client.add_event_handler(move |ev: OriginalSyncRoomRedactionEvent, room: Room| {
        let interactions = redaction_router.clone();

        async move {
            if ev.sender == room.own_user_id() {
                return;
            }
            let Some(redacts) = ev.redacts.as_ref().or(ev.content.redacts.as_ref()) else {
                return;
            };
            interactions
                .dispatch_redaction(redacts.as_str(), ev.sender.as_str())
                .await;
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("Received invite for room {}", room.room_id());
            if let Err(e) = room.join().await {
                tracing::warn!("Failed to join room after invite: {}", e);
            }
        }
    });

    // 7. Sync Loop
    tracing::info!("Starting sync loop...");
    client
        .sync(SyncSettings::default())
        .await
        .context("Sync loop failed")?;

    Ok(())
}
