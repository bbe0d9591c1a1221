//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.books`) and dispatches it with the necessary context.

use anyhow::Result;
use std::sync::Arc;

use crate::application::navigator::NavigatorHandle;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, SearchProvider};
use crate::infrastructure::reactions::InteractionRouter;
use crate::interface::commands;

pub struct CommandRouter {
    config: AppConfig,
    providers: Vec<Arc<dyn SearchProvider>>,
    interactions: InteractionRouter,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        providers: Vec<Arc<dyn SearchProvider>>,
        interactions: InteractionRouter,
    ) -> Self {
        Self {
            config,
            providers,
            interactions,
        }
    }

    fn provider(&self, name: &str) -> Option<&Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let msg = message.trim();
        let Some(body) = msg.strip_prefix(self.config.system.command_prefix.as_str()) else {
            return Ok(());
        };

        let (cmd, args) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        if cmd == "help" {
            return commands::help::handle_help(chat).await;
        }

        let Some(provider) = self.provider(cmd) else {
            return chat
                .send_notification(crate::strings::messages::UNKNOWN_COMMAND)
                .await
                .map_err(|e| anyhow::anyhow!(e));
        };

        let handle = commands::search::handle_search(
            &self.config.navigator,
            provider,
            &self.interactions,
            chat,
            args,
            sender,
        )
        .await?;
        if let Some(handle) = handle {
            tokio::spawn(report_outcome(provider.name(), handle));
        }
        Ok(())
    }
}

/// Logs how a navigator ended once its task completes.
async fn report_outcome(provider: &'static str, handle: NavigatorHandle) {
    let session = handle.session_id();
    match handle.finished().await {
        Ok((reason, last)) => tracing::info!(
            session = %last.session,
            provider,
            reason = reason.as_str(),
            position = last.position,
            len = last.len,
            state = ?last.state,
            sealed = last.controls.all_disabled(),
            "navigator closed"
        ),
        Err(e) => tracing::error!(%session, provider, "navigator ended abnormally: {e:#}"),
    }
}
