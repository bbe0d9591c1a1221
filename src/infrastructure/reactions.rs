//! # Reaction Controls
//!
//! Matrix has no buttons, so navigator controls are rendered as a footer line
//! and driven by reactions. The bot seeds one reaction per control; a user
//! adding the same reaction presses it.
//!
//! - `ReactionSurface` implements the navigator `Surface` over any `ChatProvider`.
//! - `InteractionRouter` maps navigator messages to their session's event queue.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::application::navigator::controls::ControlStyle;
use crate::application::navigator::{ControlId, ControlPair, NavEvent, Surface};
use crate::domain::traits::ChatProvider;

/// Navigation events on Matrix carry the sender's user id.
pub type MatrixNavEvent = NavEvent<String>;

struct Route {
    controls: ControlPair,
    events: mpsc::UnboundedSender<MatrixNavEvent>,
}

/// A reaction that pressed a control, keyed by its event id.
struct Press {
    message_id: String,
    key: String,
    sender: String,
}

#[derive(Default)]
struct Routes {
    by_message: HashMap<String, Route>,
    presses: HashMap<String, Press>,
}

impl Routes {
    fn remove(&mut self, message_id: &str) {
        self.by_message.remove(message_id);
        self.presses.retain(|_, press| press.message_id != message_id);
    }

    /// Sends `key` to the session behind `message_id`. Disabled controls never match.
    fn press(&mut self, message_id: &str, key: &str, sender: &str) -> bool {
        let Some(route) = self.by_message.get(message_id) else {
            return false;
        };
        let Some(control) = route
            .controls
            .iter()
            .find(|c| !c.disabled && normalise_key(c.trigger_key()) == key)
        else {
            tracing::debug!("Ignoring reaction '{}' on navigator {}", key, message_id);
            return false;
        };

        let event = NavEvent::new(control.id, sender.to_string());
        if route.events.send(event).is_err() {
            // session ended without closing its route
            self.remove(message_id);
            return false;
        }
        true
    }
}

/// Routes reactions on navigator messages to the owning session.
///
/// Clients toggle a reaction the user already added instead of sending it
/// twice, so removing a press (a redaction) counts as pressing again.
#[derive(Clone, Default)]
pub struct InteractionRouter {
    routes: Arc<Mutex<Routes>>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(
        &self,
        message_id: &str,
        controls: ControlPair,
        events: mpsc::UnboundedSender<MatrixNavEvent>,
    ) {
        self.routes
            .lock()
            .await
            .by_message
            .insert(message_id.to_string(), Route { controls, events });
    }

    /// Records the controls now on screen for a message.
    pub async fn refresh(&self, message_id: &str, controls: &ControlPair) {
        if let Some(route) = self.routes.lock().await.by_message.get_mut(message_id) {
            route.controls = controls.clone();
        }
    }

    pub async fn close(&self, message_id: &str) {
        self.routes.lock().await.remove(message_id);
    }

    #[cfg(test)]
    pub async fn is_tracking(&self, message_id: &str) -> bool {
        self.routes.lock().await.by_message.contains_key(message_id)
    }

    /// Forwards the reaction `reaction_id` to its session. Returns whether it was delivered.
    pub async fn dispatch(&self, message_id: &str, reaction_id: &str, key: &str, sender: &str) -> bool {
        let key = normalise_key(key);
        let mut routes = self.routes.lock().await;
        if !routes.press(message_id, key, sender) {
            return false;
        }
        routes.presses.insert(
            reaction_id.to_string(),
            Press {
                message_id: message_id.to_string(),
                key: key.to_string(),
                sender: sender.to_string(),
            },
        );
        true
    }

    /// Replays a press whose reaction was just removed by the user who added it.
    pub async fn dispatch_redaction(&self, reaction_id: &str, sender: &str) -> bool {
        let mut routes = self.routes.lock().await;
        let Some(press) = routes.presses.remove(reaction_id) else {
            return false;
        };
        if press.sender != sender {
            return false;
        }
        routes.press(&press.message_id, &press.key, sender)
    }
}

/// Clients disagree on the emoji variation selector; compare without it.
fn normalise_key(key: &str) -> &str {
    key.trim().trim_end_matches('\u{fe0f}')
}

/// Matrix text colour for an enabled control. Secondary stays uncoloured.
fn colour(style: ControlStyle) -> Option<&'static str> {
    match style {
        ControlStyle::Primary => Some("#0b5fff"),
        ControlStyle::Secondary => None,
        ControlStyle::Success => Some("#1f8a3b"),
        ControlStyle::Danger => Some("#d1242f"),
    }
}

/// Message body plus a control footer. Disabled controls are struck through.
pub fn compose(view: &str, controls: &ControlPair) -> String {
    let footer = controls
        .iter()
        .map(|control| {
            let caption = control.caption();
            if control.disabled {
                return format!("~~{caption}~~");
            }
            match colour(control.style) {
                Some(hex) => format!("<font data-mx-color=\"{hex}\">**{caption}**</font>"),
                None => format!("**{caption}**"),
            }
        })
        .collect::<Vec<_>>()
        .join(" · ");
    format!("{view}\n\n{footer}")
}

pub struct ReactionSurface<C> {
    chat: C,
    router: InteractionRouter,
    events: mpsc::UnboundedSender<MatrixNavEvent>,
    message_id: Option<String>,
    body: String,
}

impl<C: ChatProvider> ReactionSurface<C> {
    pub fn new(
        chat: C,
        router: InteractionRouter,
        events: mpsc::UnboundedSender<MatrixNavEvent>,
    ) -> Self {
        Self {
            chat,
            router,
            events,
            message_id: None,
            body: String::new(),
        }
    }

    fn message_id(&self) -> Result<&str> {
        self.message_id
            .as_deref()
            .context("navigator message was never published")
    }
}

#[async_trait]
impl<C: ChatProvider> Surface for ReactionSurface<C> {
    type View = String;

    async fn publish(&mut self, view: String, controls: &ControlPair) -> Result<()> {
        let message_id = self
            .chat
            .send_message(&compose(&view, controls))
            .await
            .map_err(|e| anyhow!(e))?;
        self.router
            .open(&message_id, controls.clone(), self.events.clone())
            .await;

        // a single-item navigator has nothing to press
        if !controls.all_disabled() {
            for control in controls.iter() {
                if let Err(e) = self.chat.react(&message_id, control.trigger_key()).await {
                    tracing::warn!("Failed to seed reaction on {}: {}", message_id, e);
                }
            }
        }

        self.message_id = Some(message_id);
        self.body = view;
        Ok(())
    }

    async fn acknowledge(
        &mut self,
        _control: &ControlId,
        view: String,
        controls: &ControlPair,
    ) -> Result<()> {
        let message_id = self.message_id()?.to_string();
        self.chat
            .edit_message(&message_id, &compose(&view, controls))
            .await
            .map_err(|e| anyhow!(e))?;
        self.router.refresh(&message_id, controls).await;
        self.body = view;
        Ok(())
    }

    async fn seal(&mut self, controls: &ControlPair) -> Result<()> {
        let message_id = self.message_id()?.to_string();
        self.router.close(&message_id).await;
        self.chat
            .edit_message(&message_id, &compose(&self.body, controls))
            .await
            .map_err(|e| anyhow!(e))
    }
}
