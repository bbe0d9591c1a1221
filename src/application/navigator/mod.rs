//! # Result Navigator
//!
//! Lets one user page through an ordered list of results on a single message.
//!
//! The engine is platform agnostic. A host supplies:
//! - a [`Surface`] that publishes and edits the message,
//! - a stream of [`NavEvent`]s scoped to that message,
//! - a [`RenderAdapter`] turning a position into a view.
//!
//! Each navigator runs as its own tokio task that races the event stream
//! against the hard and idle deadlines. Whichever fires first wins.

pub mod controls;
pub mod session;

pub use controls::{ControlId, ControlPair, NavigatorStyle, SessionId};
pub use session::{NavEvent, Session, SessionState, TerminationReason, Timeouts, Verdict};

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::fmt::Debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Host primitives the navigator renders through.
#[async_trait]
pub trait Surface: Send {
    type View: Send;

    /// Post the initial view and controls.
    async fn publish(&mut self, view: Self::View, controls: &ControlPair) -> Result<()>;

    /// Answer an accepted interaction with the new view and controls.
    async fn acknowledge(
        &mut self,
        control: &ControlId,
        view: Self::View,
        controls: &ControlPair,
    ) -> Result<()>;

    /// Final update once the session is over. Content stays as is.
    async fn seal(&mut self, controls: &ControlPair) -> Result<()>;
}

/// Maps a position to something displayable. Called on every move, never cached.
pub trait RenderAdapter<T>: Send + Sync {
    type View;

    fn render(&self, items: &[T], position: usize) -> Self::View;
}

impl<T, V, F> RenderAdapter<T> for F
where
    F: Fn(&[T], usize) -> V + Send + Sync,
{
    type View = V;

    fn render(&self, items: &[T], position: usize) -> V {
        self(items, position)
    }
}

/// What to do when an intermediate update cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFailurePolicy {
    /// Seal the session after the first failed update.
    #[default]
    Terminate,
    /// Keep the last delivered render and keep listening.
    Continue,
}

#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    pub timeouts: Timeouts,
    pub style: NavigatorStyle,
    pub on_update_failure: UpdateFailurePolicy,
}

/// Read-only view of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub session: SessionId,
    pub position: usize,
    pub len: usize,
    pub state: SessionState,
    pub controls: ControlPair,
}

pub struct NavigatorHandle {
    session: SessionId,
    snapshot: watch::Receiver<Snapshot>,
    task: JoinHandle<TerminationReason>,
}

impl NavigatorHandle {
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the session to end. Returns why it ended and its final state.
    pub async fn finished(self) -> Result<(TerminationReason, Snapshot)> {
        let reason = self.task.await.context("navigator task panicked")?;
        let last = self.snapshot.borrow().clone();
        Ok((reason, last))
    }
}

struct Navigator<T, R, S, U> {
    session: Session<U>,
    items: Vec<T>,
    render: R,
    surface: S,
    policy: UpdateFailurePolicy,
    snapshot: watch::Sender<Snapshot>,
}

/// Publishes position 0 and spawns the session task.
///
/// `items` must not be empty. A failed initial publish is returned as is.
pub async fn start<T, R, S, U, E>(
    items: Vec<T>,
    render: R,
    owner: U,
    options: NavigatorOptions,
    mut surface: S,
    events: E,
) -> Result<NavigatorHandle>
where
    T: Send + Sync + 'static,
    R: RenderAdapter<T, View = S::View> + 'static,
    S: Surface + 'static,
    U: PartialEq + Debug + Send + Sync + 'static,
    E: Stream<Item = NavEvent<U>> + Send + Unpin + 'static,
{
    let session = Session::new(
        items.len(),
        owner,
        options.timeouts,
        options.style,
        Instant::now(),
    );
    let controls = session.controls();
    surface
        .publish(render.render(&items, 0), &controls)
        .await
        .context("failed to publish navigator")?;

    let id = session.id();
    let span = info_span!("navigator", session = %id, owner = ?session.owner());
    span.in_scope(|| info!(items = items.len(), "navigator started"));

    let (tx, rx) = watch::channel(Snapshot {
        session: id,
        position: 0,
        len: items.len(),
        state: SessionState::Active,
        controls,
    });
    let navigator = Navigator {
        session,
        items,
        render,
        surface,
        policy: options.on_update_failure,
        snapshot: tx,
    };
    let task = tokio::spawn(navigator.run(events).instrument(span));

    Ok(NavigatorHandle {
        session: id,
        snapshot: rx,
        task,
    })
}

impl<T, R, S, U> Navigator<T, R, S, U>
where
    R: RenderAdapter<T, View = S::View>,
    S: Surface,
    U: PartialEq + Debug,
{
    async fn run<E>(mut self, mut events: E) -> TerminationReason
    where
        E: Stream<Item = NavEvent<U>> + Unpin,
    {
        let reason = loop {
            let (deadline, expiry) = self.session.next_expiry();
            tokio::select! {
                biased;
                _ = tokio::time::sleep_until(deadline) => break expiry,
                event = events.next() => match event {
                    Some(event) => {
                        if let Some(reason) = self.handle_event(event).await {
                            break reason;
                        }
                    }
                    None => break TerminationReason::SourceEnded,
                },
            }
        };
        self.terminate(reason).await;
        reason
    }

    async fn handle_event(&mut self, event: NavEvent<U>) -> Option<TerminationReason> {
        let (from, to) = match self.session.handle_event(&event, Instant::now()) {
            Verdict::Moved { from, to } => (from, to),
            Verdict::Rejected(why) => {
                debug!(?why, user = ?event.user, control = %event.control, "navigation event discarded");
                return None;
            }
        };

        let controls = self.session.controls();
        let view = self.render.render(&self.items, to);
        match self.surface.acknowledge(&event.control, view, &controls).await {
            Ok(()) => {
                debug!(from, to, "navigated");
                self.session.commit();
                self.publish_snapshot();
                None
            }
            Err(e) => {
                error!(from, to, "navigator update failed: {e:#}");
                self.session.rollback();
                match self.policy {
                    UpdateFailurePolicy::Terminate => Some(TerminationReason::UpdateFailed),
                    UpdateFailurePolicy::Continue => None,
                }
            }
        }
    }

    async fn terminate(&mut self, reason: TerminationReason) {
        let Some(controls) = self.session.terminate() else {
            return;
        };
        info!(
            reason = reason.as_str(),
            position = self.session.position(),
            "navigator terminated"
        );
        self.publish_snapshot();
        if let Err(e) = self.surface.seal(&controls).await {
            warn!("failed to disable navigator controls: {e:#}");
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot.send_replace(Snapshot {
            session: self.session.id(),
            position: self.session.position(),
            len: self.session.len(),
            state: self.session.state(),
            controls: self.session.controls(),
        });
    }
}
