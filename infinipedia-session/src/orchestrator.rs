//! Topic orchestrator.
//!
//! `resolve` bumps the epoch, resets the state and spawns three independent
//! tasks (art, image, definition) tagged with the new epoch. All shared
//! state lives in a `watch` channel; every task mutation goes through
//! [`apply_if_current`], which compares epochs and mutates inside a single
//! `send_if_modified` call. Superseded tasks are never aborted; their
//! results are simply dropped.

use std::sync::Arc;

use futures::StreamExt;
use infinipedia_core::{ProviderError, Topic};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::context::SessionContext;
use crate::state::{Epoch, ExploreState};

/// Result of a [`TopicOrchestrator::resolve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A new epoch started for the topic.
    Started(Epoch),
    /// The topic is already active; nothing happened.
    Unchanged,
    /// The input was blank; nothing happened.
    Empty,
}

impl ResolveOutcome {
    /// The started epoch, if any.
    pub fn epoch(self) -> Option<Epoch> {
        match self {
            Self::Started(epoch) => Some(epoch),
            Self::Unchanged | Self::Empty => None,
        }
    }
}

/// Drives generation for the active topic.
#[derive(Debug)]
pub struct TopicOrchestrator {
    context: Arc<SessionContext>,
    state: Arc<watch::Sender<ExploreState>>,
}

impl TopicOrchestrator {
    /// Creates an idle orchestrator.
    pub fn new(context: Arc<SessionContext>) -> Self {
        let (state, _) = watch::channel(ExploreState::default());
        Self {
            context,
            state: Arc::new(state),
        }
    }

    /// The session context.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Starts generation for `input` unless it is blank or already active.
    ///
    /// Returns immediately; progress is published through [`subscribe`].
    /// Must be called from within a Tokio runtime.
    ///
    /// [`subscribe`]: Self::subscribe
    pub fn resolve(&self, input: &str) -> ResolveOutcome {
        let Some(topic) = Topic::parse(input) else {
            debug!("Ignoring blank topic");
            return ResolveOutcome::Empty;
        };
        self.resolve_topic(topic)
    }

    /// Starts generation for an already validated topic.
    pub fn resolve_topic(&self, topic: Topic) -> ResolveOutcome {
        match self.begin(topic, false) {
            Some(epoch) => ResolveOutcome::Started(epoch),
            None => ResolveOutcome::Unchanged,
        }
    }

    /// Starts a fresh epoch for the active topic.
    ///
    /// Returns [`ResolveOutcome::Empty`] if no topic is active.
    pub fn reload(&self) -> ResolveOutcome {
        let Some(topic) = self.state.borrow().topic.clone() else {
            return ResolveOutcome::Empty;
        };
        match self.begin(topic, true) {
            Some(epoch) => ResolveOutcome::Started(epoch),
            None => ResolveOutcome::Unchanged,
        }
    }

    /// Supersedes all in-flight work and returns to idle.
    pub fn shutdown(&self) {
        self.state.send_modify(|state| {
            let epoch = state.epoch.next();
            *state = ExploreState {
                epoch,
                ..ExploreState::default()
            };
        });
        info!("Orchestrator shut down");
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ExploreState> {
        self.state.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ExploreState {
        self.state.borrow().clone()
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.state.borrow().epoch
    }

    /// Waits until every task of `epoch` has settled, or the epoch has been
    /// superseded, and returns the state at that point.
    pub async fn settled(&self, epoch: Epoch) -> ExploreState {
        let mut rx = self.state.subscribe();
        let result = rx
            .wait_for(|state| state.epoch != epoch || state.is_settled())
            .await
            .map(|state| state.clone());
        result.unwrap_or_else(|_| self.snapshot())
    }

    // ========================================================================
    // Epoch management
    // ========================================================================

    fn begin(&self, topic: Topic, force: bool) -> Option<Epoch> {
        let mut started = None;
        self.state.send_if_modified(|state| {
            if !force && state.topic.as_ref() == Some(&topic) {
                return false;
            }
            let epoch = state.epoch.next();
            *state = ExploreState::started(epoch, topic.clone());
            started = Some(epoch);
            true
        });

        let Some(epoch) = started else {
            debug!(topic = %topic, "Topic already active");
            return None;
        };

        info!(topic = %topic, epoch = epoch.value(), "Resolving topic");
        self.context.history().record(&topic);
        self.spawn_tasks(epoch, topic);
        Some(epoch)
    }

    fn spawn_tasks(&self, epoch: Epoch, topic: Topic) {
        let started_at = Instant::now();

        tokio::spawn(run_art(
            Arc::clone(&self.context),
            Arc::clone(&self.state),
            epoch,
            topic.clone(),
        ));
        tokio::spawn(run_image(
            Arc::clone(&self.context),
            Arc::clone(&self.state),
            epoch,
            topic.clone(),
        ));
        tokio::spawn(run_definition(
            Arc::clone(&self.context),
            Arc::clone(&self.state),
            epoch,
            topic,
            started_at,
        ));
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Applies `mutate` if `epoch` is still current. Returns false otherwise.
fn apply_if_current<F>(state: &watch::Sender<ExploreState>, epoch: Epoch, mutate: F) -> bool
where
    F: FnOnce(&mut ExploreState),
{
    state.send_if_modified(|current| {
        if current.epoch != epoch {
            return false;
        }
        mutate(current);
        true
    })
}

async fn run_art(
    context: Arc<SessionContext>,
    state: Arc<watch::Sender<ExploreState>>,
    epoch: Epoch,
    topic: Topic,
) {
    let (art, is_fallback) = context.art_or_fallback(&topic).await;
    let applied = apply_if_current(&state, epoch, |current| {
        current.art = Some(art);
        current.art_is_fallback = is_fallback;
        current.art_loading = false;
    });
    if !applied {
        debug!(topic = %topic, epoch = epoch.value(), "Discarding stale art");
    }
}

async fn run_image(
    context: Arc<SessionContext>,
    state: Arc<watch::Sender<ExploreState>>,
    epoch: Epoch,
    topic: Topic,
) {
    let image = context.image_or_absent(&topic).await;
    let applied = apply_if_current(&state, epoch, |current| {
        current.image = image;
        current.image_loading = false;
    });
    if !applied {
        debug!(topic = %topic, epoch = epoch.value(), "Discarding stale image");
    }
}

async fn run_definition(
    context: Arc<SessionContext>,
    state: Arc<watch::Sender<ExploreState>>,
    epoch: Epoch,
    topic: Topic,
    started_at: Instant,
) {
    let mut stream = match context.open_definition(&topic).await {
        Ok(stream) => stream,
        Err(error) => {
            fail_definition(&state, epoch, &topic, &error, started_at);
            return;
        }
    };

    let mut chunks = 0usize;
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                if !apply_if_current(&state, epoch, |current| current.content.push_str(&chunk)) {
                    debug!(topic = %topic, epoch = epoch.value(), "Definition superseded, dropping stream");
                    return;
                }
                chunks += 1;
            }
            Err(error) => {
                fail_definition(&state, epoch, &topic, &error, started_at);
                return;
            }
        }
    }

    let elapsed = started_at.elapsed();
    let applied = apply_if_current(&state, epoch, |current| {
        current.definition_loading = false;
        current.elapsed = Some(elapsed);
    });
    if applied {
        info!(
            topic = %topic,
            chunks,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Definition complete"
        );
    }
}

fn fail_definition(
    state: &watch::Sender<ExploreState>,
    epoch: Epoch,
    topic: &Topic,
    error: &ProviderError,
    started_at: Instant,
) {
    warn!(topic = %topic, kind = ?error.kind, error = %error, "Definition generation failed");
    let elapsed = started_at.elapsed();
    apply_if_current(state, epoch, |current| {
        current.content.clear();
        current.error = Some(error.user_message(topic));
        current.error_kind = Some(error.kind);
        current.definition_loading = false;
        current.elapsed = Some(elapsed);
    });
}
