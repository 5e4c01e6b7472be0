// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch middleware.
//!
//! Each layer implements [`Dispatch`] and wraps another one, so cross-cutting
//! behaviour composes around the engine instead of living in every flow.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use remindo_core::{ChatSurface, RemindoError};
use tracing::{debug, error, info, warn};

use crate::engine::Engine;
use crate::state::StateStore;
use crate::trigger::Incoming;
use crate::views;

/// Something that handles inbound events.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, incoming: &Incoming) -> Result<(), RemindoError>;
}

#[async_trait]
impl Dispatch for Engine {
    async fn dispatch(&self, incoming: &Incoming) -> Result<(), RemindoError> {
        self.handle(incoming).await
    }
}

/// Logs entry and exit of every dispatched event.
pub struct Logged<D> {
    inner: D,
    states: Arc<dyn StateStore>,
}

impl<D> Logged<D> {
    pub fn new(inner: D, states: Arc<dyn StateStore>) -> Self {
        Self { inner, states }
    }
}

#[async_trait]
impl<D: Dispatch> Dispatch for Logged<D> {
    async fn dispatch(&self, incoming: &Incoming) -> Result<(), RemindoError> {
        let user_id = incoming.sender.user_id;
        let state = self
            .states
            .get(user_id)
            .await
            .map(|c| c.flow.name())
            .unwrap_or_else(|| "none".to_string());
        info!(user_id, state = %state, trigger = %incoming.trigger, "handling update");

        let started = Instant::now();
        let result = self.inner.dispatch(incoming).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => debug!(user_id, elapsed_ms, "update handled"),
            Err(err) => warn!(user_id, elapsed_ms, error = %err, "update failed"),
        }
        result
    }
}

/// Last line of defence: any error that escaped the flows is logged as
/// critical, the conversation is cleared, and the user gets the generic
/// apology with the main menu.
pub struct SafetyNet<D> {
    inner: D,
    chat: Arc<dyn ChatSurface>,
    states: Arc<dyn StateStore>,
}

impl<D> SafetyNet<D> {
    pub fn new(inner: D, chat: Arc<dyn ChatSurface>, states: Arc<dyn StateStore>) -> Self {
        Self {
            inner,
            chat,
            states,
        }
    }
}

#[async_trait]
impl<D: Dispatch> Dispatch for SafetyNet<D> {
    async fn dispatch(&self, incoming: &Incoming) -> Result<(), RemindoError> {
        let Err(err) = self.inner.dispatch(incoming).await else {
            return Ok(());
        };
        let user_id = incoming.sender.user_id;
        error!(
            severity = "critical",
            user_id,
            trigger = %incoming.trigger,
            error = %err,
            "unhandled fault while dispatching update"
        );
        self.states.clear(user_id).await;
        if let Err(send_err) = self.chat.send(incoming.chat_id, views::failure()).await {
            warn!(user_id, error = %send_err, "could not deliver failure notice");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Conversation, DeleteTarget, FlowState, MemoryStateStore};
    use crate::trigger::{Sender, Trigger};
    use remindo_test_utils::MockChat;
    use tracing_test::traced_test;

    struct Failing;

    #[async_trait]
    impl Dispatch for Failing {
        async fn dispatch(&self, _incoming: &Incoming) -> Result<(), RemindoError> {
            Err(RemindoError::Internal("boom".into()))
        }
    }

    struct Succeeding;

    #[async_trait]
    impl Dispatch for Succeeding {
        async fn dispatch(&self, _incoming: &Incoming) -> Result<(), RemindoError> {
            Ok(())
        }
    }

    fn incoming() -> Incoming {
        Incoming::new(Sender::new(7), 7, Some(1), Trigger::Text("hi".into()))
    }

    #[tokio::test]
    #[traced_test]
    async fn safety_net_apologises_and_clears_state() {
        let chat = Arc::new(MockChat::new());
        let states = Arc::new(MemoryStateStore::new());
        states
            .set(
                7,
                Conversation {
                    flow: FlowState::Delete {
                        target: DeleteTarget::Theme { id: "t1".into() },
                    },
                    last_prompt: None,
                },
            )
            .await;

        let net = SafetyNet::new(Failing, chat.clone(), states.clone());
        net.dispatch(&incoming()).await.unwrap();

        assert!(states.get(7).await.is_none());
        let sent = chat.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply.text, views::FAILURE_TEXT);
        assert!(logs_contain("critical"));
    }

    #[tokio::test]
    async fn safety_net_is_silent_on_success() {
        let chat = Arc::new(MockChat::new());
        let states = Arc::new(MemoryStateStore::new());
        let net = SafetyNet::new(Succeeding, chat.clone(), states);
        net.dispatch(&incoming()).await.unwrap();
        assert_eq!(chat.sent_count().await, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn logged_passes_errors_through() {
        let states = Arc::new(MemoryStateStore::new());
        let logged = Logged::new(Failing, states);
        assert!(logged.dispatch(&incoming()).await.is_err());
        assert!(logs_contain("handling update"));
        assert!(logs_contain("update failed"));
    }
}
