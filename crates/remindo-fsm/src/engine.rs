// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Applies routed transitions: state store writes, outbound replies, and
//! prompt hygiene.
//!
//! Every step that shows something sends exactly one new message, then
//! deletes the previous prompt and the message that carried the trigger. A
//! failed deletion is logged and never fails the step.

use std::sync::Arc;

use remindo_core::{ChatSurface, Clock, MessageRef, RemindoError, Reply};
use tracing::{debug, warn};

use crate::context::{Ctx, Stores};
use crate::flows::Transition;
use crate::middleware::{Logged, SafetyNet};
use crate::router;
use crate::state::{Conversation, StateStore};
use crate::trigger::Incoming;
use crate::views;

pub struct Engine {
    stores: Stores,
    chat: Arc<dyn ChatSurface>,
    states: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(
        stores: Stores,
        chat: Arc<dyn ChatSurface>,
        states: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            stores,
            chat,
            states,
            clock,
        }
    }

    /// Wraps the engine in the logging and safety-net middleware.
    pub fn layered(self) -> SafetyNet<Logged<Engine>> {
        let chat = self.chat.clone();
        let states = self.states.clone();
        SafetyNet::new(Logged::new(self, states.clone()), chat, states)
    }

    /// Handles one inbound event end to end.
    pub async fn handle(&self, incoming: &Incoming) -> Result<(), RemindoError> {
        let conversation = self.states.get(incoming.sender.user_id).await;
        let ctx = Ctx {
            stores: &self.stores,
            clock: self.clock.as_ref(),
            sender: &incoming.sender,
        };
        let transition = router::route(
            &ctx,
            conversation.as_ref().map(|c| &c.flow),
            &incoming.trigger,
        )
        .await?;
        self.apply(incoming, conversation, transition).await
    }

    async fn apply(
        &self,
        incoming: &Incoming,
        conversation: Option<Conversation>,
        transition: Transition,
    ) -> Result<(), RemindoError> {
        let user_id = incoming.sender.user_id;
        let previous = conversation.as_ref().and_then(|c| c.last_prompt);
        let inbound = incoming.message_ref();

        match transition {
            Transition::Ignore => {
                debug!(user_id, trigger = %incoming.trigger, "trigger ignored in current state");
            }
            Transition::Advance(flow, reply) => {
                let prompt = self.send(incoming, reply).await?;
                self.states
                    .set(
                        user_id,
                        Conversation {
                            flow,
                            last_prompt: Some(prompt),
                        },
                    )
                    .await;
                self.tidy(&[previous, inbound], prompt).await;
            }
            Transition::Reprompt(reply) => {
                let prompt = self.send(incoming, reply).await?;
                if let Some(conversation) = conversation {
                    self.states
                        .set(
                            user_id,
                            Conversation {
                                last_prompt: Some(prompt),
                                ..conversation
                            },
                        )
                        .await;
                }
                self.tidy(&[previous, inbound], prompt).await;
            }
            Transition::Finish(reply) => {
                self.states.clear(user_id).await;
                let shown = self.send(incoming, reply).await?;
                self.tidy(&[previous, inbound], shown).await;
            }
            Transition::Fail { detail } => {
                warn!(user_id, detail = %detail, "flow aborted");
                self.states.clear(user_id).await;
                let shown = self.send(incoming, views::failure()).await?;
                self.tidy(&[previous, inbound], shown).await;
            }
            Transition::Detached(reply) => {
                if let Some(reply) = reply {
                    self.send(incoming, reply).await?;
                }
                if let Some(message) = inbound {
                    self.delete(message).await;
                }
            }
        }
        Ok(())
    }

    async fn send(&self, incoming: &Incoming, reply: Reply) -> Result<MessageRef, RemindoError> {
        self.chat.send(incoming.chat_id, reply).await
    }

    /// Deletes each distinct stale message except `keep`.
    async fn tidy(&self, stale: &[Option<MessageRef>], keep: MessageRef) {
        let mut seen: Vec<MessageRef> = Vec::with_capacity(stale.len());
        for message in stale.iter().flatten() {
            if *message == keep || seen.contains(message) {
                continue;
            }
            seen.push(*message);
            self.delete(*message).await;
        }
    }

    async fn delete(&self, message: MessageRef) {
        if let Err(err) = self.chat.delete(message).await {
            warn!(
                chat_id = message.chat_id,
                message_id = message.message_id,
                error = %err,
                "failed to delete stale message"
            );
        }
    }
}
