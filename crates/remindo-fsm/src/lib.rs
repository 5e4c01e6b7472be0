// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state machine for Remindo.
//!
//! Inbound events ([`Incoming`]) are routed by the current per-user
//! [`FlowState`] and the trigger kind to a flow step, which returns a
//! [`Transition`]. The [`Engine`] applies it: it updates the [`StateStore`],
//! sends the next prompt, and removes stale prompts. The [`middleware`]
//! layers add uniform logging and the fault safety net.

pub mod calendar;
pub mod context;
pub mod engine;
pub mod flows;
pub mod input;
pub mod middleware;
pub mod router;
pub mod state;
pub mod trigger;
pub mod views;

pub use context::{Ctx, Stores};
pub use engine::Engine;
pub use flows::Transition;
pub use middleware::{Dispatch, Logged, SafetyNet};
pub use state::{Conversation, FlowState, MemoryStateStore, StateStore};
pub use trigger::{Incoming, Sender, Trigger};
