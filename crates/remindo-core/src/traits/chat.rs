// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound chat surface.

use async_trait::async_trait;

use crate::error::RemindoError;
use crate::types::{MessageRef, Reply};

/// Sends and removes bot messages in a chat.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Sends a reply and returns a reference to the delivered message.
    async fn send(&self, chat_id: i64, reply: Reply) -> Result<MessageRef, RemindoError>;

    /// Deletes a previously delivered message.
    async fn delete(&self, message: MessageRef) -> Result<(), RemindoError>;
}
