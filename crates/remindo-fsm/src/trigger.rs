// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral inbound events.

use std::fmt;

use remindo_core::{Action, MessageRef};

/// Profile of the user behind an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

impl Sender {
    /// Sender carrying only an id.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            first_name: None,
            last_name: None,
            language_code: None,
        }
    }

    /// The id in the form the backend keys users and ownership links by.
    pub fn backend_id(&self) -> String {
        self.user_id.to_string()
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The `/start` command.
    Start,
    /// Free text.
    Text(String),
    /// An image, identified by the platform's file reference.
    Photo(String),
    /// An inline-button press.
    Action(Action),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Start => write!(f, "start"),
            Trigger::Text(_) => write!(f, "text"),
            Trigger::Photo(_) => write!(f, "photo"),
            Trigger::Action(action) => write!(f, "action:{action}"),
        }
    }
}

/// One inbound event as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub sender: Sender,
    pub chat_id: i64,
    /// The message that carried the trigger: the user's own message for
    /// text and photos, the message holding the pressed button for actions.
    pub message_id: Option<i32>,
    pub trigger: Trigger,
}

impl Incoming {
    pub fn new(sender: Sender, chat_id: i64, message_id: Option<i32>, trigger: Trigger) -> Self {
        Self {
            sender,
            chat_id,
            message_id,
            trigger,
        }
    }

    pub fn message_ref(&self) -> Option<MessageRef> {
        self.message_id.map(|message_id| MessageRef {
            chat_id: self.chat_id,
            message_id,
        })
    }
}
