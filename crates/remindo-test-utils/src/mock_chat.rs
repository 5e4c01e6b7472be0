// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat surface for deterministic testing.
//!
//! `MockChat` implements `ChatSurface` and captures every sent reply and
//! every deletion for assertion in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use remindo_core::{ChatSurface, MessageRef, RemindoError, Reply};

/// A reply captured by [`MockChat`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentReply {
    pub chat_id: i64,
    pub reply: Reply,
    pub message_id: i32,
}

impl SentReply {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            chat_id: self.chat_id,
            message_id: self.message_id,
        }
    }
}

/// A mock chat for testing.
///
/// Message ids are handed out in increasing order starting at 100, so they
/// never collide with the small inbound ids tests usually pick.
pub struct MockChat {
    sent: Arc<Mutex<Vec<SentReply>>>,
    deleted: Arc<Mutex<Vec<MessageRef>>>,
    next_id: AtomicI32,
    fail_sends: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MockChat {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicI32::new(100),
            fail_sends: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Every reply sent so far, oldest first.
    pub async fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }

    pub async fn last_sent(&self) -> Option<SentReply> {
        self.sent.lock().await.last().cloned()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
        self.deleted.lock().await.clear();
    }

    /// Makes every subsequent `send` fail until switched back.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `delete` fail until switched back.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSurface for MockChat {
    async fn send(&self, chat_id: i64, reply: Reply) -> Result<MessageRef, RemindoError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(RemindoError::Channel {
                message: format!("mock send to {chat_id} rejected"),
                source: None,
            });
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(SentReply {
            chat_id,
            reply,
            message_id,
        });
        Ok(MessageRef {
            chat_id,
            message_id,
        })
    }

    async fn delete(&self, message: MessageRef) -> Result<(), RemindoError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RemindoError::Channel {
                message: format!("mock delete of {} rejected", message.message_id),
                source: None,
            });
        }
        self.deleted.lock().await.push(message);
        Ok(())
    }
}
