// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Remindo.
//!
//! Deterministic stand-ins for every external collaborator, so engine and
//! job tests run without a backend or a chat platform.
//!
//! # Components
//!
//! - [`MemoryBackend`] - all four entity stores in memory, with a call log and
//!   failure injection
//! - [`MockChat`] - chat surface that captures sent replies and deletions
//! - [`FixedClock`] - settable clock
//! - [`fixtures`] - entity builders

pub mod clock;
pub mod fixtures;
pub mod memory_backend;
pub mod mock_chat;

pub use clock::FixedClock;
pub use memory_backend::{MemoryBackend, RecordedCall};
pub use mock_chat::{MockChat, SentReply};
