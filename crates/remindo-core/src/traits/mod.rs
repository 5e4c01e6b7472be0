// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits.
//!
//! The entity stores are implemented by the HTTP gateways in
//! `remindo-backend` and by the in-memory doubles in `remindo-test-utils`.
//! [`ChatSurface`] is implemented by the Telegram transport. [`Clock`]
//! lets tests pin the current time.

pub mod chat;
pub mod clock;
pub mod storage;

pub use chat::ChatSurface;
pub use clock::{Clock, SystemClock};
pub use storage::{AlarmStore, NoteStore, ThemeStore, UserStore};
