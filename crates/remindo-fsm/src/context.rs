// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators a flow step may call.

use std::sync::Arc;

use chrono::NaiveDate;
use remindo_core::{AlarmStore, Clock, NoteStore, ThemeStore, UserStore};

use crate::trigger::Sender;

/// Handles to the four entity stores.
#[derive(Clone)]
pub struct Stores {
    pub themes: Arc<dyn ThemeStore>,
    pub notes: Arc<dyn NoteStore>,
    pub alarms: Arc<dyn AlarmStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn new(
        themes: Arc<dyn ThemeStore>,
        notes: Arc<dyn NoteStore>,
        alarms: Arc<dyn AlarmStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            themes,
            notes,
            alarms,
            users,
        }
    }

    /// All four stores served by one backend.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: ThemeStore + NoteStore + AlarmStore + UserStore + 'static,
    {
        Self {
            themes: backend.clone(),
            notes: backend.clone(),
            alarms: backend.clone(),
            users: backend,
        }
    }
}

/// Everything one step sees besides its state and trigger.
pub struct Ctx<'a> {
    pub stores: &'a Stores,
    pub clock: &'a dyn Clock,
    pub sender: &'a Sender,
}

impl Ctx<'_> {
    /// Owner id for backend links.
    pub fn user_id(&self) -> String {
        self.sender.backend_id()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }
}
