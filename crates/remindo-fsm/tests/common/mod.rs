// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::NaiveDate;
use remindo_core::{Action, Reply};
use remindo_fsm::{
    Dispatch, Engine, FlowState, Incoming, Logged, MemoryStateStore, SafetyNet, Sender,
    StateStore, Stores, Trigger,
};
use remindo_test_utils::{FixedClock, MemoryBackend, MockChat, fixtures};

pub const USER: i64 = 42;

pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub chat: Arc<MockChat>,
    pub states: Arc<MemoryStateStore>,
    pub clock: Arc<FixedClock>,
    engine: SafetyNet<Logged<Engine>>,
    inbound_ids: AtomicI32,
}

impl Harness {
    /// Engine over an empty backend that already knows the test user, with
    /// the clock at 2026-01-01 09:00.
    pub async fn new() -> Self {
        let clock = Arc::new(FixedClock::at(2026, 1, 1, 9, 0));
        let backend = Arc::new(MemoryBackend::with_clock(clock.clone()));
        backend.insert_user(fixtures::user("42")).await;
        let chat = Arc::new(MockChat::new());
        let states = Arc::new(MemoryStateStore::new());
        let engine = Engine::new(
            Stores::shared(backend.clone()),
            chat.clone(),
            states.clone(),
            clock.clone(),
        )
        .layered();
        Self {
            backend,
            chat,
            states,
            clock,
            engine,
            inbound_ids: AtomicI32::new(1),
        }
    }

    /// Seeds theme `t1` > note `n1` > alarm `a1` (one-shot, Pills).
    pub async fn seeded() -> Self {
        let h = Self::new().await;
        h.backend.insert_theme(fixtures::theme("t1", "42", "Work")).await;
        h.backend.insert_note(fixtures::note("n1", "t1", "42", "Plan")).await;
        h.backend
            .insert_alarm(fixtures::alarm("a1", "n1", "42", "Pills", date(2026, 1, 2, 8, 0)))
            .await;
        h.backend.clear_calls().await;
        h
    }

    async fn dispatch(&self, message_id: Option<i32>, trigger: Trigger) {
        let incoming = Incoming::new(Sender::new(USER), USER, message_id, trigger);
        self.engine
            .dispatch(&incoming)
            .await
            .expect("safety net swallows errors");
    }

    /// Presses a button on the most recent bot message.
    pub async fn press(&self, action: Action) {
        let on = self.chat.last_sent().await.map(|m| m.message_id);
        self.dispatch(on, Trigger::Action(action)).await;
    }

    pub async fn say(&self, text: &str) {
        let id = self.inbound_ids.fetch_add(1, Ordering::SeqCst);
        self.dispatch(Some(id), Trigger::Text(text.to_string())).await;
    }

    pub async fn photo(&self, file_id: &str) {
        let id = self.inbound_ids.fetch_add(1, Ordering::SeqCst);
        self.dispatch(Some(id), Trigger::Photo(file_id.to_string())).await;
    }

    pub async fn start(&self) {
        let id = self.inbound_ids.fetch_add(1, Ordering::SeqCst);
        self.dispatch(Some(id), Trigger::Start).await;
    }

    pub async fn state(&self) -> Option<FlowState> {
        self.states.get(USER).await.map(|c| c.flow)
    }

    pub async fn state_name(&self) -> Option<String> {
        self.state().await.map(|f| f.name())
    }

    pub async fn last_reply(&self) -> Reply {
        self.chat.last_sent().await.expect("a reply was sent").reply
    }

    pub async fn last_text(&self) -> String {
        self.last_reply().await.text
    }

    pub async fn offers(&self, action: &Action) -> bool {
        self.last_reply()
            .await
            .keyboard
            .is_some_and(|kb| kb.contains(action))
    }
}

pub fn date(y: i32, m: u32, d: u32, h: u32, mi: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
