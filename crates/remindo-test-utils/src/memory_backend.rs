// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of every entity store.
//!
//! Behaves like the HTTP backend where the engine can observe it: list
//! queries over an empty relation report `NotFound`, deletes cascade to
//! children, postponing a one-shot alarm is rejected, and duplicate users
//! conflict. Every call is recorded, and the next call to a given operation
//! can be made to fail.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use remindo_core::models::{
    Alarm, AlarmStatus, AlarmTimes, AlarmToCreate, FieldPatch, Note, NoteTimes, NoteToCreate,
    Theme, ThemeToCreate, User,
};
use remindo_core::{
    AlarmStore, Clock, NoteStore, StorageError, SystemClock, ThemeStore, UserStore,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

/// One recorded store call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// `<entity>.<operation>`, e.g. `theme.patch`.
    pub op: String,
    /// The id the call addressed, if any.
    pub target: Option<String>,
    /// The body the call carried, if any.
    pub body: Option<Value>,
}

impl RecordedCall {
    /// Whether the call mutates backend state.
    pub fn is_write(&self) -> bool {
        !self.op.contains(".get")
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    themes: BTreeMap<String, Theme>,
    notes: BTreeMap<String, Note>,
    alarms: BTreeMap<String, Alarm>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    failures: HashMap<String, VecDeque<StorageError>>,
}

impl Tables {
    fn record(&mut self, op: &str, target: Option<&str>, body: Option<Value>) -> Result<(), StorageError> {
        self.calls.push(RecordedCall {
            op: op.to_string(),
            target: target.map(str::to_string),
            body,
        });
        match self.failures.get_mut(op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn cascade_note(&mut self, note_id: &str) {
        self.notes.remove(note_id);
        self.alarms.retain(|_, a| a.links.parent_id != note_id);
    }

    fn cascade_theme(&mut self, theme_id: &str) {
        self.themes.remove(theme_id);
        let notes: Vec<String> = self
            .notes
            .values()
            .filter(|n| n.links.theme_id == theme_id)
            .map(|n| n.id.clone())
            .collect();
        for note in notes {
            self.cascade_note(&note);
        }
    }
}

/// All four entity stores over shared in-memory tables.
#[derive(Clone)]
pub struct MemoryBackend {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Backend whose creation times and due checks follow `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    pub async fn insert_user(&self, user: User) {
        let mut t = self.tables.lock().await;
        t.users.insert(user.telegram_id.clone(), user);
    }

    pub async fn insert_theme(&self, theme: Theme) {
        let mut t = self.tables.lock().await;
        t.themes.insert(theme.id.clone(), theme);
    }

    pub async fn insert_note(&self, note: Note) {
        let mut t = self.tables.lock().await;
        t.notes.insert(note.id.clone(), note);
    }

    pub async fn insert_alarm(&self, alarm: Alarm) {
        let mut t = self.tables.lock().await;
        t.alarms.insert(alarm.id.clone(), alarm);
    }

    /// Makes the next call to `op` (e.g. `"theme.create"`) fail with `err`.
    /// Queued failures are consumed in order.
    pub async fn fail_next(&self, op: &str, err: StorageError) {
        let mut t = self.tables.lock().await;
        t.failures.entry(op.to_string()).or_default().push_back(err);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.tables.lock().await.calls.clone()
    }

    pub async fn calls_to(&self, op: &str) -> Vec<RecordedCall> {
        self.tables
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    pub async fn writes(&self) -> Vec<RecordedCall> {
        self.tables
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.tables.lock().await.calls.clear();
    }

    pub async fn user(&self, telegram_id: &str) -> Option<User> {
        self.tables.lock().await.users.get(telegram_id).cloned()
    }

    pub async fn theme(&self, id: &str) -> Option<Theme> {
        self.tables.lock().await.themes.get(id).cloned()
    }

    pub async fn note(&self, id: &str) -> Option<Note> {
        self.tables.lock().await.notes.get(id).cloned()
    }

    pub async fn alarm(&self, id: &str) -> Option<Alarm> {
        self.tables.lock().await.alarms.get(id).cloned()
    }

    pub async fn themes(&self) -> Vec<Theme> {
        self.tables.lock().await.themes.values().cloned().collect()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.tables.lock().await.notes.values().cloned().collect()
    }

    pub async fn alarms(&self) -> Vec<Alarm> {
        self.tables.lock().await.alarms.values().cloned().collect()
    }
}

fn non_empty<T>(items: Vec<T>, entity: &'static str) -> Result<Vec<T>, StorageError> {
    if items.is_empty() {
        Err(StorageError::NotFound { entity })
    } else {
        Ok(items)
    }
}

fn to_value<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Applies a dotted-path patch to an entity through its JSON form.
fn apply_patch<T: Serialize + DeserializeOwned>(
    entity: &T,
    fields: &FieldPatch,
) -> Result<T, StorageError> {
    let mut json = serde_json::to_value(entity).map_err(|e| StorageError::validation(e.to_string()))?;
    for (path, value) in fields {
        let mut cursor = &mut json;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let Value::Object(map) = cursor else {
                return Err(StorageError::validation(format!("`{path}` is not an object path")));
            };
            if segments.peek().is_none() {
                if !map.contains_key(segment) {
                    return Err(StorageError::validation(format!("unknown field `{path}`")));
                }
                map.insert(segment.to_string(), value.clone());
                break;
            }
            cursor = map
                .get_mut(segment)
                .ok_or_else(|| StorageError::validation(format!("unknown field `{path}`")))?;
        }
    }
    serde_json::from_value(json).map_err(|e| StorageError::validation(e.to_string()))
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn get(&self, telegram_id: &str) -> Result<User, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("user.get", Some(telegram_id), None)?;
        t.users
            .get(telegram_id)
            .cloned()
            .ok_or(StorageError::NotFound { entity: "user" })
    }

    async fn create(&self, user: &User) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("user.create", None, to_value(user))?;
        if t.users.contains_key(&user.telegram_id) {
            return Err(StorageError::Duplicate { entity: "user" });
        }
        t.users.insert(user.telegram_id.clone(), user.clone());
        Ok(())
    }

    async fn update_username(&self, telegram_id: &str, new_name: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("user.update_username", Some(telegram_id), Some(Value::from(new_name)))?;
        let user = t
            .users
            .get_mut(telegram_id)
            .ok_or(StorageError::NotFound { entity: "user" })?;
        user.display_name = new_name.to_string();
        Ok(())
    }

    async fn delete(&self, telegram_id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("user.delete", Some(telegram_id), None)?;
        t.users
            .remove(telegram_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound { entity: "user" })
    }
}

#[async_trait]
impl ThemeStore for MemoryBackend {
    async fn get(&self, id: &str) -> Result<Theme, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.get", Some(id), None)?;
        t.themes
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound { entity: "theme" })
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Theme>, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.get_all_by_user", Some(user_id), None)?;
        let themes = t
            .themes
            .values()
            .filter(|th| th.links.user_id == user_id)
            .cloned()
            .collect();
        non_empty(themes, "theme")
    }

    async fn create(&self, theme: &ThemeToCreate) -> Result<String, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.create", None, to_value(theme))?;
        let id = t.fresh_id("theme-");
        t.themes.insert(
            id.clone(),
            Theme {
                id: id.clone(),
                name: theme.name.clone(),
                description: theme.description.clone(),
                links: theme.links.clone(),
            },
        );
        Ok(id)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.patch", Some(id), Some(Value::Object(fields.clone())))?;
        let current = t
            .themes
            .get(id)
            .ok_or(StorageError::NotFound { entity: "theme" })?;
        let updated = apply_patch(current, fields)?;
        t.themes.insert(id.to_string(), updated);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.delete", Some(id), None)?;
        if !t.themes.contains_key(id) {
            return Err(StorageError::NotFound { entity: "theme" });
        }
        t.cascade_theme(id);
        Ok(())
    }

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("theme.delete_all_by_user", Some(user_id), None)?;
        let ids: Vec<String> = t
            .themes
            .values()
            .filter(|th| th.links.user_id == user_id)
            .map(|th| th.id.clone())
            .collect();
        for id in ids {
            t.cascade_theme(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryBackend {
    async fn get(&self, id: &str) -> Result<Note, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.get", Some(id), None)?;
        t.notes
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound { entity: "note" })
    }

    async fn get_all_by_theme(&self, theme_id: &str) -> Result<Vec<Note>, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.get_all_by_theme", Some(theme_id), None)?;
        let notes = t
            .notes
            .values()
            .filter(|n| n.links.theme_id == theme_id)
            .cloned()
            .collect();
        non_empty(notes, "note")
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Note>, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.get_all_by_user", Some(user_id), None)?;
        let notes = t
            .notes
            .values()
            .filter(|n| n.links.user_id == user_id)
            .cloned()
            .collect();
        non_empty(notes, "note")
    }

    async fn create(&self, note: &NoteToCreate) -> Result<String, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.create", None, to_value(note))?;
        let id = t.fresh_id("note-");
        t.notes.insert(
            id.clone(),
            Note {
                id: id.clone(),
                name: note.name.clone(),
                links: note.links.clone(),
                data: note.data.clone(),
                times: NoteTimes {
                    creation_time: self.clock.now(),
                    end_time: None,
                },
            },
        );
        Ok(id)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.patch", Some(id), Some(Value::Object(fields.clone())))?;
        let current = t
            .notes
            .get(id)
            .ok_or(StorageError::NotFound { entity: "note" })?;
        let updated = apply_patch(current, fields)?;
        t.notes.insert(id.to_string(), updated);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.delete", Some(id), None)?;
        if !t.notes.contains_key(id) {
            return Err(StorageError::NotFound { entity: "note" });
        }
        t.cascade_note(id);
        Ok(())
    }

    async fn delete_all_by_theme(&self, theme_id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("note.delete_all_by_theme", Some(theme_id), None)?;
        let ids: Vec<String> = t
            .notes
            .values()
            .filter(|n| n.links.theme_id == theme_id)
            .map(|n| n.id.clone())
            .collect();
        for id in ids {
            t.cascade_note(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl AlarmStore for MemoryBackend {
    async fn get(&self, id: &str) -> Result<Alarm, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.get", Some(id), None)?;
        t.alarms
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound { entity: "alarm" })
    }

    async fn get_all_by_parent(&self, note_id: &str) -> Result<Vec<Alarm>, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.get_all_by_parent", Some(note_id), None)?;
        let alarms = t
            .alarms
            .values()
            .filter(|a| a.links.parent_id == note_id)
            .cloned()
            .collect();
        non_empty(alarms, "alarm")
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Alarm>, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.get_all_by_user", Some(user_id), None)?;
        let alarms = t
            .alarms
            .values()
            .filter(|a| a.links.user_id == user_id)
            .cloned()
            .collect();
        non_empty(alarms, "alarm")
    }

    async fn get_all_ready(&self) -> Result<Vec<Alarm>, StorageError> {
        let now = self.clock.now();
        let mut t = self.tables.lock().await;
        t.record("alarm.get_all_ready", None, None)?;
        let alarms = t
            .alarms
            .values()
            .filter(|a| a.status.is_active() && a.times.next_notion_time <= now)
            .cloned()
            .collect();
        non_empty(alarms, "alarm")
    }

    async fn create(
        &self,
        alarm: &AlarmToCreate,
        next_fire_at: NaiveDateTime,
        repeat_interval: Option<i64>,
    ) -> Result<String, StorageError> {
        let mut t = self.tables.lock().await;
        let body = serde_json::json!({
            "alarm": to_value(alarm),
            "next_notion_time": next_fire_at,
            "repeat_interval": repeat_interval,
        });
        t.record("alarm.create", None, Some(body))?;
        let id = t.fresh_id("alarm-");
        t.alarms.insert(
            id.clone(),
            Alarm {
                id: id.clone(),
                name: alarm.name.clone(),
                description: alarm.description.clone(),
                is_repeatable: alarm.is_repeatable,
                status: AlarmStatus::Queued,
                links: alarm.links.clone(),
                times: AlarmTimes {
                    creation_time: self.clock.now(),
                    next_notion_time: next_fire_at,
                    end_time: None,
                    repeat_interval,
                },
            },
        );
        Ok(id)
    }

    async fn postpone(&self, id: &str) -> Result<NaiveDateTime, StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.postpone", Some(id), None)?;
        let alarm = t
            .alarms
            .get_mut(id)
            .ok_or(StorageError::NotFound { entity: "alarm" })?;
        let interval = match (alarm.is_repeatable, alarm.times.repeat_interval) {
            (true, Some(secs)) if secs > 0 => secs,
            _ => return Err(StorageError::validation("alarm is not repeatable")),
        };
        alarm.times.next_notion_time += Duration::seconds(interval);
        alarm.status = AlarmStatus::Queued;
        Ok(alarm.times.next_notion_time)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.patch", Some(id), Some(Value::Object(fields.clone())))?;
        let current = t
            .alarms
            .get(id)
            .ok_or(StorageError::NotFound { entity: "alarm" })?;
        let updated = apply_patch(current, fields)?;
        t.alarms.insert(id.to_string(), updated);
        Ok(())
    }

    async fn update_status(&self, id: &str, status: AlarmStatus) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.update_status", Some(id), Some(Value::from(status.to_string())))?;
        let alarm = t
            .alarms
            .get_mut(id)
            .ok_or(StorageError::NotFound { entity: "alarm" })?;
        alarm.status = status;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.delete", Some(id), None)?;
        t.alarms
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::NotFound { entity: "alarm" })
    }

    async fn delete_all_by_parent(&self, note_id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.delete_all_by_parent", Some(note_id), None)?;
        t.alarms.retain(|_, a| a.links.parent_id != note_id);
        Ok(())
    }

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError> {
        let mut t = self.tables.lock().await;
        t.record("alarm.delete_all_by_user", Some(user_id), None)?;
        t.alarms.retain(|_, a| a.links.user_id != user_id);
        Ok(())
    }
}
