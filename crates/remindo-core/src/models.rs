// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity models as the backend stores and serves them.
//!
//! Entities carry nested `links` / `data` / `times` objects and an `_id`
//! identifier on the wire. Each entity has a `*ToCreate` counterpart without
//! the server-assigned fields.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A partial update: top-level or dotted field paths mapped to new values.
pub type FieldPatch = serde_json::Map<String, serde_json::Value>;

/// Accepted textual timestamp layouts, tried in order.
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a naive backend timestamp, ignoring fractional seconds.
pub fn parse_backend_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let parsed = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    Some(parsed.with_nanosecond(0).unwrap_or(parsed))
}

/// Formats a timestamp the way the backend expects it in query strings.
pub fn format_backend_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A Telegram user as registered in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub telegram_id: String,
    #[serde(rename = "user_name")]
    pub display_name: String,
    #[serde(rename = "lang_code")]
    pub language_code: String,
    #[serde(default)]
    pub timezone_offset: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeLinks {
    pub user_id: String,
}

/// Top-level user-owned grouping of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub links: ThemeLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeToCreate {
    pub name: String,
    pub description: Option<String>,
    pub links: ThemeLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLinks {
    pub user_id: String,
    pub theme_id: String,
}

/// A single checklist entry of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub text: String,
    pub is_finished: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub text: String,
    /// Chat-platform file references.
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
    #[serde(default)]
    pub checkpoints: Option<Vec<Checkpoint>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTimes {
    pub creation_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
}

/// Free text plus optional attachments and checklist, scoped to one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub links: NoteLinks,
    pub data: NoteData,
    pub times: NoteTimes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteToCreate {
    pub name: String,
    pub links: NoteLinks,
    pub data: NoteData,
}

/// Alarm lifecycle as the backend encodes it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AlarmStatus {
    /// Due and not yet delivered.
    #[serde(rename = "READY")]
    #[strum(serialize = "READY")]
    Ready,
    /// Scheduled for a future fire time.
    #[serde(rename = "QUEUE")]
    #[strum(serialize = "QUEUE")]
    Queued,
    /// Delivered and closed.
    #[serde(rename = "FINISH")]
    #[strum(serialize = "FINISH")]
    Finished,
}

impl AlarmStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Ready | Self::Queued)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmLinks {
    pub user_id: String,
    /// The owning note.
    pub parent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTimes {
    pub creation_time: NaiveDateTime,
    pub next_notion_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Seconds between deliveries; present iff the alarm is repeatable.
    #[serde(default)]
    pub repeat_interval: Option<i64>,
}

/// A scheduled, optionally repeating reminder scoped to one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_repeatable: bool,
    pub status: AlarmStatus,
    pub links: AlarmLinks,
    pub times: AlarmTimes,
}

/// Alarm creation body. Fire time and interval travel as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmToCreate {
    pub name: String,
    pub description: Option<String>,
    pub is_repeatable: bool,
    pub links: AlarmLinks,
}
