// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation state.
//!
//! Every flow is one [`FlowState`] variant carrying its stage and the typed
//! draft accumulated so far, so a state outside a flow's graph cannot be
//! represented. [`StateStore`] owns the `user -> Conversation` table; the
//! engine only reads and writes through it.

use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use remindo_core::MessageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateThemeStage {
    WriteName,
    WriteDescription,
    Accept,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeDraft {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Entity a change flow edits. The secondary field is the description for
/// themes and alarms and the body text for notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeTarget {
    Theme(String),
    Note(String),
    Alarm(String),
}

impl ChangeTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeTarget::Theme(_) => "theme",
            ChangeTarget::Note(_) => "note",
            ChangeTarget::Alarm(_) => "alarm",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChangeTarget::Theme(id) | ChangeTarget::Note(id) | ChangeTarget::Alarm(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStage {
    /// Choosing a field, saving, or leaving.
    Menu,
    WriteName,
    WriteSecondary,
}

/// Fields edited so far in a change flow. `None` means untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edits {
    pub name: Option<String>,
    pub secondary: Option<String>,
}

impl Edits {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.secondary.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Theme { id: String },
    Note { id: String, theme_id: String },
    Alarm { id: String, note_id: String },
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Theme { .. } => "theme",
            DeleteTarget::Note { .. } => "note",
            DeleteTarget::Alarm { .. } => "alarm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateNoteStage {
    WriteName,
    WriteText,
    Accept,
    Attachments,
    Checklist,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub name: Option<String>,
    pub text: Option<String>,
    pub attachments: Vec<String>,
    pub checklist: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAlarmStage {
    WriteName,
    WriteDescription,
    PickDate,
    WriteTime,
    ChooseRepeatable,
    WriteInterval,
    Accept,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub fire_at: Option<NaiveDateTime>,
    /// Seconds between firings; set only for repeating alarms.
    pub repeat_interval: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStage {
    PickDate,
    WriteTime,
    Confirm,
}

/// The active flow and its accumulated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    CreateTheme {
        stage: CreateThemeStage,
        draft: ThemeDraft,
    },
    Change {
        target: ChangeTarget,
        stage: ChangeStage,
        edits: Edits,
    },
    Delete {
        target: DeleteTarget,
    },
    CreateNote {
        theme_id: String,
        stage: CreateNoteStage,
        draft: NoteDraft,
    },
    CreateAlarm {
        note_id: String,
        stage: CreateAlarmStage,
        draft: AlarmDraft,
    },
    SetAlarmTime {
        alarm_id: String,
        stage: ScheduleStage,
        date: Option<NaiveDate>,
        fire_at: Option<NaiveDateTime>,
    },
    /// Waiting for the interval; a valid one is saved straight away.
    SetRepeatInterval {
        alarm_id: String,
    },
}

impl FlowState {
    /// Dotted `flow.stage` tag used in logs.
    pub fn name(&self) -> String {
        match self {
            FlowState::CreateTheme { stage, .. } => {
                let stage = match stage {
                    CreateThemeStage::WriteName => "write_name",
                    CreateThemeStage::WriteDescription => "write_description",
                    CreateThemeStage::Accept => "accept",
                };
                format!("create_theme.{stage}")
            }
            FlowState::Change { target, stage, .. } => {
                let stage = match stage {
                    ChangeStage::Menu => "menu",
                    ChangeStage::WriteName => "write_name",
                    ChangeStage::WriteSecondary => "write_secondary",
                };
                format!("change_{}.{stage}", target.kind())
            }
            FlowState::Delete { target } => format!("delete_{}.confirm", target.kind()),
            FlowState::CreateNote { stage, .. } => {
                let stage = match stage {
                    CreateNoteStage::WriteName => "write_name",
                    CreateNoteStage::WriteText => "write_text",
                    CreateNoteStage::Accept => "accept",
                    CreateNoteStage::Attachments => "attachments",
                    CreateNoteStage::Checklist => "checklist",
                };
                format!("create_note.{stage}")
            }
            FlowState::CreateAlarm { stage, .. } => {
                let stage = match stage {
                    CreateAlarmStage::WriteName => "write_name",
                    CreateAlarmStage::WriteDescription => "write_description",
                    CreateAlarmStage::PickDate => "pick_date",
                    CreateAlarmStage::WriteTime => "write_time",
                    CreateAlarmStage::ChooseRepeatable => "choose_repeatable",
                    CreateAlarmStage::WriteInterval => "write_interval",
                    CreateAlarmStage::Accept => "accept",
                };
                format!("create_alarm.{stage}")
            }
            FlowState::SetAlarmTime { stage, .. } => {
                let stage = match stage {
                    ScheduleStage::PickDate => "pick_date",
                    ScheduleStage::WriteTime => "write_time",
                    ScheduleStage::Confirm => "confirm",
                };
                format!("set_alarm_time.{stage}")
            }
            FlowState::SetRepeatInterval { .. } => "set_repeat_interval.write_interval".to_string(),
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Stored per-user conversation: the flow plus the prompt currently on
/// screen, which the next step deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub flow: FlowState,
    pub last_prompt: Option<MessageRef>,
}

/// Per-user conversation table.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Option<Conversation>;

    async fn set(&self, user_id: i64, conversation: Conversation);

    async fn clear(&self, user_id: i64);
}

/// Process-local [`StateStore`]. Conversations do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    conversations: DashMap<i64, Conversation>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, user_id: i64) -> Option<Conversation> {
        self.conversations.get(&user_id).map(|c| c.value().clone())
    }

    async fn set(&self, user_id: i64, conversation: Conversation) {
        self.conversations.insert(user_id, conversation);
    }

    async fn clear(&self, user_id: i64) {
        self.conversations.remove(&user_id);
    }
}
