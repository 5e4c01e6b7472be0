// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline-button callback payloads.
//!
//! Payloads keep the `<action-prefix>_<entity-id>` byte format. Decoding
//! matches the full known prefix and takes the whole remainder as the id, so
//! identifiers that themselves contain `_` survive a round trip.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    MainMenu,
    OpenAllThemes,
    CreateTheme,
    OpenTheme(String),
    CreateNote(String),
    OpenNote(String),
    CreateAlarm(String),
    OpenAlarm(String),
    ChangeTheme(String),
    ChangeNote(String),
    ChangeAlarm(String),
    DeleteTheme(String),
    DeleteNote(String),
    DeleteAlarm(String),
    SetAlarmTime(String),
    ToggleRepeatable(String),
    FinishAlarm(String),
    SetAlarmNotRepeatable(String),
    CancelFsm,
    Save,
    ChangeFsmUserData,
    ChangeName,
    ChangeDescription,
    Cancel,
    Yes,
    No,
    Done,
    AddAttachments,
    AddCheckpoint,
    CloseMessage,
    CalendarDay(NaiveDate),
    CalendarNav { year: i32, month: u32 },
    CalendarIgnore,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown callback payload `{0}`")]
pub struct UnknownAction(pub String);

const EXACT: &[(&str, Action)] = &[
    ("main_menu", Action::MainMenu),
    ("open_all_themes", Action::OpenAllThemes),
    ("create_theme", Action::CreateTheme),
    ("cancel_fsm", Action::CancelFsm),
    ("save", Action::Save),
    ("change_fsm_user_data", Action::ChangeFsmUserData),
    ("change_name", Action::ChangeName),
    ("change_description", Action::ChangeDescription),
    ("cancel", Action::Cancel),
    ("yes", Action::Yes),
    ("no", Action::No),
    ("done", Action::Done),
    ("add_attachments", Action::AddAttachments),
    ("add_checkpoint", Action::AddCheckpoint),
    ("close_message", Action::CloseMessage),
    ("cal_ignore", Action::CalendarIgnore),
];

// No prefix here is a prefix of another one.
const WITH_ID: &[(&str, fn(String) -> Action)] = &[
    ("open_theme_", Action::OpenTheme),
    ("create_note_", Action::CreateNote),
    ("open_note_", Action::OpenNote),
    ("create_alarm_", Action::CreateAlarm),
    ("open_alarm_", Action::OpenAlarm),
    ("change_theme_", Action::ChangeTheme),
    ("change_note_", Action::ChangeNote),
    ("change_alarm_", Action::ChangeAlarm),
    ("delete_theme_", Action::DeleteTheme),
    ("delete_note_", Action::DeleteNote),
    ("delete_alarm_", Action::DeleteAlarm),
    ("set_new_alarm_time_", Action::SetAlarmTime),
    ("toggle_repeatable_", Action::ToggleRepeatable),
    ("finish_alarm_", Action::FinishAlarm),
    ("set_alarm_not_repeatable_", Action::SetAlarmNotRepeatable),
];

const CAL_DAY: &str = "cal_day_";
const CAL_NAV: &str = "cal_nav_";

impl Action {
    /// The entity id the action is scoped to, if any.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Self::OpenTheme(id)
            | Self::CreateNote(id)
            | Self::OpenNote(id)
            | Self::CreateAlarm(id)
            | Self::OpenAlarm(id)
            | Self::ChangeTheme(id)
            | Self::ChangeNote(id)
            | Self::ChangeAlarm(id)
            | Self::DeleteTheme(id)
            | Self::DeleteNote(id)
            | Self::DeleteAlarm(id)
            | Self::SetAlarmTime(id)
            | Self::ToggleRepeatable(id)
            | Self::FinishAlarm(id)
            | Self::SetAlarmNotRepeatable(id) => Some(id),
            _ => None,
        }
    }

    fn prefix(&self) -> Option<&'static str> {
        Some(match self {
            Self::OpenTheme(_) => "open_theme_",
            Self::CreateNote(_) => "create_note_",
            Self::OpenNote(_) => "open_note_",
            Self::CreateAlarm(_) => "create_alarm_",
            Self::OpenAlarm(_) => "open_alarm_",
            Self::ChangeTheme(_) => "change_theme_",
            Self::ChangeNote(_) => "change_note_",
            Self::ChangeAlarm(_) => "change_alarm_",
            Self::DeleteTheme(_) => "delete_theme_",
            Self::DeleteNote(_) => "delete_note_",
            Self::DeleteAlarm(_) => "delete_alarm_",
            Self::SetAlarmTime(_) => "set_new_alarm_time_",
            Self::ToggleRepeatable(_) => "toggle_repeatable_",
            Self::FinishAlarm(_) => "finish_alarm_",
            Self::SetAlarmNotRepeatable(_) => "set_alarm_not_repeatable_",
            _ => return None,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(prefix), Some(id)) = (self.prefix(), self.entity_id()) {
            return write!(f, "{prefix}{id}");
        }
        match self {
            Self::CalendarDay(date) => write!(f, "{CAL_DAY}{}", date.format("%Y-%m-%d")),
            Self::CalendarNav { year, month } => write!(f, "{CAL_NAV}{year:04}-{month:02}"),
            other => {
                let payload = EXACT
                    .iter()
                    .find(|(_, action)| action == other)
                    .map(|(payload, _)| *payload)
                    .ok_or(fmt::Error)?;
                f.write_str(payload)
            }
        }
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, action)) = EXACT.iter().find(|(payload, _)| *payload == s) {
            return Ok(action.clone());
        }
        for (prefix, build) in WITH_ID {
            if let Some(id) = s.strip_prefix(prefix)
                && !id.is_empty()
            {
                return Ok(build(id.to_string()));
            }
        }
        if let Some(raw) = s.strip_prefix(CAL_DAY)
            && let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        {
            return Ok(Self::CalendarDay(date));
        }
        if let Some(raw) = s.strip_prefix(CAL_NAV)
            && let Some((year, month)) = raw.split_once('-')
            && let (Ok(year), Ok(month)) = (year.parse(), month.parse::<u32>())
            && (1..=12).contains(&month)
        {
            return Ok(Self::CalendarNav { year, month });
        }
        Err(UnknownAction(s.to_string()))
    }
}
