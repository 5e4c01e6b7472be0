// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity builders for tests.

use chrono::{NaiveDate, NaiveDateTime};
use remindo_core::models::{
    Alarm, AlarmLinks, AlarmStatus, AlarmTimes, Note, NoteData, NoteLinks, NoteTimes, Theme,
    ThemeLinks, User,
};

/// 2026-01-01 09:00, the creation time every fixture carries.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or_default()
}

pub fn user(telegram_id: &str) -> User {
    User {
        telegram_id: telegram_id.to_string(),
        display_name: format!("user{telegram_id}"),
        language_code: "ru".to_string(),
        timezone_offset: 0,
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

pub fn theme(id: &str, user_id: &str, name: &str) -> Theme {
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        links: ThemeLinks {
            user_id: user_id.to_string(),
        },
    }
}

pub fn note(id: &str, theme_id: &str, user_id: &str, name: &str) -> Note {
    Note {
        id: id.to_string(),
        name: name.to_string(),
        links: NoteLinks {
            user_id: user_id.to_string(),
            theme_id: theme_id.to_string(),
        },
        data: NoteData {
            text: format!("{name} text"),
            attachments: None,
            checkpoints: None,
        },
        times: NoteTimes {
            creation_time: epoch(),
            end_time: None,
        },
    }
}

/// A queued, one-shot alarm firing at `next`.
pub fn alarm(id: &str, note_id: &str, user_id: &str, name: &str, next: NaiveDateTime) -> Alarm {
    Alarm {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        is_repeatable: false,
        status: AlarmStatus::Queued,
        links: AlarmLinks {
            user_id: user_id.to_string(),
            parent_id: note_id.to_string(),
        },
        times: AlarmTimes {
            creation_time: epoch(),
            next_notion_time: next,
            end_time: None,
            repeat_interval: None,
        },
    }
}

/// Same as [`alarm`] but repeating every `interval_secs`.
pub fn repeating_alarm(
    id: &str,
    note_id: &str,
    user_id: &str,
    name: &str,
    next: NaiveDateTime,
    interval_secs: i64,
) -> Alarm {
    let mut alarm = alarm(id, note_id, user_id, name, next);
    alarm.is_repeatable = true;
    alarm.times.repeat_interval = Some(interval_secs);
    alarm
}
