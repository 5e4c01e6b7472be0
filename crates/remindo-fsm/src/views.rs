// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu texts and keyboards.

use chrono::{NaiveDate, NaiveDateTime};
use remindo_core::models::{Alarm, Note, Theme};
use remindo_core::{Action, Button, Keyboard, Reply};

use crate::calendar;
use crate::state::{AlarmDraft, ChangeTarget, Edits, NoteDraft, ThemeDraft};

pub const FAILURE_TEXT: &str = "Что-то пошло не так, попробуйте позже";

const MAIN_MENU_TEXT: &str = "Главное меню. Здесь можно вести темы, заметки и напоминания";

pub fn fire_time(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%y %H:%M").to_string()
}

fn cancel_row() -> Vec<Button> {
    vec![Button::new("Вернуться в меню", Action::CancelFsm)]
}

fn main_menu_keyboard() -> Keyboard {
    Keyboard::new()
        .button("Открыть список тем", Action::OpenAllThemes)
        .button("Создать новую тему", Action::CreateTheme)
}

pub fn main_menu() -> Reply {
    Reply::with_keyboard(MAIN_MENU_TEXT, main_menu_keyboard())
}

/// Generic apology with a way back to the main menu.
pub fn failure() -> Reply {
    Reply::with_keyboard(FAILURE_TEXT, main_menu_keyboard())
}

pub fn themes_list(themes: &[Theme]) -> Reply {
    let mut kb = Keyboard::new();
    for theme in themes {
        kb = kb.button(&theme.name, Action::OpenTheme(theme.id.clone()));
    }
    let kb = kb
        .button("Создать новую тему", Action::CreateTheme)
        .button("Назад в меню", Action::MainMenu);
    let text = if themes.is_empty() {
        "У вас пока нет тем, создайте новую"
    } else {
        "Ваши темы"
    };
    Reply::with_keyboard(text, kb)
}

pub fn theme_menu(theme: &Theme, notes: &[Note]) -> Reply {
    let mut kb = Keyboard::new();
    for note in notes {
        kb = kb.button(&note.name, Action::OpenNote(note.id.clone()));
    }
    let kb = kb
        .button("Создать новую заметку", Action::CreateNote(theme.id.clone()))
        .button("Изменить тему", Action::ChangeTheme(theme.id.clone()))
        .button("Удалить тему", Action::DeleteTheme(theme.id.clone()))
        .button("Назад к списку тем", Action::OpenAllThemes);

    let mut text = format!("Тема: {}", theme.name);
    if let Some(description) = &theme.description {
        text.push_str(&format!("\nОписание: {description}"));
    }
    if notes.is_empty() {
        text.push_str("\n\nЗаметок пока нет, создайте новую");
    }
    Reply::with_keyboard(text, kb)
}

pub fn note_menu(note: &Note, alarms: &[Alarm]) -> Reply {
    let mut kb = Keyboard::new();
    for alarm in alarms {
        kb = kb.button(&alarm.name, Action::OpenAlarm(alarm.id.clone()));
    }
    let kb = kb
        .button("Создать новое напоминание", Action::CreateAlarm(note.id.clone()))
        .button("Изменить заметку", Action::ChangeNote(note.id.clone()))
        .button("Удалить текущую заметку", Action::DeleteNote(note.id.clone()))
        .button(
            "Назад к списку заметок",
            Action::OpenTheme(note.links.theme_id.clone()),
        );

    let mut text = format!("{}\n\n{}", note.name, note.data.text);
    if let Some(checkpoints) = note.data.checkpoints.as_deref().filter(|c| !c.is_empty()) {
        text.push_str("\n\nЧеклист:");
        for checkpoint in checkpoints {
            let mark = if checkpoint.is_finished { "x" } else { " " };
            text.push_str(&format!("\n[{mark}] {}", checkpoint.text));
        }
    }
    if let Some(attachments) = note.data.attachments.as_deref().filter(|a| !a.is_empty()) {
        text.push_str(&format!("\n\nВложений: {}", attachments.len()));
    }
    Reply::with_keyboard(text, kb)
}

pub fn alarm_menu(alarm: &Alarm) -> Reply {
    let id = &alarm.id;
    let toggle_label = if alarm.is_repeatable {
        "Сделать не повторяющимся"
    } else {
        "Сделать повторяющимся"
    };
    let kb = Keyboard::new()
        .button("Изменить напоминание", Action::ChangeAlarm(id.clone()))
        .button("Установить новое время", Action::SetAlarmTime(id.clone()))
        .button(toggle_label, Action::ToggleRepeatable(id.clone()))
        .button("Удалить напоминание", Action::DeleteAlarm(id.clone()))
        .button("Назад к заметке", Action::OpenNote(alarm.links.parent_id.clone()));

    let activity = if alarm.status.is_active() {
        "активно"
    } else {
        "не активно"
    };
    let mut text = alarm.name.clone();
    if let Some(description) = &alarm.description {
        text.push_str(&format!("\n\n{description}"));
    }
    text.push_str(&format!(
        "\n\nСейчас напоминание {activity}\nСледующее напоминание будет: {}",
        fire_time(&alarm.times.next_notion_time)
    ));
    match (alarm.is_repeatable, alarm.times.repeat_interval) {
        (true, Some(secs)) => text.push_str(&format!(
            "\nНапоминание повторяющееся\nБудет повторяться каждые {} мин.",
            secs / 60
        )),
        (true, None) => text.push_str("\nНапоминание повторяющееся"),
        (false, _) => text.push_str("\nНапоминание не повторяющееся"),
    }
    Reply::with_keyboard(text, kb)
}

/// The message the reminder job delivers.
pub fn notification(alarm: &Alarm) -> Reply {
    let id = &alarm.id;
    let mut kb = Keyboard::new().button("Завершить", Action::FinishAlarm(id.clone()));
    if alarm.is_repeatable {
        kb = kb.button(
            "Больше не повторять",
            Action::SetAlarmNotRepeatable(id.clone()),
        );
    }
    let kb = kb
        .button("Открыть", Action::OpenAlarm(id.clone()))
        .button("Закрыть", Action::CloseMessage);

    let text = match &alarm.description {
        Some(description) => format!("{}:\n{description}", alarm.name),
        None => alarm.name.clone(),
    };
    Reply::with_keyboard(text, kb)
}

/// Free-text prompt with the cancel button.
pub fn prompt(text: impl Into<String>) -> Reply {
    Reply::with_keyboard(text, Keyboard::new().row(cancel_row()))
}

/// Yes / no question with the cancel button.
pub fn confirm(text: impl Into<String>) -> Reply {
    let kb = Keyboard::new()
        .row(vec![
            Button::new("Да", Action::Yes),
            Button::new("Нет", Action::No),
        ])
        .row(cancel_row());
    Reply::with_keyboard(text, kb)
}

/// Prompt inside a collecting loop: `Готово` leaves it.
pub fn collect(text: impl Into<String>) -> Reply {
    let kb = Keyboard::new()
        .button("Готово", Action::Done)
        .row(cancel_row());
    Reply::with_keyboard(text, kb)
}

pub fn pick_date(text: impl Into<String>, year: i32, month: u32, today: NaiveDate) -> Reply {
    let kb = calendar::month_keyboard(year, month, today).row(cancel_row());
    Reply::with_keyboard(text, kb)
}

fn accept_keyboard() -> Keyboard {
    Keyboard::new()
        .button("Сохранить", Action::Save)
        .button("Изменить", Action::ChangeFsmUserData)
        .row(cancel_row())
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn theme_summary(draft: &ThemeDraft) -> Reply {
    let text = format!(
        "Имя темы: {}\nОписание темы: {}",
        or_dash(&draft.name),
        or_dash(&draft.description)
    );
    Reply::with_keyboard(text, accept_keyboard())
}

pub fn note_summary(draft: &NoteDraft) -> Reply {
    let mut text = format!(
        "Имя заметки: {}\nТекст заметки: {}",
        or_dash(&draft.name),
        or_dash(&draft.text)
    );
    if !draft.attachments.is_empty() {
        text.push_str(&format!("\nВложений: {}", draft.attachments.len()));
    }
    if !draft.checklist.is_empty() {
        text.push_str(&format!("\nЧеклист:\n{}", checklist(&draft.checklist)));
    }
    let kb = Keyboard::new()
        .button("Сохранить", Action::Save)
        .button("Добавить файл", Action::AddAttachments)
        .button("Добавить чеклист", Action::AddCheckpoint)
        .button("Изменить", Action::ChangeFsmUserData)
        .row(cancel_row());
    Reply::with_keyboard(text, kb)
}

pub fn checklist(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn alarm_summary(draft: &AlarmDraft) -> Reply {
    let when = draft
        .fire_at
        .as_ref()
        .map(fire_time)
        .unwrap_or_else(|| "-".to_string());
    let repeat = match draft.repeat_interval {
        Some(secs) => format!("каждые {} мин.", secs / 60),
        None => "нет".to_string(),
    };
    let text = format!(
        "Имя напоминания: {}\nОписание: {}\nВремя: {when}\nПовтор: {repeat}",
        or_dash(&draft.name),
        or_dash(&draft.description)
    );
    Reply::with_keyboard(text, accept_keyboard())
}

/// Change-flow menu echoing the edits made so far.
pub fn change_menu(target: &ChangeTarget, edits: &Edits) -> Reply {
    let secondary_label = match target {
        ChangeTarget::Note(_) => "Текст",
        ChangeTarget::Theme(_) | ChangeTarget::Alarm(_) => "Описание",
    };
    let unchanged = "без изменений".to_string();
    let text = format!(
        "Что изменить?\n\nНазвание: {}\n{secondary_label}: {}",
        edits.name.as_ref().unwrap_or(&unchanged),
        edits.secondary.as_ref().unwrap_or(&unchanged),
    );
    let kb = Keyboard::new()
        .button("Изменить название", Action::ChangeName)
        .button(
            format!("Изменить {}", secondary_label.to_lowercase()),
            Action::ChangeDescription,
        )
        .button("Сохранить", Action::Save)
        .row(cancel_row());
    Reply::with_keyboard(text, kb)
}
