// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alarm flows: Create Alarm, Set New Alarm Time, Set Repeat Interval, and
//! the direct finish / repeatability actions.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use remindo_core::models::{AlarmLinks, AlarmStatus, AlarmToCreate, FieldPatch, format_backend_time};
use remindo_core::{Action, StorageError};
use serde_json::Value;
use tracing::info;

use super::{Transition, correction, missing, navigation, text_input};
use crate::context::Ctx;
use crate::input;
use crate::state::{AlarmDraft, CreateAlarmStage, FlowState, ScheduleStage};
use crate::trigger::Trigger;
use crate::views;

const NAME_PROMPT: &str = "Введите название напоминания";
const TIME_PROMPT: &str = "Введите время в формате 'hh:mm'";
const INTERVAL_PROMPT: &str =
    "Введите, как часто повторять напоминание: например '30 м' или '2 ч'";
const DATE_PROMPT: &str = "Выберите дату в календаре";
const PAST_DATE: &str = "Эта дата уже прошла, выберите другую";

/// Result of feeding a trigger to a date-picking stage.
enum DatePick {
    Picked(NaiveDate),
    /// Re-render the calendar for another month, staying in the stage.
    Browse(i32, u32),
    /// A day before yesterday.
    Past,
    /// Typed input where a calendar press was expected.
    NotADate,
    Ignored,
}

fn pick(ctx: &Ctx<'_>, trigger: &Trigger) -> DatePick {
    match trigger {
        Trigger::Action(Action::CalendarDay(date)) if input::date_allowed(*date, ctx.today()) => {
            DatePick::Picked(*date)
        }
        Trigger::Action(Action::CalendarDay(_)) => DatePick::Past,
        Trigger::Action(Action::CalendarNav { year, month }) => DatePick::Browse(*year, *month),
        Trigger::Text(_) | Trigger::Photo(_) => DatePick::NotADate,
        _ => DatePick::Ignored,
    }
}

fn calendar(ctx: &Ctx<'_>, text: &str) -> remindo_core::Reply {
    let today = ctx.today();
    views::pick_date(text, today.year(), today.month(), today)
}

fn time_prompt(date: NaiveDate) -> remindo_core::Reply {
    views::prompt(format!(
        "Выбранная дата: {}\nТеперь введите время в формате 'hh:mm'",
        date.format("%d/%m/%Y")
    ))
}

/// Parses `hh:mm` onto `date`; the transition to return when malformed.
fn fire_at(date: Option<NaiveDate>, trigger: &Trigger) -> Result<NaiveDateTime, Transition> {
    let text = text_input(trigger, TIME_PROMPT)?;
    let time = input::parse_time(&text)
        .ok_or_else(|| correction("Не удалось разобрать время.", TIME_PROMPT))?;
    // A text stage reached without a date only happens with corrupted state.
    let date = date.ok_or_else(|| Transition::Fail {
        detail: "conversation data has no `date`".to_string(),
    })?;
    Ok(date.and_time(time))
}

fn interval(trigger: &Trigger) -> Result<i64, Transition> {
    let text = text_input(trigger, INTERVAL_PROMPT)?;
    input::parse_repeat_interval(&text)
        .ok_or_else(|| correction("Не удалось разобрать интервал.", INTERVAL_PROMPT))
}

pub fn begin_create(note_id: &str) -> Transition {
    Transition::Advance(
        FlowState::CreateAlarm {
            note_id: note_id.to_string(),
            stage: CreateAlarmStage::WriteName,
            draft: AlarmDraft::default(),
        },
        views::prompt(NAME_PROMPT),
    )
}

pub async fn step_create(
    ctx: &Ctx<'_>,
    note_id: &str,
    stage: CreateAlarmStage,
    draft: &AlarmDraft,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    let at = |stage: CreateAlarmStage, draft: AlarmDraft| FlowState::CreateAlarm {
        note_id: note_id.to_string(),
        stage,
        draft,
    };
    let transition = match stage {
        CreateAlarmStage::WriteName => match text_input(trigger, NAME_PROMPT) {
            Ok(name) => {
                let reply = views::prompt(format!(
                    "Имя напоминания: {name}, теперь введите описание напоминания"
                ));
                let draft = AlarmDraft {
                    name: Some(name),
                    ..AlarmDraft::default()
                };
                Transition::Advance(at(CreateAlarmStage::WriteDescription, draft), reply)
            }
            Err(transition) => transition,
        },
        CreateAlarmStage::WriteDescription => {
            match text_input(trigger, "Введите описание напоминания") {
                Ok(description) => {
                    let draft = AlarmDraft {
                        description: Some(description),
                        ..draft.clone()
                    };
                    let text = format!(
                        "Имя напоминания: {}\nОписание: {}\n\n{DATE_PROMPT}",
                        draft.name.as_deref().unwrap_or("-"),
                        draft.description.as_deref().unwrap_or("-"),
                    );
                    Transition::Advance(at(CreateAlarmStage::PickDate, draft), calendar(ctx, &text))
                }
                Err(transition) => transition,
            }
        }
        CreateAlarmStage::PickDate => match pick(ctx, trigger) {
            DatePick::Picked(date) => {
                let draft = AlarmDraft {
                    date: Some(date),
                    ..draft.clone()
                };
                Transition::Advance(at(CreateAlarmStage::WriteTime, draft), time_prompt(date))
            }
            DatePick::Browse(year, month) => Transition::Advance(
                at(CreateAlarmStage::PickDate, draft.clone()),
                views::pick_date(DATE_PROMPT, year, month, ctx.today()),
            ),
            DatePick::Past => Transition::Reprompt(calendar(ctx, PAST_DATE)),
            DatePick::NotADate => Transition::Reprompt(calendar(ctx, DATE_PROMPT)),
            DatePick::Ignored => Transition::Ignore,
        },
        CreateAlarmStage::WriteTime => match fire_at(draft.date, trigger) {
            Ok(when) => {
                let draft = AlarmDraft {
                    fire_at: Some(when),
                    ..draft.clone()
                };
                Transition::Advance(
                    at(CreateAlarmStage::ChooseRepeatable, draft),
                    views::confirm(format!(
                        "Выбрано время: {}\n\nНапоминание будет повторяющимся?",
                        when.format("%H:%M")
                    )),
                )
            }
            Err(transition) => transition,
        },
        CreateAlarmStage::ChooseRepeatable => match trigger {
            Trigger::Action(Action::Yes) => Transition::Advance(
                at(CreateAlarmStage::WriteInterval, draft.clone()),
                views::prompt(INTERVAL_PROMPT),
            ),
            Trigger::Action(Action::No) => {
                let draft = AlarmDraft {
                    repeat_interval: None,
                    ..draft.clone()
                };
                let reply = views::alarm_summary(&draft);
                Transition::Advance(at(CreateAlarmStage::Accept, draft), reply)
            }
            _ => Transition::Ignore,
        },
        CreateAlarmStage::WriteInterval => match interval(trigger) {
            Ok(secs) => {
                let draft = AlarmDraft {
                    repeat_interval: Some(secs),
                    ..draft.clone()
                };
                let reply = views::alarm_summary(&draft);
                Transition::Advance(at(CreateAlarmStage::Accept, draft), reply)
            }
            Err(transition) => transition,
        },
        CreateAlarmStage::Accept => match trigger {
            Trigger::Action(Action::Save) => return save(ctx, note_id, draft).await,
            Trigger::Action(Action::ChangeFsmUserData) => begin_create(note_id),
            _ => Transition::Ignore,
        },
    };
    Ok(transition)
}

async fn save(ctx: &Ctx<'_>, note_id: &str, draft: &AlarmDraft) -> Result<Transition, StorageError> {
    let next_fire_at = draft.fire_at.ok_or_else(|| missing("fire_at"))?;
    let alarm = AlarmToCreate {
        name: draft.name.clone().ok_or_else(|| missing("name"))?,
        description: draft.description.clone(),
        is_repeatable: draft.repeat_interval.is_some(),
        links: AlarmLinks {
            user_id: ctx.user_id(),
            parent_id: note_id.to_string(),
        },
    };
    let id = ctx
        .stores
        .alarms
        .create(&alarm, next_fire_at, draft.repeat_interval)
        .await?;
    info!(alarm_id = %id, note_id = %note_id, next_fire_at = %next_fire_at, "alarm created");
    let menu = navigation::alarm_menu(ctx, &id).await?;
    Ok(Transition::Finish(menu))
}

pub async fn begin_set_time(ctx: &Ctx<'_>, alarm_id: &str) -> Result<Transition, StorageError> {
    let alarm = ctx.stores.alarms.get(alarm_id).await?;
    Ok(Transition::Advance(
        FlowState::SetAlarmTime {
            alarm_id: alarm.id,
            stage: ScheduleStage::PickDate,
            date: None,
            fire_at: None,
        },
        calendar(ctx, &format!("{}\n\nВыберите новую дату", alarm.name)),
    ))
}

pub async fn step_set_time(
    ctx: &Ctx<'_>,
    alarm_id: &str,
    stage: ScheduleStage,
    date: Option<NaiveDate>,
    fire_at_value: Option<NaiveDateTime>,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    let at = |stage: ScheduleStage, date: Option<NaiveDate>, fire_at: Option<NaiveDateTime>| {
        FlowState::SetAlarmTime {
            alarm_id: alarm_id.to_string(),
            stage,
            date,
            fire_at,
        }
    };
    let transition = match stage {
        ScheduleStage::PickDate => match pick(ctx, trigger) {
            DatePick::Picked(picked) => Transition::Advance(
                at(ScheduleStage::WriteTime, Some(picked), None),
                time_prompt(picked),
            ),
            DatePick::Browse(year, month) => Transition::Advance(
                at(ScheduleStage::PickDate, None, None),
                views::pick_date(DATE_PROMPT, year, month, ctx.today()),
            ),
            DatePick::Past => Transition::Reprompt(calendar(ctx, PAST_DATE)),
            DatePick::NotADate => Transition::Reprompt(calendar(ctx, DATE_PROMPT)),
            DatePick::Ignored => Transition::Ignore,
        },
        ScheduleStage::WriteTime => match fire_at(date, trigger) {
            Ok(when) => Transition::Advance(
                at(ScheduleStage::Confirm, date, Some(when)),
                views::confirm(format!(
                    "Новое время напоминания: {}. Сохранить?",
                    views::fire_time(&when)
                )),
            ),
            Err(transition) => transition,
        },
        ScheduleStage::Confirm => match trigger {
            Trigger::Action(Action::Yes) => {
                let when = fire_at_value.ok_or_else(|| missing("fire_at"))?;
                let mut patch = FieldPatch::new();
                patch.insert(
                    "times.next_notion_time".to_string(),
                    Value::from(format_backend_time(&when)),
                );
                patch.insert(
                    "status".to_string(),
                    Value::from(AlarmStatus::Queued.to_string()),
                );
                ctx.stores.alarms.patch(alarm_id, &patch).await?;
                info!(alarm_id = %alarm_id, next_fire_at = %when, "alarm rescheduled");
                Transition::Finish(navigation::alarm_menu(ctx, alarm_id).await?)
            }
            Trigger::Action(Action::No) => {
                Transition::Finish(navigation::alarm_menu(ctx, alarm_id).await?)
            }
            _ => Transition::Ignore,
        },
    };
    Ok(transition)
}

fn not_repeatable_patch() -> FieldPatch {
    let mut patch = FieldPatch::new();
    patch.insert("is_repeatable".to_string(), Value::Bool(false));
    patch.insert("times.repeat_interval".to_string(), Value::Null);
    patch
}

/// Toggle from the alarm menu: switching off is one patch, switching on asks
/// for the interval first.
pub async fn toggle_repeatable(ctx: &Ctx<'_>, alarm_id: &str) -> Result<Transition, StorageError> {
    let alarm = ctx.stores.alarms.get(alarm_id).await?;
    if alarm.is_repeatable {
        ctx.stores.alarms.patch(alarm_id, &not_repeatable_patch()).await?;
        info!(alarm_id = %alarm_id, "alarm no longer repeats");
        return Ok(Transition::Finish(navigation::alarm_menu(ctx, alarm_id).await?));
    }
    Ok(Transition::Advance(
        FlowState::SetRepeatInterval { alarm_id: alarm.id },
        views::prompt(INTERVAL_PROMPT),
    ))
}

pub async fn step_interval(
    ctx: &Ctx<'_>,
    alarm_id: &str,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    let secs = match interval(trigger) {
        Ok(secs) => secs,
        Err(transition) => return Ok(transition),
    };
    let mut patch = FieldPatch::new();
    patch.insert("is_repeatable".to_string(), Value::Bool(true));
    patch.insert("times.repeat_interval".to_string(), Value::from(secs));
    ctx.stores.alarms.patch(alarm_id, &patch).await?;
    info!(alarm_id = %alarm_id, repeat_interval = secs, "alarm now repeats");
    Ok(Transition::Finish(navigation::alarm_menu(ctx, alarm_id).await?))
}

pub async fn finish(ctx: &Ctx<'_>, alarm_id: &str) -> Result<Transition, StorageError> {
    ctx.stores
        .alarms
        .update_status(alarm_id, AlarmStatus::Finished)
        .await?;
    info!(alarm_id = %alarm_id, "alarm finished by user");
    Ok(Transition::Detached(Some(
        navigation::alarm_menu(ctx, alarm_id).await?,
    )))
}

pub async fn stop_repeating(ctx: &Ctx<'_>, alarm_id: &str) -> Result<Transition, StorageError> {
    ctx.stores.alarms.patch(alarm_id, &not_repeatable_patch()).await?;
    info!(alarm_id = %alarm_id, "alarm no longer repeats");
    Ok(Transition::Detached(Some(
        navigation::alarm_menu(ctx, alarm_id).await?,
    )))
}
