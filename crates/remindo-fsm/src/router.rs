// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps `(current state, trigger)` to a flow step.
//!
//! Precedence, first match wins:
//! 1. `/start` registers the user and resets to the main menu.
//! 2. Navigation buttons work in any state and discard it.
//! 3. Notification buttons act without touching the conversation.
//! 4. Cancel leaves the active flow for its context menu.
//! 5. The active flow's own step.
//! 6. Flow entry buttons, only when no flow is active.

use remindo_core::{Action, StorageError};

use crate::context::Ctx;
use crate::flows::{
    Transition, alarm, change, delete, navigation, note, settle, settle_detached, theme,
};
use crate::state::{ChangeTarget, FlowState};
use crate::trigger::Trigger;
use crate::views;

pub async fn route(
    ctx: &Ctx<'_>,
    current: Option<&FlowState>,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    let action = match trigger {
        Trigger::Start => return settle(navigation::start(ctx).await),
        Trigger::Action(action) => Some(action),
        Trigger::Text(_) | Trigger::Photo(_) => None,
    };

    if let Some(action) = action {
        if let Some(transition) = stateless(ctx, action).await {
            return transition;
        }
        if matches!(action, Action::Cancel | Action::CancelFsm) {
            let menu = match current {
                Some(flow) => navigation::cancel_target(ctx, flow).await,
                None => views::main_menu(),
            };
            return Ok(Transition::Finish(menu));
        }
    }

    match (current, action) {
        (Some(flow), _) => settle(step(ctx, flow, trigger).await),
        (None, Some(action)) => settle(enter(ctx, action).await),
        (None, None) => Ok(Transition::Ignore),
    }
}

/// Buttons that behave the same whatever the conversation state.
async fn stateless(
    ctx: &Ctx<'_>,
    action: &Action,
) -> Option<Result<Transition, StorageError>> {
    let finish = |menu: Result<remindo_core::Reply, StorageError>| {
        settle(menu.map(Transition::Finish))
    };
    let result = match action {
        Action::MainMenu => Ok(Transition::Finish(views::main_menu())),
        Action::OpenAllThemes => finish(navigation::themes_list(ctx).await),
        Action::OpenTheme(id) => finish(navigation::theme_menu(ctx, id).await),
        Action::OpenNote(id) => finish(navigation::note_menu(ctx, id).await),
        Action::OpenAlarm(id) => finish(navigation::alarm_menu(ctx, id).await),
        Action::FinishAlarm(id) => settle_detached(alarm::finish(ctx, id).await),
        Action::SetAlarmNotRepeatable(id) => {
            settle_detached(alarm::stop_repeating(ctx, id).await)
        }
        Action::CloseMessage => Ok(Transition::Detached(None)),
        _ => return None,
    };
    Some(result)
}

async fn step(
    ctx: &Ctx<'_>,
    flow: &FlowState,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    match flow {
        FlowState::CreateTheme { stage, draft } => theme::step(ctx, *stage, draft, trigger).await,
        FlowState::Change {
            target,
            stage,
            edits,
        } => change::step(ctx, target, *stage, edits, trigger).await,
        FlowState::Delete { target } => delete::step(ctx, target, trigger).await,
        FlowState::CreateNote {
            theme_id,
            stage,
            draft,
        } => note::step(ctx, theme_id, *stage, draft, trigger).await,
        FlowState::CreateAlarm {
            note_id,
            stage,
            draft,
        } => alarm::step_create(ctx, note_id, *stage, draft, trigger).await,
        FlowState::SetAlarmTime {
            alarm_id,
            stage,
            date,
            fire_at,
        } => alarm::step_set_time(ctx, alarm_id, *stage, *date, *fire_at, trigger).await,
        FlowState::SetRepeatInterval { alarm_id } => {
            alarm::step_interval(ctx, alarm_id, trigger).await
        }
    }
}

async fn enter(ctx: &Ctx<'_>, action: &Action) -> Result<Transition, StorageError> {
    match action {
        Action::CreateTheme => Ok(theme::begin()),
        Action::CreateNote(theme_id) => Ok(note::begin(theme_id)),
        Action::CreateAlarm(note_id) => Ok(alarm::begin_create(note_id)),
        Action::ChangeTheme(id) => change::begin(ctx, ChangeTarget::Theme(id.clone())).await,
        Action::ChangeNote(id) => change::begin(ctx, ChangeTarget::Note(id.clone())).await,
        Action::ChangeAlarm(id) => change::begin(ctx, ChangeTarget::Alarm(id.clone())).await,
        Action::DeleteTheme(id) => delete::begin_theme(ctx, id).await,
        Action::DeleteNote(id) => delete::begin_note(ctx, id).await,
        Action::DeleteAlarm(id) => delete::begin_alarm(ctx, id).await,
        Action::SetAlarmTime(id) => alarm::begin_set_time(ctx, id).await,
        Action::ToggleRepeatable(id) => alarm::toggle_repeatable(ctx, id).await,
        _ => Ok(Transition::Ignore),
    }
}
