// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless menus, registration on `/start`, and cancellation targets.

use remindo_core::models::User;
use remindo_core::{NotFoundExt, Reply, StorageError};
use tracing::{debug, info, warn};

use super::Transition;
use crate::context::Ctx;
use crate::state::{ChangeTarget, DeleteTarget, FlowState};
use crate::views;

fn profile(ctx: &Ctx<'_>) -> User {
    let sender = ctx.sender;
    let display_name = sender
        .username
        .clone()
        .or_else(|| sender.first_name.clone())
        .unwrap_or_else(|| sender.backend_id());
    User {
        telegram_id: sender.backend_id(),
        display_name,
        language_code: sender.language_code.clone().unwrap_or_else(|| "ru".to_string()),
        timezone_offset: 0,
        first_name: sender.first_name.clone(),
        last_name: sender.last_name.clone(),
    }
}

/// Registers the sender on first contact and shows the main menu.
pub async fn start(ctx: &Ctx<'_>) -> Result<Transition, StorageError> {
    let user_id = ctx.user_id();
    match ctx.stores.users.get(&user_id).await {
        Ok(_) => debug!(user_id = %user_id, "known user"),
        Err(err) if err.is_not_found() => match ctx.stores.users.create(&profile(ctx)).await {
            Ok(()) => info!(user_id = %user_id, "registered new user"),
            Err(StorageError::Duplicate { .. }) => {
                debug!(user_id = %user_id, "user registered concurrently")
            }
            Err(err) => return Err(err),
        },
        Err(err) => return Err(err),
    }
    Ok(Transition::Finish(views::main_menu()))
}

pub async fn themes_list(ctx: &Ctx<'_>) -> Result<Reply, StorageError> {
    let themes = ctx
        .stores
        .themes
        .get_all_by_user(&ctx.user_id())
        .await
        .or_empty()?;
    Ok(views::themes_list(&themes))
}

pub async fn theme_menu(ctx: &Ctx<'_>, theme_id: &str) -> Result<Reply, StorageError> {
    let theme = ctx.stores.themes.get(theme_id).await?;
    let notes = ctx
        .stores
        .notes
        .get_all_by_theme(theme_id)
        .await
        .or_empty()?;
    Ok(views::theme_menu(&theme, &notes))
}

pub async fn note_menu(ctx: &Ctx<'_>, note_id: &str) -> Result<Reply, StorageError> {
    let note = ctx.stores.notes.get(note_id).await?;
    let alarms = ctx
        .stores
        .alarms
        .get_all_by_parent(note_id)
        .await
        .or_empty()?;
    Ok(views::note_menu(&note, &alarms))
}

pub async fn alarm_menu(ctx: &Ctx<'_>, alarm_id: &str) -> Result<Reply, StorageError> {
    let alarm = ctx.stores.alarms.get(alarm_id).await?;
    Ok(views::alarm_menu(&alarm))
}

/// Menu of the entity a change or delete flow is scoped to.
pub async fn entity_menu(ctx: &Ctx<'_>, target: &ChangeTarget) -> Result<Reply, StorageError> {
    match target {
        ChangeTarget::Theme(id) => theme_menu(ctx, id).await,
        ChangeTarget::Note(id) => note_menu(ctx, id).await,
        ChangeTarget::Alarm(id) => alarm_menu(ctx, id).await,
    }
}

/// Where cancelling `flow` lands: the menu of the entity the flow was scoped
/// to, or the main menu when there is none or it cannot be read. Only reads.
pub async fn cancel_target(ctx: &Ctx<'_>, flow: &FlowState) -> Reply {
    let menu = match flow {
        FlowState::CreateTheme { .. } => return views::main_menu(),
        FlowState::Change { target, .. } => entity_menu(ctx, target).await,
        FlowState::Delete { target } => match target {
            DeleteTarget::Theme { id } => theme_menu(ctx, id).await,
            DeleteTarget::Note { id, .. } => note_menu(ctx, id).await,
            DeleteTarget::Alarm { id, .. } => alarm_menu(ctx, id).await,
        },
        FlowState::CreateNote { theme_id, .. } => theme_menu(ctx, theme_id).await,
        FlowState::CreateAlarm { note_id, .. } => note_menu(ctx, note_id).await,
        FlowState::SetAlarmTime { alarm_id, .. } | FlowState::SetRepeatInterval { alarm_id, .. } => {
            alarm_menu(ctx, alarm_id).await
        }
    };
    menu.unwrap_or_else(|err| {
        warn!(flow = %flow, error = %err, "cancel target unreadable, showing main menu");
        views::main_menu()
    })
}
