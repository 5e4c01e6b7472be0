// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delete Theme / Note / Alarm: confirm(yes | no).

use remindo_core::{Action, StorageError};
use tracing::info;

use super::{Transition, navigation};
use crate::context::Ctx;
use crate::state::{DeleteTarget, FlowState};
use crate::trigger::Trigger;
use crate::views;

/// Entry for a theme.
pub async fn begin_theme(ctx: &Ctx<'_>, id: &str) -> Result<Transition, StorageError> {
    let theme = ctx.stores.themes.get(id).await?;
    Ok(Transition::Advance(
        FlowState::Delete {
            target: DeleteTarget::Theme { id: theme.id },
        },
        views::confirm(format!(
            "Удалить тему {} вместе со всеми заметками и напоминаниями?",
            theme.name
        )),
    ))
}

/// Entry for a note; remembers the parent theme to return to.
pub async fn begin_note(ctx: &Ctx<'_>, id: &str) -> Result<Transition, StorageError> {
    let note = ctx.stores.notes.get(id).await?;
    Ok(Transition::Advance(
        FlowState::Delete {
            target: DeleteTarget::Note {
                id: note.id,
                theme_id: note.links.theme_id,
            },
        },
        views::confirm(format!(
            "Удалить заметку {} вместе с напоминаниями?",
            note.name
        )),
    ))
}

/// Entry for an alarm; remembers the parent note to return to.
pub async fn begin_alarm(ctx: &Ctx<'_>, id: &str) -> Result<Transition, StorageError> {
    let alarm = ctx.stores.alarms.get(id).await?;
    Ok(Transition::Advance(
        FlowState::Delete {
            target: DeleteTarget::Alarm {
                id: alarm.id,
                note_id: alarm.links.parent_id,
            },
        },
        views::confirm(format!("Удалить напоминание {}?", alarm.name)),
    ))
}

pub async fn step(
    ctx: &Ctx<'_>,
    target: &DeleteTarget,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    match trigger {
        Trigger::Action(Action::Yes) => confirm(ctx, target).await,
        Trigger::Action(Action::No) => {
            let menu = match target {
                DeleteTarget::Theme { id } => navigation::theme_menu(ctx, id).await?,
                DeleteTarget::Note { id, .. } => navigation::note_menu(ctx, id).await?,
                DeleteTarget::Alarm { id, .. } => navigation::alarm_menu(ctx, id).await?,
            };
            Ok(Transition::Finish(menu))
        }
        _ => Ok(Transition::Ignore),
    }
}

async fn confirm(ctx: &Ctx<'_>, target: &DeleteTarget) -> Result<Transition, StorageError> {
    let menu = match target {
        DeleteTarget::Theme { id } => {
            ctx.stores.themes.delete(id).await?;
            info!(theme_id = %id, "theme deleted");
            navigation::themes_list(ctx).await?
        }
        DeleteTarget::Note { id, theme_id } => {
            ctx.stores.notes.delete(id).await?;
            info!(note_id = %id, "note deleted");
            navigation::theme_menu(ctx, theme_id).await?
        }
        DeleteTarget::Alarm { id, note_id } => {
            ctx.stores.alarms.delete(id).await?;
            info!(alarm_id = %id, "alarm deleted");
            navigation::note_menu(ctx, note_id).await?
        }
    };
    Ok(Transition::Finish(menu))
}
