// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Create Theme: write_name -> write_description -> accept.

use remindo_core::models::{ThemeLinks, ThemeToCreate};
use remindo_core::{Action, StorageError};
use tracing::info;

use super::{Transition, missing, navigation, text_input};
use crate::context::Ctx;
use crate::state::{CreateThemeStage, FlowState, ThemeDraft};
use crate::trigger::Trigger;
use crate::views;

const NAME_PROMPT: &str = "Введите название темы";

pub fn begin() -> Transition {
    Transition::Advance(
        FlowState::CreateTheme {
            stage: CreateThemeStage::WriteName,
            draft: ThemeDraft::default(),
        },
        views::prompt(NAME_PROMPT),
    )
}

pub async fn step(
    ctx: &Ctx<'_>,
    stage: CreateThemeStage,
    draft: &ThemeDraft,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    match stage {
        CreateThemeStage::WriteName => {
            let name = match text_input(trigger, NAME_PROMPT) {
                Ok(name) => name,
                Err(transition) => return Ok(transition),
            };
            let reply = views::prompt(format!(
                "Имя темы: {name}, теперь введите описание темы"
            ));
            let draft = ThemeDraft {
                name: Some(name),
                description: None,
            };
            Ok(Transition::Advance(
                FlowState::CreateTheme {
                    stage: CreateThemeStage::WriteDescription,
                    draft,
                },
                reply,
            ))
        }
        CreateThemeStage::WriteDescription => {
            let description = match text_input(trigger, "Введите описание темы") {
                Ok(description) => description,
                Err(transition) => return Ok(transition),
            };
            let draft = ThemeDraft {
                description: Some(description),
                ..draft.clone()
            };
            Ok(Transition::Advance(
                FlowState::CreateTheme {
                    stage: CreateThemeStage::Accept,
                    draft: draft.clone(),
                },
                views::theme_summary(&draft),
            ))
        }
        CreateThemeStage::Accept => match trigger {
            Trigger::Action(Action::Save) => save(ctx, draft).await,
            Trigger::Action(Action::ChangeFsmUserData) => Ok(begin()),
            _ => Ok(Transition::Ignore),
        },
    }
}

async fn save(ctx: &Ctx<'_>, draft: &ThemeDraft) -> Result<Transition, StorageError> {
    let theme = ThemeToCreate {
        name: draft.name.clone().ok_or_else(|| missing("name"))?,
        description: draft.description.clone(),
        links: ThemeLinks {
            user_id: ctx.user_id(),
        },
    };
    let id = ctx.stores.themes.create(&theme).await?;
    info!(theme_id = %id, user_id = %theme.links.user_id, "theme created");
    let menu = navigation::theme_menu(ctx, &id).await?;
    Ok(Transition::Finish(menu))
}
