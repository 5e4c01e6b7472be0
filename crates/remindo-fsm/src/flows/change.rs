// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change Theme / Note / Alarm: menu -> write field -> menu ... -> save.
//!
//! Saving patches exactly the fields the user edited.

use remindo_core::models::FieldPatch;
use remindo_core::{Action, StorageError};
use serde_json::Value;
use tracing::{debug, info};

use super::{Transition, navigation, text_input};
use crate::context::Ctx;
use crate::state::{ChangeStage, ChangeTarget, Edits, FlowState};
use crate::trigger::Trigger;
use crate::views;

/// Backend field holding the target's secondary text.
fn secondary_field(target: &ChangeTarget) -> &'static str {
    match target {
        ChangeTarget::Note(_) => "data.text",
        ChangeTarget::Theme(_) | ChangeTarget::Alarm(_) => "description",
    }
}

/// The patch body for `edits`: only touched fields appear.
pub fn diff(target: &ChangeTarget, edits: &Edits) -> FieldPatch {
    let mut patch = FieldPatch::new();
    if let Some(name) = &edits.name {
        patch.insert("name".to_string(), Value::from(name.as_str()));
    }
    if let Some(secondary) = &edits.secondary {
        patch.insert(
            secondary_field(target).to_string(),
            Value::from(secondary.as_str()),
        );
    }
    patch
}

/// Entry: checks the entity exists, then shows the change menu.
pub async fn begin(ctx: &Ctx<'_>, target: ChangeTarget) -> Result<Transition, StorageError> {
    match &target {
        ChangeTarget::Theme(id) => {
            ctx.stores.themes.get(id).await?;
        }
        ChangeTarget::Note(id) => {
            ctx.stores.notes.get(id).await?;
        }
        ChangeTarget::Alarm(id) => {
            ctx.stores.alarms.get(id).await?;
        }
    }
    let edits = Edits::default();
    let reply = views::change_menu(&target, &edits);
    Ok(Transition::Advance(
        FlowState::Change {
            target,
            stage: ChangeStage::Menu,
            edits,
        },
        reply,
    ))
}

pub async fn step(
    ctx: &Ctx<'_>,
    target: &ChangeTarget,
    stage: ChangeStage,
    edits: &Edits,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    let at = |stage: ChangeStage, edits: Edits| FlowState::Change {
        target: target.clone(),
        stage,
        edits,
    };
    match stage {
        ChangeStage::Menu => match trigger {
            Trigger::Action(Action::ChangeName) => Ok(Transition::Advance(
                at(ChangeStage::WriteName, edits.clone()),
                views::prompt("Введите новое название"),
            )),
            Trigger::Action(Action::ChangeDescription) => {
                let hint = match target {
                    ChangeTarget::Note(_) => "Введите новый текст заметки",
                    ChangeTarget::Theme(_) | ChangeTarget::Alarm(_) => "Введите новое описание",
                };
                Ok(Transition::Advance(
                    at(ChangeStage::WriteSecondary, edits.clone()),
                    views::prompt(hint),
                ))
            }
            Trigger::Action(Action::Save) => save(ctx, target, edits).await,
            _ => Ok(Transition::Ignore),
        },
        ChangeStage::WriteName => {
            let name = match text_input(trigger, "Введите новое название") {
                Ok(name) => name,
                Err(transition) => return Ok(transition),
            };
            let edits = Edits {
                name: Some(name),
                ..edits.clone()
            };
            let reply = views::change_menu(target, &edits);
            Ok(Transition::Advance(at(ChangeStage::Menu, edits), reply))
        }
        ChangeStage::WriteSecondary => {
            let secondary = match text_input(trigger, "Введите новое значение") {
                Ok(secondary) => secondary,
                Err(transition) => return Ok(transition),
            };
            let edits = Edits {
                secondary: Some(secondary),
                ..edits.clone()
            };
            let reply = views::change_menu(target, &edits);
            Ok(Transition::Advance(at(ChangeStage::Menu, edits), reply))
        }
    }
}

async fn save(ctx: &Ctx<'_>, target: &ChangeTarget, edits: &Edits) -> Result<Transition, StorageError> {
    let patch = diff(target, edits);
    if patch.is_empty() {
        debug!(kind = target.kind(), id = %target.id(), "nothing edited, skipping patch");
    } else {
        match target {
            ChangeTarget::Theme(id) => ctx.stores.themes.patch(id, &patch).await?,
            ChangeTarget::Note(id) => ctx.stores.notes.patch(id, &patch).await?,
            ChangeTarget::Alarm(id) => ctx.stores.alarms.patch(id, &patch).await?,
        }
        info!(kind = target.kind(), id = %target.id(), fields = patch.len(), "entity patched");
    }
    let menu = navigation::entity_menu(ctx, target).await?;
    Ok(Transition::Finish(menu))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_holds_only_edited_fields() {
        let edits = Edits {
            name: None,
            secondary: Some("new".into()),
        };
        let patch = diff(&ChangeTarget::Alarm("a1".into()), &edits);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["description"], "new");
        assert!(!patch.contains_key("name"));
    }

    #[test]
    fn note_text_uses_nested_path() {
        let edits = Edits {
            name: Some("n".into()),
            secondary: Some("body".into()),
        };
        let patch = diff(&ChangeTarget::Note("n1".into()), &edits);
        assert_eq!(patch["data.text"], "body");
        assert_eq!(patch["name"], "n");
    }

    #[test]
    fn untouched_edits_give_empty_diff() {
        assert!(diff(&ChangeTarget::Theme("t1".into()), &Edits::default()).is_empty());
    }
}
