// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Create Note: write_name -> write_text -> accept, with optional
//! attachment and checklist loops hanging off accept.

use remindo_core::models::{Checkpoint, NoteData, NoteLinks, NoteToCreate};
use remindo_core::{Action, StorageError};
use tracing::info;

use super::{Transition, missing, navigation, text_input};
use crate::context::Ctx;
use crate::state::{CreateNoteStage, FlowState, NoteDraft};
use crate::trigger::Trigger;
use crate::views;

const NAME_PROMPT: &str = "Введите название заметки";
const PHOTO_PROMPT: &str = "Отправьте изображение";

pub fn begin(theme_id: &str) -> Transition {
    Transition::Advance(
        FlowState::CreateNote {
            theme_id: theme_id.to_string(),
            stage: CreateNoteStage::WriteName,
            draft: NoteDraft::default(),
        },
        views::prompt(NAME_PROMPT),
    )
}

fn at(theme_id: &str, stage: CreateNoteStage, draft: NoteDraft) -> FlowState {
    FlowState::CreateNote {
        theme_id: theme_id.to_string(),
        stage,
        draft,
    }
}

pub async fn step(
    ctx: &Ctx<'_>,
    theme_id: &str,
    stage: CreateNoteStage,
    draft: &NoteDraft,
    trigger: &Trigger,
) -> Result<Transition, StorageError> {
    match stage {
        CreateNoteStage::WriteName => {
            let name = match text_input(trigger, NAME_PROMPT) {
                Ok(name) => name,
                Err(transition) => return Ok(transition),
            };
            let reply = views::prompt(format!(
                "Имя заметки: {name}, теперь введите текст заметки"
            ));
            let draft = NoteDraft {
                name: Some(name),
                ..NoteDraft::default()
            };
            Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::WriteText, draft),
                reply,
            ))
        }
        CreateNoteStage::WriteText => {
            let text = match text_input(trigger, "Введите текст заметки") {
                Ok(text) => text,
                Err(transition) => return Ok(transition),
            };
            let draft = NoteDraft {
                text: Some(text),
                ..draft.clone()
            };
            let reply = views::note_summary(&draft);
            Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::Accept, draft),
                reply,
            ))
        }
        CreateNoteStage::Accept => match trigger {
            Trigger::Action(Action::Save) => save(ctx, theme_id, draft).await,
            Trigger::Action(Action::AddAttachments) => Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::Attachments, draft.clone()),
                views::collect(PHOTO_PROMPT),
            )),
            Trigger::Action(Action::AddCheckpoint) => Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::Checklist, draft.clone()),
                views::collect("Отправьте текст пункта чеклиста"),
            )),
            Trigger::Action(Action::ChangeFsmUserData) => Ok(begin(theme_id)),
            _ => Ok(Transition::Ignore),
        },
        CreateNoteStage::Attachments => match trigger {
            Trigger::Photo(file_id) => {
                let mut draft = draft.clone();
                draft.attachments.push(file_id.clone());
                Ok(Transition::Advance(
                    at(theme_id, CreateNoteStage::Attachments, draft),
                    views::collect("Файл сохранен, отправьте еще или нажмите 'Готово'"),
                ))
            }
            Trigger::Text(_) => Ok(Transition::Reprompt(views::collect(
                "Отправьте изображение, пока что другие файлы не поддерживаются",
            ))),
            Trigger::Action(Action::Done) => Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::Accept, draft.clone()),
                views::note_summary(draft),
            )),
            _ => Ok(Transition::Ignore),
        },
        CreateNoteStage::Checklist => match trigger {
            Trigger::Text(text) => {
                let Some(item) = crate::input::non_blank(text) else {
                    return Ok(Transition::Reprompt(views::collect(
                        "Отправьте текст пункта чеклиста",
                    )));
                };
                let mut draft = draft.clone();
                draft.checklist.push(item);
                let reply = views::collect(format!(
                    "Чеклист:\n{}\nОтправьте еще или нажмите 'Готово'",
                    views::checklist(&draft.checklist)
                ));
                Ok(Transition::Advance(
                    at(theme_id, CreateNoteStage::Checklist, draft),
                    reply,
                ))
            }
            Trigger::Photo(_) => Ok(Transition::Reprompt(views::collect(
                "Пункт чеклиста должен быть текстом",
            ))),
            Trigger::Action(Action::Done) => Ok(Transition::Advance(
                at(theme_id, CreateNoteStage::Accept, draft.clone()),
                views::note_summary(draft),
            )),
            _ => Ok(Transition::Ignore),
        },
    }
}

async fn save(ctx: &Ctx<'_>, theme_id: &str, draft: &NoteDraft) -> Result<Transition, StorageError> {
    let checkpoints: Vec<Checkpoint> = draft
        .checklist
        .iter()
        .map(|text| Checkpoint {
            text: text.clone(),
            is_finished: false,
        })
        .collect();
    let note = NoteToCreate {
        name: draft.name.clone().ok_or_else(|| missing("name"))?,
        links: NoteLinks {
            user_id: ctx.user_id(),
            theme_id: theme_id.to_string(),
        },
        data: NoteData {
            text: draft.text.clone().ok_or_else(|| missing("text"))?,
            attachments: (!draft.attachments.is_empty()).then(|| draft.attachments.clone()),
            checkpoints: (!checkpoints.is_empty()).then_some(checkpoints),
        },
    };
    let id = ctx.stores.notes.create(&note).await?;
    info!(note_id = %id, theme_id = %theme_id, "note created");
    let menu = navigation::note_menu(ctx, &id).await?;
    Ok(Transition::Finish(menu))
}
