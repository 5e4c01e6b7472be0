// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging through the Bot API.

use async_trait::async_trait;
use remindo_core::{ChatSurface, Keyboard, MessageRef, RemindoError, Reply};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use tracing::debug;

/// Renders a keyboard as inline buttons whose callback data is the encoded
/// [`Action`](remindo_core::Action).
pub fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.action.to_string()))
            .collect::<Vec<_>>()
    }))
}

/// [`ChatSurface`] backed by a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramSurface {
    bot: Bot,
}

impl TelegramSurface {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn channel_error(what: &str, err: teloxide::RequestError) -> RemindoError {
    RemindoError::Channel {
        message: format!("{what}: {err}"),
        source: Some(Box::new(err)),
    }
}

#[async_trait]
impl ChatSurface for TelegramSurface {
    async fn send(&self, chat_id: i64, reply: Reply) -> Result<MessageRef, RemindoError> {
        let mut request = self.bot.send_message(ChatId(chat_id), reply.text);
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(inline_markup(keyboard));
        }
        let sent = request
            .await
            .map_err(|e| channel_error("failed to send message", e))?;
        debug!(chat_id, message_id = sent.id.0, "message sent");
        Ok(MessageRef {
            chat_id,
            message_id: sent.id.0,
        })
    }

    async fn delete(&self, message: MessageRef) -> Result<(), RemindoError> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await
            .map_err(|e| channel_error("failed to delete message", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindo_core::Action;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback button, got {other:?}"),
        }
    }

    #[test]
    fn rows_and_payloads_are_preserved() {
        let kb = Keyboard::new()
            .button("Темы", Action::OpenAllThemes)
            .row(vec![
                remindo_core::Button::new("Да", Action::Yes),
                remindo_core::Button::new("Нет", Action::No),
            ])
            .button("Открыть", Action::OpenTheme("65a1_b".into()));

        let markup = inline_markup(&kb);
        let rows = &markup.inline_keyboard;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][0].text, "Да");
        assert_eq!(callback_data(&rows[0][0]), Action::OpenAllThemes.to_string());
        assert_eq!(callback_data(&rows[2][0]), "open_theme_65a1_b");
    }

    #[test]
    fn empty_keyboard_renders_no_rows() {
        assert!(inline_markup(&Keyboard::new()).inline_keyboard.is_empty());
    }
}
