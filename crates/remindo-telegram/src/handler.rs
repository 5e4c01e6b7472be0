// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update translation.
//!
//! Turns Telegram messages and callback queries from private chats into the
//! platform-neutral [`Incoming`] events the engine understands. Anything the
//! engine has no use for (stickers, group chats, unknown button payloads)
//! translates to `None`.

use remindo_core::Action;
use remindo_fsm::{Incoming, Sender, Trigger};
use teloxide::types::{CallbackQuery, ChatKind, Message, User};
use tracing::debug;

/// Checks whether the message is from a private (DM) chat.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Builds the engine-side profile of a Telegram user.
pub fn sender_of(user: &User) -> Option<Sender> {
    let user_id = i64::try_from(user.id.0).ok()?;
    Some(Sender {
        user_id,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|n| !n.is_empty()),
        last_name: user.last_name.clone(),
        language_code: user.language_code.clone(),
    })
}

/// `/start`, optionally addressed to the bot or carrying a deep-link payload.
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    command == "/start" || command.starts_with("/start@")
}

/// Extracts the trigger a message carries.
///
/// Photos resolve to the largest available size.
pub fn message_trigger(msg: &Message) -> Option<Trigger> {
    if let Some(text) = msg.text() {
        if is_start_command(text) {
            return Some(Trigger::Start);
        }
        return Some(Trigger::Text(text.to_string()));
    }
    if let Some(largest) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(Trigger::Photo(largest.file.id.to_string()));
    }
    None
}

/// Converts a private-chat message into an [`Incoming`] event.
pub fn message_to_incoming(msg: &Message) -> Option<Incoming> {
    if !is_dm(msg) {
        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
        return None;
    }
    let sender = sender_of(msg.from.as_ref()?)?;
    let Some(trigger) = message_trigger(msg) else {
        debug!(msg_id = msg.id.0, "ignoring unsupported message type");
        return None;
    };
    Some(Incoming::new(sender, msg.chat.id.0, Some(msg.id.0), trigger))
}

/// Converts a button press into an [`Incoming`] event.
///
/// The message holding the keyboard becomes the event's message, so the
/// engine can tidy it away.
pub fn callback_to_incoming(query: &CallbackQuery) -> Option<Incoming> {
    let data = query.data.as_deref()?;
    let action = match data.parse::<Action>() {
        Ok(action) => action,
        Err(err) => {
            debug!(error = %err, "ignoring unknown callback payload");
            return None;
        }
    };
    let message = query.message.as_ref()?;
    let chat = message.chat();
    if !matches!(chat.kind, ChatKind::Private(_)) {
        debug!(chat_id = chat.id.0, "ignoring non-DM callback");
        return None;
    }
    let sender = sender_of(&query.from)?;
    Some(Incoming::new(
        sender,
        chat.id.0,
        Some(message.id().0),
        Trigger::Action(action),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_json(id: u64, username: Option<&str>) -> serde_json::Value {
        let mut user = serde_json::json!({
            "id": id,
            "is_bot": false,
            "first_name": "Anna",
            "last_name": "K",
            "language_code": "ru",
        });
        if let Some(name) = username {
            user["username"] = name.into();
        }
        user
    }

    fn private_chat(id: i64) -> serde_json::Value {
        serde_json::json!({ "id": id, "type": "private", "first_name": "Anna" })
    }

    fn message_json(chat: serde_json::Value, body: serde_json::Value) -> serde_json::Value {
        let mut json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": chat,
            "from": user_json(42, Some("anna")),
        });
        for (key, value) in body.as_object().unwrap() {
            json[key] = value.clone();
        }
        json
    }

    fn text_message(text: &str) -> Message {
        serde_json::from_value(message_json(private_chat(42), serde_json::json!({ "text": text })))
            .expect("failed to deserialize mock message")
    }

    fn callback(data: &str, chat: serde_json::Value) -> CallbackQuery {
        let json = serde_json::json!({
            "id": "4382",
            "from": user_json(42, None),
            "chat_instance": "-1",
            "data": data,
            "message": message_json(chat, serde_json::json!({ "text": "menu" })),
        });
        serde_json::from_value(json).expect("failed to deserialize mock callback")
    }

    #[test]
    fn text_becomes_text_trigger() {
        let incoming = message_to_incoming(&text_message("Work")).unwrap();
        assert_eq!(incoming.trigger, Trigger::Text("Work".into()));
        assert_eq!(incoming.chat_id, 42);
        assert_eq!(incoming.message_id, Some(7));
        assert_eq!(incoming.sender.user_id, 42);
        assert_eq!(incoming.sender.username.as_deref(), Some("anna"));
        assert_eq!(incoming.sender.language_code.as_deref(), Some("ru"));
    }

    #[test]
    fn start_command_variants() {
        for text in ["/start", "/start@remindo_bot", "/start ref42"] {
            let incoming = message_to_incoming(&text_message(text)).unwrap();
            assert_eq!(incoming.trigger, Trigger::Start, "{text}");
        }
        let incoming = message_to_incoming(&text_message("/starting")).unwrap();
        assert_eq!(incoming.trigger, Trigger::Text("/starting".into()));
    }

    #[test]
    fn photo_uses_largest_size() {
        let json = message_json(
            private_chat(42),
            serde_json::json!({
                "photo": [
                    { "file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 1200 },
                    { "file_id": "big", "file_unique_id": "b", "width": 1280, "height": 960, "file_size": 98000 },
                ]
            }),
        );
        let msg: Message = serde_json::from_value(json).unwrap();
        let incoming = message_to_incoming(&msg).unwrap();
        assert_eq!(incoming.trigger, Trigger::Photo("big".into()));
    }

    #[test]
    fn group_messages_are_ignored() {
        let chat = serde_json::json!({ "id": -100123i64, "type": "supergroup", "title": "Team" });
        let msg: Message =
            serde_json::from_value(message_json(chat, serde_json::json!({ "text": "hi" }))).unwrap();
        assert!(!is_dm(&msg));
        assert!(message_to_incoming(&msg).is_none());
    }

    #[test]
    fn unsupported_content_is_ignored() {
        let json = message_json(
            private_chat(42),
            serde_json::json!({ "location": { "latitude": 55.75, "longitude": 37.61 } }),
        );
        let msg: Message = serde_json::from_value(json).unwrap();
        assert!(message_to_incoming(&msg).is_none());
    }

    #[test]
    fn button_press_carries_action_and_keyboard_message() {
        let incoming = callback_to_incoming(&callback("open_theme_t1", private_chat(42))).unwrap();
        assert_eq!(incoming.trigger, Trigger::Action(Action::OpenTheme("t1".into())));
        assert_eq!(incoming.message_id, Some(7));
        assert_eq!(incoming.sender.first_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn unknown_payload_is_ignored() {
        assert!(callback_to_incoming(&callback("bogus", private_chat(42))).is_none());
    }

    #[test]
    fn group_callbacks_are_ignored() {
        let chat = serde_json::json!({ "id": -100123i64, "type": "group", "title": "Team" });
        assert!(callback_to_incoming(&callback("main_menu", chat)).is_none());
    }
}
