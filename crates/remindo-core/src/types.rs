// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral outbound message types.

use crate::action::Action;

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Inline keyboard laid out as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row holding a single button.
    pub fn button(mut self, label: impl Into<String>, action: Action) -> Self {
        self.rows.push(vec![Button::new(label, action)]);
        self
    }

    /// Appends a row of buttons.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Iterates over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.buttons().any(|b| &b.action == action)
    }
}

/// A message the bot sends: text plus an optional inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Identifier of a message sent into a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_builder_lays_out_rows() {
        let kb = Keyboard::new()
            .button("Themes", Action::OpenAllThemes)
            .row(vec![
                Button::new("Yes", Action::Yes),
                Button::new("No", Action::No),
            ]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.buttons().count(), 3);
        assert!(kb.contains(&Action::No));
        assert!(!kb.contains(&Action::Save));
    }
}
