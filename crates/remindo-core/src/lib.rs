// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Remindo.
//!
//! Holds the entity models, the storage error taxonomy, the callback action
//! codec, outbound message types, and the collaborator traits every other
//! crate in the workspace plugs into.

pub mod action;
pub mod error;
pub mod models;
pub mod traits;
pub mod types;

pub use action::Action;
pub use error::{NotFoundExt, RemindoError, StorageError};
pub use types::{Button, Keyboard, MessageRef, Reply};

pub use traits::{
    AlarmStore, ChatSurface, Clock, NoteStore, SystemClock, ThemeStore, UserStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_traits_are_exported() {
        fn _assert_theme_store<T: ThemeStore>() {}
        fn _assert_note_store<T: NoteStore>() {}
        fn _assert_alarm_store<T: AlarmStore>() {}
        fn _assert_user_store<T: UserStore>() {}
        fn _assert_chat_surface<T: ChatSurface>() {}
    }

    #[test]
    fn storage_traits_are_object_safe() {
        fn _theme(_: &dyn ThemeStore) {}
        fn _note(_: &dyn NoteStore) {}
        fn _alarm(_: &dyn AlarmStore) {}
        fn _user(_: &dyn UserStore) {}
        fn _chat(_: &dyn ChatSurface) {}
    }
}
