// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity storage traits, one per entity kind.
//!
//! Every operation reports failures through [`StorageError`]. Implementations
//! never swallow errors; list queries report an empty relation as
//! [`StorageError::NotFound`], which callers fold with
//! [`NotFoundExt::or_empty`](crate::error::NotFoundExt::or_empty).

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::StorageError;
use crate::models::{
    Alarm, AlarmStatus, AlarmToCreate, FieldPatch, Note, NoteToCreate, Theme, ThemeToCreate, User,
};

#[async_trait]
pub trait ThemeStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Theme, StorageError>;

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Theme>, StorageError>;

    /// Creates a theme and returns its server-assigned id.
    async fn create(&self, theme: &ThemeToCreate) -> Result<String, StorageError>;

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Note, StorageError>;

    async fn get_all_by_theme(&self, theme_id: &str) -> Result<Vec<Note>, StorageError>;

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Note>, StorageError>;

    async fn create(&self, note: &NoteToCreate) -> Result<String, StorageError>;

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    async fn delete_all_by_theme(&self, theme_id: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AlarmStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Alarm, StorageError>;

    async fn get_all_by_parent(&self, note_id: &str) -> Result<Vec<Alarm>, StorageError>;

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Alarm>, StorageError>;

    /// Alarms whose fire time has elapsed and which have not been delivered.
    async fn get_all_ready(&self) -> Result<Vec<Alarm>, StorageError>;

    /// Creates an alarm firing at `next_fire_at`, repeating every
    /// `repeat_interval` seconds when given.
    async fn create(
        &self,
        alarm: &AlarmToCreate,
        next_fire_at: NaiveDateTime,
        repeat_interval: Option<i64>,
    ) -> Result<String, StorageError>;

    /// Advances a repeating alarm server-side and returns its new fire time.
    async fn postpone(&self, id: &str) -> Result<NaiveDateTime, StorageError>;

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError>;

    async fn update_status(&self, id: &str, status: AlarmStatus) -> Result<(), StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    async fn delete_all_by_parent(&self, note_id: &str) -> Result<(), StorageError>;

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, telegram_id: &str) -> Result<User, StorageError>;

    async fn create(&self, user: &User) -> Result<(), StorageError>;

    async fn update_username(&self, telegram_id: &str, new_name: &str) -> Result<(), StorageError>;

    async fn delete(&self, telegram_id: &str) -> Result<(), StorageError>;
}
