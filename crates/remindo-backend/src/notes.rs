// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Note gateway.

use std::sync::Arc;

use async_trait::async_trait;
use remindo_core::models::{FieldPatch, Note, NoteToCreate};
use remindo_core::{NoteStore, StorageError};

use crate::client::{BackendClient, BackendRequest};
use crate::status::{self, Call};

const ENTITY: &str = "note";

/// [`NoteStore`] backed by the `notes/*` endpoints.
#[derive(Debug, Clone)]
pub struct NoteGateway {
    client: Arc<BackendClient>,
}

impl NoteGateway {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    async fn list(&self, path: String) -> Result<Vec<Note>, StorageError> {
        let response = self.client.execute(&BackendRequest::get(path)).await?;
        status::decode(ENTITY, &response)
    }

    async fn write(&self, request: BackendRequest) -> Result<(), StorageError> {
        let response = self.client.execute(&request).await?;
        status::check(ENTITY, Call::Write, &response)
    }
}

#[async_trait]
impl NoteStore for NoteGateway {
    async fn get(&self, id: &str) -> Result<Note, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::get(format!("notes/get_note/{id}")))
            .await?;
        status::decode(ENTITY, &response)
    }

    async fn get_all_by_theme(&self, theme_id: &str) -> Result<Vec<Note>, StorageError> {
        self.list(format!("notes/get_all_notes_by_theme_id/{theme_id}"))
            .await
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Note>, StorageError> {
        self.list(format!("notes/get_all_notes_by_user_id/{user_id}"))
            .await
    }

    async fn create(&self, note: &NoteToCreate) -> Result<String, StorageError> {
        let body = serde_json::to_value(note)
            .map_err(|e| StorageError::validation(format!("unserializable note: {e}")))?;
        let response = self
            .client
            .execute(&BackendRequest::post("notes/create_note").json(body))
            .await?;
        status::created_id(ENTITY, &response)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        self.write(
            BackendRequest::patch(format!("notes/update_note/{id}")).json(fields.clone().into()),
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.write(BackendRequest::delete(format!("notes/delete_note/{id}")))
            .await
    }

    async fn delete_all_by_theme(&self, theme_id: &str) -> Result<(), StorageError> {
        self.write(BackendRequest::delete(format!(
            "notes/delete_all_notes_by_theme_id/{theme_id}"
        )))
        .await
    }
}
