// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Theme gateway.

use std::sync::Arc;

use async_trait::async_trait;
use remindo_core::models::{FieldPatch, Theme, ThemeToCreate};
use remindo_core::{StorageError, ThemeStore};

use crate::client::{BackendClient, BackendRequest};
use crate::status::{self, Call};

const ENTITY: &str = "theme";

/// [`ThemeStore`] backed by the `themes/*` endpoints.
#[derive(Debug, Clone)]
pub struct ThemeGateway {
    client: Arc<BackendClient>,
}

impl ThemeGateway {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThemeStore for ThemeGateway {
    async fn get(&self, id: &str) -> Result<Theme, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::get(format!("themes/get_theme/{id}")))
            .await?;
        status::decode(ENTITY, &response)
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Theme>, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::get(format!(
                "themes/get_all_user_themes/{user_id}"
            )))
            .await?;
        status::decode(ENTITY, &response)
    }

    async fn create(&self, theme: &ThemeToCreate) -> Result<String, StorageError> {
        let body = serde_json::to_value(theme)
            .map_err(|e| StorageError::validation(format!("unserializable theme: {e}")))?;
        let response = self
            .client
            .execute(&BackendRequest::post("themes/create_theme").json(body))
            .await?;
        status::created_id(ENTITY, &response)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        let response = self
            .client
            .execute(
                &BackendRequest::patch(format!("themes/update_theme/{id}"))
                    .json(fields.clone().into()),
            )
            .await?;
        status::check(ENTITY, Call::Write, &response)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::delete(format!("themes/delete_theme/{id}")))
            .await?;
        status::check(ENTITY, Call::Write, &response)
    }

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::delete(format!(
                "themes/delete_all_user_themes/{user_id}"
            )))
            .await?;
        status::check(ENTITY, Call::Write, &response)
    }
}
