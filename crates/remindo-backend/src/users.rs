// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User gateway.

use std::sync::Arc;

use async_trait::async_trait;
use remindo_core::models::User;
use remindo_core::{StorageError, UserStore};
use tracing::info;

use crate::client::{BackendClient, BackendRequest};
use crate::status::{self, Call};

const ENTITY: &str = "user";

/// [`UserStore`] backed by the `users/*` endpoints.
#[derive(Debug, Clone)]
pub struct UserGateway {
    client: Arc<BackendClient>,
}

impl UserGateway {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserStore for UserGateway {
    async fn get(&self, telegram_id: &str) -> Result<User, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::get(format!("users/get_user/{telegram_id}")))
            .await?;
        status::decode(ENTITY, &response)
    }

    async fn create(&self, user: &User) -> Result<(), StorageError> {
        let body = serde_json::to_value(user)
            .map_err(|e| StorageError::validation(format!("unserializable user: {e}")))?;
        let response = self
            .client
            .execute(&BackendRequest::post("users/create_user").json(body))
            .await?;
        status::check(ENTITY, Call::Create, &response)?;
        info!(telegram_id = user.telegram_id.as_str(), "user registered");
        Ok(())
    }

    async fn update_username(&self, telegram_id: &str, new_name: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .execute(
                &BackendRequest::patch(format!("users/update_username/{telegram_id}"))
                    .query("new_name", new_name),
            )
            .await?;
        status::check(ENTITY, Call::Write, &response)
    }

    /// The backend answers with the number of deleted users; zero means the
    /// user did not exist.
    async fn delete(&self, telegram_id: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::delete(format!("users/delete_user/{telegram_id}")))
            .await?;
        let deleted: u64 = status::decode(ENTITY, &response)?;
        if deleted == 0 {
            info!(telegram_id, "no user to delete");
            return Err(StorageError::NotFound { entity: ENTITY });
        }
        Ok(())
    }
}
