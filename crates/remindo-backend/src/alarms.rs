// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alarm gateway.
//!
//! Besides the common entity operations this exposes the due-alarm query
//! and the two lifecycle calls used by the reminder job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use remindo_core::models::{
    format_backend_time, parse_backend_time, Alarm, AlarmStatus, AlarmToCreate, FieldPatch,
};
use remindo_core::{AlarmStore, StorageError};
use serde::Deserialize;
use tracing::{error, info};

use crate::client::{BackendClient, BackendRequest};
use crate::status::{self, Call};

const ENTITY: &str = "alarm";

#[derive(Deserialize)]
struct Postponed {
    next_notion_time: String,
}

/// [`AlarmStore`] backed by the `alarms/*` endpoints.
#[derive(Debug, Clone)]
pub struct AlarmGateway {
    client: Arc<BackendClient>,
}

impl AlarmGateway {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    async fn list(&self, path: String) -> Result<Vec<Alarm>, StorageError> {
        let response = self.client.execute(&BackendRequest::get(path)).await?;
        status::decode(ENTITY, &response)
    }

    async fn write(&self, request: BackendRequest) -> Result<(), StorageError> {
        let response = self.client.execute(&request).await?;
        status::check(ENTITY, Call::Write, &response)
    }
}

#[async_trait]
impl AlarmStore for AlarmGateway {
    async fn get(&self, id: &str) -> Result<Alarm, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::get(format!("alarms/get_alarm/{id}")))
            .await?;
        status::decode(ENTITY, &response)
    }

    async fn get_all_by_parent(&self, note_id: &str) -> Result<Vec<Alarm>, StorageError> {
        self.list(format!("alarms/get_all_alarm_by_parent_id/{note_id}"))
            .await
    }

    async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<Alarm>, StorageError> {
        self.list(format!("alarms/get_all_user_alarms/{user_id}"))
            .await
    }

    async fn get_all_ready(&self) -> Result<Vec<Alarm>, StorageError> {
        self.list("alarms/get_all_ready_alarms".to_string()).await
    }

    async fn create(
        &self,
        alarm: &AlarmToCreate,
        next_fire_at: NaiveDateTime,
        repeat_interval: Option<i64>,
    ) -> Result<String, StorageError> {
        let body = serde_json::to_value(alarm)
            .map_err(|e| StorageError::validation(format!("unserializable alarm: {e}")))?;
        let mut request = BackendRequest::post("alarms/create_alarm")
            .query("next_notion_time", format_backend_time(&next_fire_at))
            .json(body);
        if let Some(interval) = repeat_interval {
            request = request.query("repeat_interval", interval.to_string());
        }
        let response = self.client.execute(&request).await?;
        status::created_id(ENTITY, &response)
    }

    async fn postpone(&self, id: &str) -> Result<NaiveDateTime, StorageError> {
        let response = self
            .client
            .execute(&BackendRequest::patch(format!(
                "alarms/postpone_repeatable_alarm/{id}"
            )))
            .await?;
        let postponed: Postponed = status::decode(ENTITY, &response)?;
        let next = parse_backend_time(&postponed.next_notion_time).ok_or_else(|| {
            error!(
                id,
                raw = postponed.next_notion_time.as_str(),
                "unparseable postponed fire time"
            );
            StorageError::validation(format!(
                "unparseable next_notion_time `{}`",
                postponed.next_notion_time
            ))
        })?;
        info!(id, next = %next, "alarm postponed");
        Ok(next)
    }

    async fn patch(&self, id: &str, fields: &FieldPatch) -> Result<(), StorageError> {
        self.write(
            BackendRequest::patch(format!("alarms/update_alarm/{id}")).json(fields.clone().into()),
        )
        .await
    }

    async fn update_status(&self, id: &str, status: AlarmStatus) -> Result<(), StorageError> {
        self.write(
            BackendRequest::patch(format!("alarms/update_alarm_status/{id}"))
                .query("new_status", status.to_string()),
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.write(BackendRequest::delete(format!("alarms/delete_alarm_by_id/{id}")))
            .await
    }

    async fn delete_all_by_parent(&self, note_id: &str) -> Result<(), StorageError> {
        self.write(BackendRequest::delete(format!(
            "alarms/delete_all_alarm_by_parent/{note_id}"
        )))
        .await
    }

    async fn delete_all_by_user(&self, user_id: &str) -> Result<(), StorageError> {
        self.write(BackendRequest::delete(format!(
            "alarms/delete_all_user_alarms/{user_id}"
        )))
        .await
    }
}
