// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform mapping of backend responses onto [`StorageError`].

use remindo_core::StorageError;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::client::BackendResponse;

/// The kind of call a response belongs to. Only creates map 409.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Read,
    Create,
    Write,
}

/// Maps a response status onto success or a storage error.
///
/// | status    | outcome            |
/// |-----------|--------------------|
/// | 200 / 201 | success            |
/// | 404       | NotFound           |
/// | 400 / 422 | Validation         |
/// | 409       | Duplicate (create) |
/// | other     | UnexpectedResponse |
pub(crate) fn check(
    entity: &'static str,
    call: Call,
    response: &BackendResponse,
) -> Result<(), StorageError> {
    match response.status {
        200 | 201 => Ok(()),
        404 => {
            info!(entity, "backend reported entity not found");
            Err(StorageError::NotFound { entity })
        }
        400 | 422 => {
            error!(entity, status = response.status, detail = response.body.as_str(), "backend rejected request");
            Err(StorageError::Validation {
                detail: response.body.clone(),
            })
        }
        409 if call == Call::Create => {
            info!(entity, "backend reported duplicate entity");
            Err(StorageError::Duplicate { entity })
        }
        status => {
            error!(
                entity,
                status,
                detail = response.body.as_str(),
                severity = "critical",
                "unexpected backend response status"
            );
            Err(StorageError::UnexpectedResponse {
                status,
                detail: response.body.clone(),
            })
        }
    }
}

/// Checks the status, then decodes the body.
///
/// A body that does not decode on an otherwise successful response is a
/// validation failure, not an unexpected response.
pub(crate) fn decode<T: DeserializeOwned>(
    entity: &'static str,
    response: &BackendResponse,
) -> Result<T, StorageError> {
    check(entity, Call::Read, response)?;
    serde_json::from_str(&response.body).map_err(|e| {
        error!(entity, error = %e, "failed to decode backend response");
        StorageError::validation(format!("malformed {entity} payload: {e}"))
    })
}

/// Extracts the id a create call returns, either as a JSON string or as the
/// bare body.
pub(crate) fn created_id(
    entity: &'static str,
    response: &BackendResponse,
) -> Result<String, StorageError> {
    check(entity, Call::Create, response)?;
    let id = serde_json::from_str::<String>(&response.body)
        .unwrap_or_else(|_| response.body.trim().trim_matches('"').to_string());
    if id.is_empty() {
        error!(entity, "backend returned an empty id for a created entity");
        return Err(StorageError::validation(format!("empty {entity} id in create response")));
    }
    info!(entity, id = id.as_str(), "entity created");
    Ok(id)
}
