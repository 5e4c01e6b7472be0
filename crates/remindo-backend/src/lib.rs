// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backend access for Remindo.
//!
//! A single [`BackendClient`] carries the shared bearer token and the
//! re-authentication logic; the four gateways translate entity operations
//! into backend paths and map responses onto
//! [`StorageError`](remindo_core::StorageError).

pub mod alarms;
pub mod client;
pub mod notes;
mod status;
pub mod themes;
pub mod users;

use std::sync::Arc;

pub use alarms::AlarmGateway;
pub use client::{BackendClient, BackendRequest, BackendResponse};
pub use notes::NoteGateway;
pub use themes::ThemeGateway;
pub use users::UserGateway;

/// All four gateways sharing one client.
#[derive(Debug, Clone)]
pub struct Gateways {
    pub themes: Arc<ThemeGateway>,
    pub notes: Arc<NoteGateway>,
    pub alarms: Arc<AlarmGateway>,
    pub users: Arc<UserGateway>,
}

impl Gateways {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self {
            themes: Arc::new(ThemeGateway::new(client.clone())),
            notes: Arc::new(NoteGateway::new(client.clone())),
            alarms: Arc::new(AlarmGateway::new(client.clone())),
            users: Arc::new(UserGateway::new(client)),
        }
    }
}
