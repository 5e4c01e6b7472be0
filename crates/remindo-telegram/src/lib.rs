// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for Remindo.
//!
//! Long-polls the Bot API via teloxide, translates private-chat updates into
//! engine events, and implements [`ChatSurface`](remindo_core::ChatSurface)
//! for outbound replies with inline keyboards.

pub mod handler;
pub mod surface;

use std::sync::Arc;

use remindo_config::model::TelegramConfig;
use remindo_core::RemindoError;
use remindo_fsm::Dispatch;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use surface::{TelegramSurface, inline_markup};

/// Telegram polling front end.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Creates the channel. Requires `telegram.bot_token`.
    pub fn new(config: &TelegramConfig) -> Result<Self, RemindoError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            RemindoError::Config("telegram.bot_token is required".into())
        })?;
        if token.trim().is_empty() {
            return Err(RemindoError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Outbound surface sharing this channel's bot.
    pub fn surface(&self) -> TelegramSurface {
        TelegramSurface::new(self.bot.clone())
    }

    /// Polls for updates and feeds them to `dispatch` until `cancel` fires.
    pub async fn run(self, dispatch: Arc<dyn Dispatch>, cancel: CancellationToken) {
        let schema = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_callback_query().endpoint(on_callback));

        let mut dispatcher = Dispatcher::builder(self.bot, schema)
            .dependencies(dptree::deps![dispatch])
            .default_handler(|_| async {})
            .build();

        let shutdown = dispatcher.shutdown_token();
        tokio::spawn(async move {
            cancel.cancelled().await;
            match shutdown.shutdown() {
                Ok(done) => done.await,
                Err(_) => debug!("dispatcher was idle at shutdown"),
            }
        });

        info!("starting Telegram long polling");
        dispatcher.dispatch().await;
        info!("Telegram polling stopped");
    }
}

async fn forward(dispatch: &dyn Dispatch, incoming: remindo_fsm::Incoming) {
    if let Err(err) = dispatch.dispatch(&incoming).await {
        error!(user_id = incoming.sender.user_id, error = %err, "dispatch failed");
    }
}

async fn on_message(msg: Message, dispatch: Arc<dyn Dispatch>) -> ResponseResult<()> {
    if let Some(incoming) = handler::message_to_incoming(&msg) {
        forward(dispatch.as_ref(), incoming).await;
    }
    respond(())
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    dispatch: Arc<dyn Dispatch>,
) -> ResponseResult<()> {
    // Stops the client-side spinner whatever happens next.
    if let Err(err) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %err, "failed to answer callback query");
    }
    if let Some(incoming) = handler::callback_to_incoming(&query) {
        forward(dispatch.as_ref(), incoming).await;
    }
    respond(())
}
