// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `remindo serve` command implementation.
//!
//! Wires the backend gateways, the conversation engine, the reminder job and
//! the Telegram transport together, then runs until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use remindo_backend::{BackendClient, Gateways};
use remindo_config::RemindoConfig;
use remindo_core::{ChatSurface, RemindoError, SystemClock};
use remindo_cron::ReminderJob;
use remindo_fsm::{Dispatch, Engine, MemoryStateStore, Stores};
use remindo_telegram::TelegramChannel;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the bot until a shutdown signal arrives.
pub async fn run_serve(config: RemindoConfig) -> Result<(), RemindoError> {
    init_tracing(&config.bot.log_level);

    info!("starting remindo serve");

    run_serve_with(config, shutdown::install_signal_handler()).await
}

/// Wires every component and runs until `cancel` fires or polling stops.
async fn run_serve_with(config: RemindoConfig, cancel: CancellationToken) -> Result<(), RemindoError> {
    let client = Arc::new(BackendClient::from_config(&config.backend)?);
    let gateways = Gateways::new(client);
    let stores = Stores::new(
        gateways.themes.clone(),
        gateways.notes.clone(),
        gateways.alarms.clone(),
        gateways.users.clone(),
    );

    let channel = TelegramChannel::new(&config.telegram)?;
    let chat: Arc<dyn ChatSurface> = Arc::new(channel.surface());

    let engine = Engine::new(
        stores,
        chat.clone(),
        Arc::new(MemoryStateStore::new()),
        Arc::new(SystemClock),
    );
    let dispatch: Arc<dyn Dispatch> = Arc::new(engine.layered());

    let reminders = if config.reminders.enabled {
        let job = ReminderJob::new(
            gateways.alarms.clone(),
            chat,
            Duration::from_secs(config.reminders.poll_interval_secs),
        );
        let job_cancel = cancel.clone();
        info!(
            interval_secs = config.reminders.poll_interval_secs,
            "reminder job enabled"
        );
        Some(tokio::spawn(async move { job.run(job_cancel).await }))
    } else {
        info!("reminder job disabled");
        None
    };

    channel.run(dispatch, cancel.clone()).await;

    // Polling can also stop on its own; make sure the job follows.
    cancel.cancel();
    if let Some(handle) = reminders
        && let Err(e) = handle.await
    {
        warn!(error = %e, "reminder job task ended abnormally");
    }

    info!("remindo serve shutdown complete");
    Ok(())
}

/// Crates that log under `bot.log_level`; everything else stays at `warn`.
const LOG_TARGETS: &[&str] = &[
    "remindo",
    "remindo_core",
    "remindo_backend",
    "remindo_fsm",
    "remindo_cron",
    "remindo_telegram",
];

fn default_filter(log_level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
