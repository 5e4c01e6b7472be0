// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder delivery job.
//!
//! On every tick the job asks the alarm store for due alarms, sends each one
//! to its owner with the notification keyboard, then advances it: repeating
//! alarms are postponed server-side, one-shot alarms are finished. Each alarm
//! is handled in isolation; one failure never blocks the rest of the tick.
//! An alarm whose notification could not be sent is left as is so the next
//! tick retries it. Delivery is at-least-once: when the send succeeds but
//! postponing or finishing fails, the alarm stays due and the owner gets the
//! same notification again on every tick until the backend accepts the
//! update.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use remindo_core::models::{Alarm, AlarmStatus};
use remindo_core::{AlarmStore, ChatSurface, NotFoundExt, RemindoError, StorageError};
use remindo_fsm::views;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What happened to one delivered alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Repeating alarm moved to its next fire time.
    Postponed(NaiveDateTime),
    Finished,
}

/// Counters for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub postponed: usize,
    pub finished: usize,
    pub failed: usize,
}

pub struct ReminderJob {
    alarms: Arc<dyn AlarmStore>,
    chat: Arc<dyn ChatSurface>,
    interval: Duration,
}

impl ReminderJob {
    pub fn new(alarms: Arc<dyn AlarmStore>, chat: Arc<dyn ChatSurface>, interval: Duration) -> Self {
        Self {
            alarms,
            chat,
            interval,
        }
    }

    /// Processes every alarm that is due right now.
    ///
    /// Only the lookup of due alarms can fail the tick as a whole.
    pub async fn tick(&self) -> Result<TickReport, StorageError> {
        let due = self.alarms.get_all_ready().await.or_empty()?;
        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };
        if due.is_empty() {
            debug!("no due alarms");
            return Ok(report);
        }

        for alarm in &due {
            match self.deliver(alarm).await {
                Ok(Delivery::Postponed(next)) => {
                    info!(alarm_id = %alarm.id, next_fire_at = %next, "alarm delivered and postponed");
                    report.postponed += 1;
                }
                Ok(Delivery::Finished) => {
                    info!(alarm_id = %alarm.id, "alarm delivered and finished");
                    report.finished += 1;
                }
                Err(err) => {
                    warn!(alarm_id = %alarm.id, user_id = %alarm.links.user_id, error = %err, "alarm delivery failed");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    async fn deliver(&self, alarm: &Alarm) -> Result<Delivery, RemindoError> {
        let chat_id: i64 = alarm.links.user_id.parse().map_err(|_| {
            RemindoError::Internal(format!(
                "alarm owner `{}` is not a chat id",
                alarm.links.user_id
            ))
        })?;
        self.chat.send(chat_id, views::notification(alarm)).await?;

        if alarm.is_repeatable {
            let next = self.alarms.postpone(&alarm.id).await?;
            Ok(Delivery::Postponed(next))
        } else {
            self.alarms
                .update_status(&alarm.id, AlarmStatus::Finished)
                .await?;
            Ok(Delivery::Finished)
        }
    }

    /// Ticks every `interval` until `cancel` fires. The first tick runs
    /// immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "reminder job running");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick().await {
                        Ok(report) if report.due > 0 => info!(
                            due = report.due,
                            postponed = report.postponed,
                            finished = report.finished,
                            failed = report.failed,
                            "reminder tick complete"
                        ),
                        Ok(_) => {}
                        Err(err) => error!(error = %err, "could not fetch due alarms"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping reminder job");
                    break;
                }
            }
        }
    }
}
