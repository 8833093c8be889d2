use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::warn;

use super::SessionManager;
use crate::ServerQuitWatcher;

#[must_use]
pub struct SessionCleanupManagerQuitHandle {
    task: JoinHandle<()>,
}

impl SessionCleanupManagerQuitHandle {
    pub async fn wait_quit(self) {
        match self.task.await {
            Ok(()) => (),
            Err(e) => {
                warn!("SessionCleanupManager quit failed. Error: {:?}", e);
            }
        }
    }
}

/// Removes sessions which have been idle too long.
pub struct SessionCleanupManager {
    sessions: Arc<SessionManager>,
    idle_timeout: Duration,
    interval: Duration,
}

impl SessionCleanupManager {
    pub fn new_manager(
        sessions: Arc<SessionManager>,
        idle_timeout: Duration,
        interval: Duration,
        quit_notification: ServerQuitWatcher,
    ) -> SessionCleanupManagerQuitHandle {
        let manager = Self {
            sessions,
            idle_timeout,
            interval,
        };

        let task = tokio::spawn(manager.run(quit_notification));

        SessionCleanupManagerQuitHandle { task }
    }

    async fn run(self, mut quit_notification: ServerQuitWatcher) {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // First tick completes immediately

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.sessions.remove_idle(self.idle_timeout).await;
                }
                _ = quit_notification.recv() => {
                    return;
                }
            }
        }
    }
}
