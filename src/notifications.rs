use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{cache::Bucket, context::AppContext, error::AppError};

/// Background refresh of the unread-notification count.
///
/// The count is refetched on a fixed interval, independent of user action,
/// and published on a watch channel. The poller stops on 401.
pub struct NotificationPoller {
    handle: JoinHandle<()>,
    receiver: watch::Receiver<Option<u64>>,
}

impl NotificationPoller {
    pub fn spawn(ctx: AppContext, interval: Duration) -> Self {
        let (sender, receiver) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Polling unread notifications every {:?}", interval);

            loop {
                ticker.tick().await;
                ctx.cache.invalidate(&[Bucket::UnreadCount]);

                match ctx.unread_count().await {
                    Ok(count) => {
                        debug!("Unread notifications: {}", count);
                        sender.send_replace(Some(count));
                    }
                    Err(AppError::Unauthorized) => {
                        warn!("Session ended, stopping notification poller");
                        sender.send_replace(None);
                        break;
                    }
                    Err(e) => warn!("Failed to refresh unread count: {}", e),
                }
            }
        });

        Self { handle, receiver }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.receiver.clone()
    }

    /// Latest published count, `None` before the first successful poll.
    pub fn latest(&self) -> Option<u64> {
        *self.receiver.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
