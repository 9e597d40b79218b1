use metrics::counter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::notification::Notification;
use crate::targetcache::Reactors;

const METRIC_FEED_NOTIFICATIONS: &str = "eventgate_feed_notifications_total";

/// Applies notifications, in arrival order, to a set of cache adapters.
pub struct FeedWorker {
    reactors: Reactors,
}

impl FeedWorker {
    pub fn new(reactors: Reactors) -> Self {
        Self { reactors }
    }

    pub fn apply(&self, notification: &Notification) {
        notification.apply(self.reactors.for_kind(notification.kind));

        debug!(
            kind = notification.kind.as_str(),
            op = notification.operation.as_str(),
            key = %notification.key,
            "Change notification applied"
        );
        counter!(
            METRIC_FEED_NOTIFICATIONS,
            "kind" => notification.kind.as_str(),
            "op" => notification.operation.as_str()
        )
        .increment(1);
    }

    /// Drain `rx` until every sender is dropped. Returns the number of notifications applied.
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) -> usize {
        let mut applied = 0;
        while let Some(notification) = rx.recv().await {
            self.apply(&notification);
            applied += 1;
        }
        info!(applied, "Feed worker drained");
        applied
    }

    pub fn spawn(self, rx: mpsc::Receiver<Notification>) -> JoinHandle<usize> {
        tokio::spawn(self.run(rx))
    }
}
