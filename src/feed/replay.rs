use metrics::counter;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::warn;

use super::error::FeedError;
use super::notification::Notification;

const METRIC_FEED_SKIPPED: &str = "eventgate_feed_skipped_lines_total";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub sent: usize,
    pub skipped: usize,
}

/// Send every notification recorded in `reader`, one JSON object per line, to `tx`.
///
/// Blank lines are ignored. Lines that are not UTF-8 or do not parse are logged, counted and
/// skipped. Fails on a read error or when the receiving side has gone away.
pub async fn replay<R>(
    mut reader: R,
    tx: &mpsc::Sender<Notification>,
) -> Result<ReplayStats, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_number += 1;

        let parsed = std::str::from_utf8(&buf)
            .map_err(|err| err.to_string())
            .and_then(|line| {
                let line = line.trim();
                if line.is_empty() {
                    return Ok(None);
                }
                line.parse::<Notification>()
                    .map(Some)
                    .map_err(|err| err.to_string())
            });

        let notification = match parsed {
            Ok(Some(notification)) => notification,
            Ok(None) => continue,
            Err(error) => {
                warn!(line = line_number, %error, "Skipping unreadable feed line");
                counter!(METRIC_FEED_SKIPPED).increment(1);
                stats.skipped += 1;
                continue;
            }
        };

        tx.send(notification)
            .await
            .map_err(|_| FeedError::WorkerStopped)?;
        stats.sent += 1;
    }

    Ok(stats)
}
