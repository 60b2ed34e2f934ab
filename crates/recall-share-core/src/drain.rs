//! Host drain path: submit queued URLs when the app becomes active.

use serde::Serialize;

use crate::error::Result;
use crate::queue::PendingQueue;
use crate::store::SharedStore;
use crate::submit::ItemsClient;

/// Summary of one drain pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// URLs the backend accepted.
    pub submitted: Vec<String>,
    /// URLs whose submission failed and went back into the queue.
    pub requeued: Vec<String>,
}

impl DrainReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.requeued.is_empty()
    }
}

/// Drain the pending queue and submit each entry through the host's own
/// authenticated client.
///
/// Entries are submitted sequentially and independently; one failure does
/// not block the rest. A failed entry is re-queued individually rather than
/// restoring the original list, so one bad entry cannot force infinite
/// retries of the whole batch. A re-queue that itself fails is logged and
/// the loop continues: the drained list exists only in memory at that
/// point, and the remaining entries still get their submission attempt.
/// Because the queue's read-then-clear can
/// re-deliver across a crash, every submission here may be a repeat; the
/// backend deduplicates.
pub async fn drain_pending<S: SharedStore + ?Sized>(
    store: &S,
    client: &ItemsClient,
    access_token: &str,
) -> Result<DrainReport> {
    let queue = PendingQueue::new(store);
    let entries = queue.drain_all()?;
    if entries.is_empty() {
        return Ok(DrainReport::default());
    }

    tracing::info!(count = entries.len(), "draining pending shared URLs");
    let mut report = DrainReport::default();

    for url in entries {
        match client.create_item(access_token, &url).await {
            Ok(status) => {
                tracing::info!(%url, status = status.as_u16(), "pending URL synced");
                report.submitted.push(url);
            }
            Err(error) => {
                tracing::warn!(%url, %error, "pending URL submission failed, re-queueing");
                match queue.requeue(&url) {
                    Ok(()) => report.requeued.push(url),
                    Err(requeue_error) => {
                        tracing::error!(%url, error = %requeue_error, "re-queue failed");
                    }
                }
            }
        }
    }

    Ok(report)
}
