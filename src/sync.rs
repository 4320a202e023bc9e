//! Retrying delivery of pending writes.
//!
//! Board and habit operations update local state first and hand back the
//! writes the store still needs. The queue delivers them in order, retrying
//! each with exponential backoff. Writes that keep failing are reported back
//! and never rolled back locally.

use crate::{config::SyncSettings, domain::PendingWrite, storage::Storage};
use std::{collections::VecDeque, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Backoff schedule for one write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1 for the first retry)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&SyncSettings::default())
    }
}

impl From<&SyncSettings> for RetryPolicy {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: settings.base_delay(),
            max_delay: settings.max_delay(),
        }
    }
}

/// A write that exhausted its retries
#[derive(Debug, Clone, PartialEq)]
pub struct FailedWrite {
    pub write: PendingWrite,
    pub reason: String,
}

/// FIFO of writes waiting to reach the store
pub struct WriteQueue {
    storage: Arc<dyn Storage>,
    policy: RetryPolicy,
    pending: VecDeque<PendingWrite>,
}

impl WriteQueue {
    pub fn new(storage: Arc<dyn Storage>, policy: RetryPolicy) -> Self {
        Self {
            storage,
            policy,
            pending: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, writes: impl IntoIterator<Item = PendingWrite>) {
        self.pending.extend(writes);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Delivers every queued write, in order.
    ///
    /// A failing write is retried up to `max_attempts` times before it is
    /// given up on; later writes are still attempted.
    pub async fn flush(&mut self) -> Vec<FailedWrite> {
        let mut failed = Vec::new();
        while let Some(write) = self.pending.pop_front() {
            if let Err(reason) = self.deliver(&write).await {
                warn!(%write, %reason, "giving up on write");
                failed.push(FailedWrite { write, reason });
            }
        }
        failed
    }

    async fn deliver(&self, write: &PendingWrite) -> Result<(), String> {
        let mut attempt = 1;
        loop {
            match self.storage.apply(write).await {
                Ok(()) => {
                    debug!(%write, attempt, "write delivered");
                    return Ok(());
                }
                Err(err) if attempt >= self.policy.max_attempts => return Err(err.to_string()),
                Err(err) => {
                    let delay = self.policy.delay(attempt);
                    debug!(%write, attempt, ?delay, error = %err, "retrying write");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
