//! Batched parallel item fetches on a fixed-size worker pool.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::fetcher::RateLimitedFetcher;

/// Progress callback invoked with `(done, total)`.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// One result per requested item; failed or empty items are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<K, T> {
    pub results: Vec<(K, Option<T>)>,
}

impl<K, T> BatchOutcome<K, T> {
    /// Items that produced a value.
    pub fn present(&self) -> impl Iterator<Item = (&K, &T)> {
        self.results
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| (key, value)))
    }

    /// Keys recorded absent.
    pub fn absent(&self) -> impl Iterator<Item = &K> {
        self.results
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl RateLimitedFetcher {
    /// Fetch many independent items.
    ///
    /// `jobs` pairs each key with its endpoint path. A pool of
    /// `min(batch_workers, jobs.len())` workers drains the queue; every
    /// request still goes through the shared semaphore. Failures and empty
    /// payloads are recorded as `None` rather than failing the batch.
    /// `progress` fires every `progress_interval` completions and once more
    /// on the final one.
    pub async fn fetch_batch<K, T>(
        &self,
        jobs: Vec<(K, String)>,
        progress: Option<ProgressFn<'_>>,
    ) -> BatchOutcome<K, T>
    where
        K: Send + 'static,
        T: DeserializeOwned + Send + 'static,
    {
        let total = jobs.len();
        if total == 0 {
            return BatchOutcome {
                results: Vec::new(),
            };
        }

        let workers = self.batch_workers.min(total);
        let queue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let (tx, mut rx) = mpsc::unbounded_channel::<(K, Option<T>)>();

        let mut pool = JoinSet::new();
        for _ in 0..workers {
            let fetcher = self.clone();
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            pool.spawn(async move {
                loop {
                    let next = queue.lock().pop_front();
                    let Some((key, path)) = next else {
                        break;
                    };
                    let value = match fetcher.fetch_optional::<T>(&path).await {
                        Ok(value) => value,
                        Err(err) => {
                            warn!(path = %path, error = %err, "Batch item failed");
                            None
                        }
                    };
                    if tx.send((key, value)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let interval = self.progress_interval;
        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            results.push(result);
            let done = results.len();
            if let Some(report) = progress {
                if done % interval == 0 || done == total {
                    report(done, total);
                }
            }
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "Batch worker aborted");
            }
        }

        let outcome = BatchOutcome { results };
        debug!(
            total,
            workers,
            absent = outcome.absent().count(),
            "Batch fetch finished"
        );
        outcome
    }
}
