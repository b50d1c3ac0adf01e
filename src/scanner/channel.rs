//! Result channel between probes and the reporter.
//!
//! An unbounded multi-producer/single-consumer queue with a completion
//! barrier: every pushed item counts as outstanding until the consumer marks
//! it done, and [`ResultSender::join`] resolves once nothing is outstanding.
//! This lets the orchestrator wait for "every result printed or filtered"
//! without looking inside the reporter loop.

use crate::error::ChannelError;
use crate::scanner::traits::ScanResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tracing::debug;

#[derive(Debug, Default)]
struct Shared {
    outstanding: AtomicUsize,
    drained: Notify,
}

impl Shared {
    fn finish_one(&self) -> Result<(), ChannelError> {
        let previous = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| ChannelError::TooManyTaskDone)?;

        if previous == 1 {
            self.drained.notify_waiters();
        }
        Ok(())
    }
}

/// Producer half. Cheap to clone; one per probe task.
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::UnboundedSender<ScanResult>,
    shared: Arc<Shared>,
}

/// Consumer half. Only one exists per channel.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::UnboundedReceiver<ScanResult>,
    shared: Arc<Shared>,
}

/// Create a connected sender/receiver pair.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let shared = Arc::new(Shared::default());

    (
        ResultSender {
            tx,
            shared: Arc::clone(&shared),
        },
        ResultReceiver { rx, shared },
    )
}

impl ResultSender {
    /// Enqueue a result. Never blocks.
    pub fn push(&self, result: ScanResult) {
        self.shared.outstanding.fetch_add(1, Ordering::AcqRel);

        if let Err(mpsc::error::SendError(lost)) = self.tx.send(result) {
            // Receiver is gone; nobody will ever mark this one done.
            debug!(host = %lost.host, port = %lost.port, "result dropped, receiver closed");
            let _ = self.shared.finish_one();
        }
    }

    /// Number of items pushed but not yet marked done.
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::Acquire)
    }

    /// Wait until every pushed item has been received and marked done.
    ///
    /// Resolves immediately when nothing is outstanding.
    pub async fn join(&self) {
        loop {
            let drained = self.shared.drained.notified();
            tokio::pin!(drained);
            // Register before checking so a wake-up between the check and the
            // await is not lost.
            drained.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            drained.await;
        }
    }
}

impl ResultReceiver {
    /// Wait for the next result, in the order results were pushed.
    ///
    /// Returns `None` only once every sender has been dropped and the queue
    /// is empty.
    pub async fn recv(&mut self) -> Option<ScanResult> {
        self.rx.recv().await
    }

    /// Mark one received item as processed.
    pub fn task_done(&self) -> Result<(), ChannelError> {
        self.shared.finish_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::Reason;
    use crate::types::{Host, Port};
    use tokio_test::{assert_pending, assert_ready, task};

    fn result(port: u64) -> ScanResult {
        ScanResult::new(Host::new("h").unwrap(), Port::new(port), Reason::Refused, "svc")
    }

    #[tokio::test]
    async fn test_preserves_push_order() {
        let (tx, mut rx) = result_channel();
        for port in [3, 1, 2] {
            tx.push(result(port));
        }

        for expected in [3, 1, 2] {
            let got = rx.recv().await.unwrap();
            assert_eq!(got.port, Port::new(expected));
            rx.task_done().unwrap();
        }
    }

    #[tokio::test]
    async fn test_join_on_empty_channel_is_immediate() {
        let (tx, _rx) = result_channel();
        tx.join().await;
        assert_eq!(tx.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_join_waits_for_task_done() {
        let (tx, mut rx) = result_channel();
        tx.push(result(1));
        tx.push(result(2));

        let mut join = task::spawn(tx.join());
        assert_pending!(join.poll());

        // Retrieval alone does not count.
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        assert_pending!(join.poll());

        rx.task_done().unwrap();
        assert_pending!(join.poll());

        rx.task_done().unwrap();
        assert!(join.is_woken());
        assert_ready!(join.poll());
    }

    #[tokio::test]
    async fn test_too_many_task_done() {
        let (tx, mut rx) = result_channel();
        tx.push(result(1));
        rx.recv().await.unwrap();

        assert_eq!(rx.task_done(), Ok(()));
        assert_eq!(rx.task_done(), Err(ChannelError::TooManyTaskDone));
        assert_eq!(tx.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_many_producers() {
        let (tx, mut rx) = result_channel();

        let producers: Vec<_> = (0..8u64)
            .map(|i| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    for j in 0..10 {
                        tx.push(result(i * 100 + j));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }
        assert_eq!(tx.outstanding(), 80);

        let consumer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(r) = rx.recv().await {
                seen.push(r.port.as_u64());
                rx.task_done().unwrap();
                if seen.len() == 80 {
                    break;
                }
            }
            seen
        });

        tx.join().await;
        let seen = consumer.await.unwrap();
        assert_eq!(seen.len(), 80);

        // Per-producer order survives interleaving.
        for i in 0..8u64 {
            let mine: Vec<u64> = seen.iter().copied().filter(|p| p / 100 == i).collect();
            assert!(mine.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[tokio::test]
    async fn test_push_after_receiver_dropped() {
        let (tx, rx) = result_channel();
        drop(rx);
        tx.push(result(1));
        assert_eq!(tx.outstanding(), 0);
        tx.join().await;
    }
}
