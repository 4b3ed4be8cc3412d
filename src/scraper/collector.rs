//! Result collector
//!
//! A bounded concurrent buffer sitting between the fetch workers and the
//! coordinator. Workers submit payloads through cloned [`CollectorHandle`]s;
//! an accumulate task consumes the channel concurrently with the workers, so
//! the channel capacity is a backpressure bound only and can never deadlock
//! a run, no matter how many payloads a single worker emits.
//!
//! Draining consumes the collector by value, which makes a second drain
//! unrepresentable. The coordinator drops the last handle before draining,
//! closing the producer side; the accumulate task then returns the buffer in
//! arrival order.

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::types::Playlist;

/// Accumulates payloads emitted by all fetch workers into one ordered buffer
pub(crate) struct Collector {
    tx: mpsc::Sender<Playlist>,
    task: tokio::task::JoinHandle<Vec<Playlist>>,
}

/// Submit capability handed to each fetch worker
#[derive(Clone)]
pub(crate) struct CollectorHandle {
    tx: mpsc::Sender<Playlist>,
}

impl Collector {
    /// Create a collector with the given channel capacity (clamped to >= 1)
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            while let Some(playlist) = rx.recv().await {
                buffer.push(playlist);
            }
            buffer
        });
        Self { tx, task }
    }

    /// Clone a submit handle for one producer
    pub(crate) fn handle(&self) -> CollectorHandle {
        CollectorHandle {
            tx: self.tx.clone(),
        }
    }

    /// Close the producer side and return the accumulated payloads
    ///
    /// Valid only once all producers are terminal: callers must have joined
    /// every worker (dropping their handles) before draining, otherwise this
    /// suspends until the last straggler is done.
    pub(crate) async fn drain(self) -> Result<Vec<Playlist>> {
        drop(self.tx);
        self.task
            .await
            .map_err(|e| Error::Other(format!("collector task failed: {e}")))
    }
}

impl CollectorHandle {
    /// Append one payload to the buffer, in arrival order
    ///
    /// Suspends while the channel is at capacity (backpressure). Fails only
    /// if the collector is gone, which a worker treats as fatal.
    pub(crate) async fn submit(&self, playlist: Playlist) -> std::result::Result<(), Playlist> {
        self.tx.send(playlist).await.map_err(|err| err.0)
    }
}
