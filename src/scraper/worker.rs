//! Fetch worker
//!
//! One worker runs per channel query. It opens the provider's result stream,
//! fully reads each document into memory, and hands the payloads to the
//! collector in stream order. A worker has no side effects beyond payload
//! emission and events.
//!
//! Cancellation is observed at every suspension point (open, next item,
//! read, submit). The token is only raised externally (shutdown); a worker
//! failure does not cancel its siblings - they run to their own terminal
//! states and the coordinator discards everything on failure.

use std::sync::Arc;

use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ScrapeError;
use crate::scraper::collector::CollectorHandle;
use crate::source::SourceProvider;
use crate::types::{Event, Playlist, TimeWindow};

/// Run one fetch worker to a terminal state
///
/// Returns the number of payloads emitted on success. Terminal states map to
/// `Ok(count)` (stream exhausted) or `Err` (read failure, cancellation, or a
/// vanished collector).
pub(crate) async fn run_worker(
    channel: String,
    window: TimeWindow,
    provider: Arc<dyn SourceProvider>,
    collector: CollectorHandle,
    cancel: CancellationToken,
    events: broadcast::Sender<Event>,
) -> Result<usize, ScrapeError> {
    let _ = events.send(Event::WorkerStarted {
        channel: channel.clone(),
    });
    debug!(channel = %channel, window = %window, "worker started");

    let result = fetch_all(&channel, window, provider, &collector, &cancel, &events).await;

    match &result {
        Ok(count) => {
            debug!(channel = %channel, playlists = count, "worker complete");
            let _ = events.send(Event::WorkerComplete {
                channel: channel.clone(),
                playlists: *count,
            });
        }
        Err(err) => {
            let _ = events.send(Event::WorkerFailed {
                channel: channel.clone(),
                error: err.to_string(),
            });
        }
    }

    result
}

/// Pull every document for one channel and submit the payloads in order
async fn fetch_all(
    channel: &str,
    window: TimeWindow,
    provider: Arc<dyn SourceProvider>,
    collector: &CollectorHandle,
    cancel: &CancellationToken,
    events: &broadcast::Sender<Event>,
) -> Result<usize, ScrapeError> {
    let read_err = |source: std::io::Error| ScrapeError::Read {
        channel: channel.to_string(),
        source,
    };
    let cancelled = || ScrapeError::Cancelled {
        channel: channel.to_string(),
    };

    let mut stream = tokio::select! {
        result = provider.open(channel, window) => result.map_err(read_err)?,
        _ = cancel.cancelled() => return Err(cancelled()),
    };

    let mut count = 0usize;
    loop {
        let item = tokio::select! {
            item = stream.next() => item,
            _ = cancel.cancelled() => return Err(cancelled()),
        };
        let Some(item) = item else {
            break;
        };
        let mut reader = item.map_err(read_err)?;

        // a partially read document is never forwarded
        let mut data = Vec::new();
        tokio::select! {
            result = reader.read_to_end(&mut data) => {
                result.map_err(read_err)?;
            }
            _ = cancel.cancelled() => return Err(cancelled()),
        }

        debug!(channel, bytes = data.len(), "playlist received");
        let _ = events.send(Event::PlaylistFetched {
            channel: channel.to_string(),
            bytes: data.len(),
        });

        let playlist = Playlist::new(data);
        tokio::select! {
            result = collector.submit(playlist) => {
                result.map_err(|_| ScrapeError::CollectorClosed {
                    channel: channel.to_string(),
                })?;
            }
            _ = cancel.cancelled() => return Err(cancelled()),
        }
        count += 1;
    }

    Ok(count)
}
