//! Concurrent scrape orchestration
//!
//! The pieces, leaf first:
//! - `collector` - bounded concurrent buffer accumulating worker payloads
//! - `worker` - one fetch worker per channel query
//! - [`PlaylistScraper`] - launches the worker group, joins it, and applies
//!   the run-level error policy
//!
//! A run succeeds only if every worker exhausts its result stream. On any
//! worker failure the whole run fails: payloads already collected are
//! discarded and nothing is persisted. A failing worker does not cancel its
//! siblings - every worker runs to its own terminal state, and the reported
//! error is then selected deterministically: the read error of the
//! earliest-spawned failed worker wins, and cancellation outcomes (which
//! only arise from an external shutdown) never mask a real failure.

mod collector;
mod worker;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result, ScrapeError};
use crate::scraper::collector::Collector;
use crate::source::SourceProvider;
use crate::types::{Event, Playlist, TimeWindow};

/// Broadcast buffer for lifecycle events; lagging subscribers drop old
/// events rather than slowing the pipeline
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Concurrent playlist scraper (cloneable - all fields are shared handles)
///
/// Owns the configuration, the injected source provider, the event channel,
/// and the shutdown token. Each [`scrape`](PlaylistScraper::scrape) call is
/// an independent run; `shutdown` cancels every in-flight run.
#[derive(Clone)]
pub struct PlaylistScraper {
    /// Configuration (shared across runs and worker tasks)
    config: Arc<Config>,
    /// Source provider resolving queries into document streams
    provider: Arc<dyn SourceProvider>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: broadcast::Sender<Event>,
    /// Root cancellation token; runs derive child tokens from it
    cancel: CancellationToken,
}

impl PlaylistScraper {
    /// Create a new scraper over the given provider
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration fails validation.
    pub fn new(config: Config, provider: Arc<dyn SourceProvider>) -> Result<Self> {
        config.validate()?;
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            config: Arc::new(config),
            provider,
            event_tx,
            cancel: CancellationToken::new(),
        })
    }

    /// Subscribe to lifecycle events
    ///
    /// Subscribers are optional observers: the pipeline never waits for them
    /// and drops events past the channel capacity for lagging receivers.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Cancel every in-flight run
    ///
    /// Workers observe the cancellation at their next suspension point and
    /// report `Cancelled`; the affected runs fail with that outcome.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Scrape using the configured channel list and time window
    pub async fn run(&self) -> Result<Vec<Playlist>> {
        let channels = self.config.scrape.channels.clone();
        self.scrape(&channels, self.config.scrape.time_window).await
    }

    /// Scrape playlists for the given channels within the given time window
    ///
    /// Launches one fetch worker per entry (duplicates launch duplicate
    /// independent workers), waits for the whole group to reach a terminal
    /// state, and returns the payloads in arrival order. Zero payloads is a
    /// valid success.
    ///
    /// # Errors
    /// Returns [`Error::Scrape`] wrapping the selected worker failure when
    /// any worker fails; nothing collected by the run is preserved.
    pub async fn scrape(
        &self,
        channels: &[String],
        window: TimeWindow,
    ) -> Result<Vec<Playlist>> {
        info!(channels = channels.len(), window = %window, "scrape started");
        let _ = self.event_tx.send(Event::ScrapeStarted {
            channels: channels.len(),
            window,
        });

        if channels.is_empty() {
            let _ = self.event_tx.send(Event::ScrapeComplete { playlists: 0 });
            return Ok(Vec::new());
        }

        let cancel = self.cancel.child_token();

        // capacity invariant: never below the worker count, so a one-shot
        // burst of one payload per worker cannot wedge on the channel even
        // before the accumulate task gets scheduled
        let capacity = self.config.scrape.collector_capacity.max(channels.len());
        let collector = Collector::new(capacity);

        let mut workers = Vec::with_capacity(channels.len());
        for channel in channels {
            let handle = tokio::spawn(worker::run_worker(
                channel.clone(),
                window,
                Arc::clone(&self.provider),
                collector.handle(),
                cancel.clone(),
                self.event_tx.clone(),
            ));
            workers.push((channel.clone(), handle));
        }

        // join every worker before reporting anything: no orphaned tasks,
        // and error selection is deterministic (spawn order, read errors
        // outrank cancellation)
        let mut first_failure: Option<ScrapeError> = None;
        let mut first_cancelled: Option<ScrapeError> = None;
        for (channel, handle) in workers {
            match handle.await {
                Ok(Ok(count)) => {
                    debug!(channel = %channel, playlists = count, "worker joined");
                }
                Ok(Err(err)) => {
                    warn!(channel = %channel, error = %err, "worker failed");
                    if err.is_cancelled() {
                        if first_cancelled.is_none() {
                            first_cancelled = Some(err);
                        }
                    } else if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
                Err(join_err) => {
                    warn!(channel = %channel, error = %join_err, "worker task died");
                    if first_failure.is_none() {
                        first_failure = Some(ScrapeError::Read {
                            channel,
                            source: std::io::Error::other(join_err),
                        });
                    }
                }
            }
        }

        // always reap the accumulate task, discarding its buffer on failure
        let playlists = collector.drain().await?;

        if let Some(err) = first_failure.or(first_cancelled) {
            return Err(Error::Scrape(err));
        }

        info!(playlists = playlists.len(), "scrape complete");
        let _ = self.event_tx.send(Event::ScrapeComplete {
            playlists: playlists.len(),
        });
        Ok(playlists)
    }
}
