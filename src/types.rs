//! Core types for iptv-dl

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Time window scoping how far back a channel search reaches
///
/// Carried as a single-letter code (`H`, `D`, `W`) on the wire and in
/// serialized form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Last hour
    #[serde(rename = "H")]
    Hour,
    /// Last day (default)
    #[default]
    #[serde(rename = "D")]
    Day,
    /// Last week
    #[serde(rename = "W")]
    Week,
}

impl TimeWindow {
    /// The single-letter wire code for this window
    pub fn code(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "H",
            TimeWindow::Day => "D",
            TimeWindow::Week => "W",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" => Ok(TimeWindow::Hour),
            "D" | "d" => Ok(TimeWindow::Day),
            "W" | "w" => Ok(TimeWindow::Week),
            other => Err(Error::Config {
                message: format!("invalid time window {other:?} (expected H, D or W)"),
                key: None,
            }),
        }
    }
}

/// One fully read playlist document
///
/// The content is opaque to the scrape pipeline; it is read fully into memory
/// by a worker and handed off to the collector, then to the writer, without
/// inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist(Vec<u8>);

impl Playlist {
    /// Create a playlist from its raw bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// The raw playlist bytes
    pub fn data(&self) -> &[u8] {
        &self.0
    }

    /// Size of the playlist in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the playlist document is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the playlist, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Playlist {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl AsRef<[u8]> for Playlist {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Event emitted during a scrape run
///
/// Events are broadcast to subscribers as the run progresses; sending never
/// blocks the pipeline and the no-subscriber case is ignored, so observers
/// cannot affect correctness.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A scrape run started
    ScrapeStarted {
        /// Number of channel queries in the run
        channels: usize,
        /// Time window scoping the run
        window: TimeWindow,
    },

    /// A fetch worker started for one channel
    WorkerStarted {
        /// The channel being searched
        channel: String,
    },

    /// A worker fully read one playlist and handed it to the collector
    PlaylistFetched {
        /// The channel the playlist was found for
        channel: String,
        /// Playlist size in bytes
        bytes: usize,
    },

    /// A worker exhausted its result stream
    WorkerComplete {
        /// The channel the worker was searching
        channel: String,
        /// Number of playlists the worker emitted
        playlists: usize,
    },

    /// A worker terminated with an error
    WorkerFailed {
        /// The channel the worker was searching
        channel: String,
        /// Human-readable failure description
        error: String,
    },

    /// All workers finished and the run's results were collected
    ScrapeComplete {
        /// Total number of playlists collected
        playlists: usize,
    },
}
