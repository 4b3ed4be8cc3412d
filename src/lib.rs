//! # iptv-dl
//!
//! Concurrent IPTV playlist scraper and downloader.
//!
//! ## Design Philosophy
//!
//! iptv-dl is designed to be:
//! - **Library-first** - the bundled CLI is a thin consumer of this crate
//! - **Provider-agnostic** - the search protocol sits behind a trait;
//!   bring your own [`SourceProvider`] or use the bundled HTTP one
//! - **All-or-nothing** - a run either collects every worker's results or
//!   fails with the first worker error; partial runs are never persisted
//! - **Event-driven** - consumers subscribe to run events, no polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use iptv_dl::{Config, HttpSourceProvider, PlaylistScraper, PlaylistWriter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.scrape.channels = vec!["sky calcio".to_string()];
//!     config.provider.base_url = "https://playlists.example.net/search".to_string();
//!
//!     let provider = Arc::new(HttpSourceProvider::new(&config.provider)?);
//!     let scraper = PlaylistScraper::new(config.clone(), provider)?;
//!
//!     // Subscribe to run events
//!     let mut events = scraper.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let playlists = scraper.run().await?;
//!     let persisted = PlaylistWriter::new(config.output).persist(&playlists).await?;
//!     println!("{} playlists in {}", persisted.files.len(), persisted.directory.display());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Playlist persistence (dated directories, numbered files)
pub mod persist;
/// Retry logic with exponential backoff
pub mod retry;
/// Concurrent scrape orchestration (workers, collector, coordinator)
pub mod scraper;
/// Source provider boundary and the bundled HTTP implementation
pub mod source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, OutputConfig, ProviderConfig, RetryConfig, ScrapeConfig};
pub use error::{Error, Result, ScrapeError, WriteError};
pub use persist::{PersistedRun, PlaylistWriter};
pub use scraper::PlaylistScraper;
pub use source::{HttpSourceProvider, PlaylistReader, PlaylistStream, SourceProvider};
pub use types::{Event, Playlist, TimeWindow};
