//! Error types for iptv-dl
//!
//! This module provides comprehensive error handling for the library, including:
//! - Domain-specific error types (Scrape, Write, Config)
//! - Structured variants carrying the failing channel, file index, or config key
//! - A `Result` alias used throughout the crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for iptv-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for iptv-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "provider.base_url")
        key: Option<String>,
    },

    /// A scrape run failed; wraps the first worker failure observed
    #[error("scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    /// Playlist persistence failed
    #[error("persist failed: {0}")]
    Write(#[from] WriteError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Worker-level scrape errors
///
/// A worker terminates with one of these; the coordinator selects the error
/// reported for the whole run after every worker has reached a terminal state.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A result stream for a channel could not be opened or fully read.
    /// Partially read payloads are discarded, never forwarded.
    #[error("channel {channel:?}: could not read playlist data: {source}")]
    Read {
        /// The channel query whose worker failed
        channel: String,
        /// The underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// The worker observed cancellation and abandoned its in-flight work
    #[error("channel {channel:?}: scrape cancelled")]
    Cancelled {
        /// The channel query whose worker was cancelled
        channel: String,
    },

    /// The collector went away while the worker still had payloads to hand off
    #[error("channel {channel:?}: collector closed before worker finished")]
    CollectorClosed {
        /// The channel query whose worker was orphaned
        channel: String,
    },
}

impl ScrapeError {
    /// The channel query of the worker that produced this error
    pub fn channel(&self) -> &str {
        match self {
            ScrapeError::Read { channel, .. }
            | ScrapeError::Cancelled { channel }
            | ScrapeError::CollectorClosed { channel } => channel,
        }
    }

    /// Whether this error is a cancellation outcome rather than a real failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScrapeError::Cancelled { .. })
    }
}

/// Persistence errors
///
/// The writer stops at the first failure; files written before it remain on
/// disk (partial output is documented behavior, there is no rollback).
#[derive(Debug, Error)]
pub enum WriteError {
    /// The dated output directory could not be created
    #[error("could not create output directory {path}: {source}", path = .path.display())]
    CreateDir {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying filesystem failure
        #[source]
        source: std::io::Error,
    },

    /// A playlist file could not be written
    #[error("could not write playlist {index} to {path}: {source}", path = .path.display())]
    WriteFile {
        /// 1-based index of the playlist within the run
        index: usize,
        /// The file path that could not be written
        path: PathBuf,
        /// The underlying filesystem failure
        #[source]
        source: std::io::Error,
    },
}
