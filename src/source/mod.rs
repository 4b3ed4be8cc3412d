//! Source provider boundary
//!
//! A [`SourceProvider`] turns a channel query into a sequence of readable
//! byte-streams, one per playlist document found. The scrape pipeline only
//! ever talks to this trait; the bundled [`HttpSourceProvider`] is the
//! default implementation, and tests inject in-memory providers.

mod http;

pub use http::HttpSourceProvider;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use tokio::io::AsyncRead;

use crate::types::TimeWindow;

/// One playlist document, exposed as a readable byte-stream
///
/// Document size is unbounded; consumers must read the stream fully before
/// treating the bytes as a payload.
pub type PlaylistReader = Box<dyn AsyncRead + Send + Unpin>;

/// The sequence of playlist documents found for one query
///
/// Items may fail individually (e.g. a document URL that stopped resolving);
/// the consumer decides whether an item failure is fatal. The scrape worker
/// treats any item failure as fatal to its channel.
pub type PlaylistStream = Pin<Box<dyn Stream<Item = std::io::Result<PlaylistReader>> + Send>>;

/// A capability that searches for playlist documents matching a query
///
/// Implementations perform whatever protocol is needed to resolve a channel
/// query into documents. Errors are surfaced as `std::io::Error` at this
/// boundary: the pipeline consumes opaque byte-streams and does not inspect
/// provider-specific failure detail beyond the error chain.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Open the result stream for one query
    ///
    /// Returns the (possibly empty) sequence of playlist documents matching
    /// `query` within `window`. An error here is fatal to the querying
    /// worker.
    async fn open(&self, query: &str, window: TimeWindow) -> std::io::Result<PlaylistStream>;
}
