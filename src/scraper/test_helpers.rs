//! Shared test helpers for driving the scraper against scripted providers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use crate::config::Config;
use crate::scraper::PlaylistScraper;
use crate::source::{PlaylistReader, PlaylistStream, SourceProvider};
use crate::types::TimeWindow;

/// One scripted stream item for a stub channel
#[derive(Clone)]
pub(crate) enum StubItem {
    /// A document that reads fully into the given bytes
    Payload(Vec<u8>),
    /// The stream itself yields an error in place of a document
    BrokenItem(&'static str),
    /// A document whose reader fails on the first read
    BrokenRead(&'static str),
    /// A document whose reader yields some bytes, then fails
    PartialRead(Vec<u8>, &'static str),
    /// The stream never yields again (used to probe cancellation)
    Stall,
}

/// Per-channel script: an optional delay before each item, then the items
#[derive(Clone, Default)]
struct ChannelScript {
    delay: Option<Duration>,
    jitter: bool,
    items: Vec<StubItem>,
}

/// Scripted in-memory source provider
#[derive(Default)]
pub(crate) struct StubProvider {
    scripts: HashMap<String, ChannelScript>,
}

impl StubProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Script a channel's items
    pub(crate) fn channel(mut self, query: &str, items: Vec<StubItem>) -> Self {
        self.scripts.insert(
            query.to_string(),
            ChannelScript {
                delay: None,
                jitter: false,
                items,
            },
        );
        self
    }

    /// Script a channel whose every item is preceded by a fixed delay
    pub(crate) fn channel_with_delay(
        mut self,
        query: &str,
        delay: Duration,
        items: Vec<StubItem>,
    ) -> Self {
        self.scripts.insert(
            query.to_string(),
            ChannelScript {
                delay: Some(delay),
                jitter: false,
                items,
            },
        );
        self
    }

    /// Script a channel whose items arrive after small random delays
    pub(crate) fn channel_with_jitter(mut self, query: &str, items: Vec<StubItem>) -> Self {
        self.scripts.insert(
            query.to_string(),
            ChannelScript {
                delay: None,
                jitter: true,
                items,
            },
        );
        self
    }
}

#[async_trait]
impl SourceProvider for StubProvider {
    async fn open(&self, query: &str, _window: TimeWindow) -> std::io::Result<PlaylistStream> {
        let script = self.scripts.get(query).cloned().unwrap_or_default();
        let delay = script.delay;
        let jitter = script.jitter;
        let stream = futures::stream::iter(script.items).then(move |item| async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if jitter {
                use rand::Rng;
                let millis = rand::thread_rng().gen_range(0..4);
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            match item {
                StubItem::Payload(data) => {
                    Ok(Box::new(std::io::Cursor::new(data)) as PlaylistReader)
                }
                StubItem::BrokenItem(msg) => Err(std::io::Error::other(msg)),
                StubItem::BrokenRead(msg) => {
                    let reader = tokio_test::io::Builder::new()
                        .read_error(std::io::Error::other(msg))
                        .build();
                    Ok(Box::new(reader) as PlaylistReader)
                }
                StubItem::PartialRead(data, msg) => {
                    let reader = tokio_test::io::Builder::new()
                        .read(&data)
                        .read_error(std::io::Error::other(msg))
                        .build();
                    Ok(Box::new(reader) as PlaylistReader)
                }
                StubItem::Stall => futures::future::pending().await,
            }
        });
        Ok(Box::pin(stream))
    }
}

/// Build a scraper over the given provider with default configuration
pub(crate) fn test_scraper(provider: StubProvider) -> PlaylistScraper {
    PlaylistScraper::new(Config::default(), Arc::new(provider)).unwrap()
}

/// Build a scraper with a customized configuration
pub(crate) fn test_scraper_with_config(provider: StubProvider, config: Config) -> PlaylistScraper {
    PlaylistScraper::new(config, Arc::new(provider)).unwrap()
}

/// Shorthand for a list of channel name strings
pub(crate) fn channels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
