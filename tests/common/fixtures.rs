//! Scripted in-memory source providers for end-to-end tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use iptv_dl::{
    Config, PlaylistReader, PlaylistScraper, PlaylistStream, SourceProvider, TimeWindow,
};

/// One scripted result for a channel
#[derive(Clone)]
pub enum Scripted {
    /// A document that reads fully into the given bytes
    Payload(Vec<u8>),
    /// A document whose stream item fails
    Broken(&'static str),
}

/// Source provider answering from an in-memory script
#[derive(Default)]
pub struct ScriptedProvider {
    results: HashMap<String, Vec<Scripted>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(mut self, query: &str, items: Vec<Scripted>) -> Self {
        self.results.insert(query.to_string(), items);
        self
    }
}

#[async_trait]
impl SourceProvider for ScriptedProvider {
    async fn open(&self, query: &str, _window: TimeWindow) -> std::io::Result<PlaylistStream> {
        let items = self.results.get(query).cloned().unwrap_or_default();
        let stream = futures::stream::iter(items).map(|item| match item {
            Scripted::Payload(data) => {
                Ok(Box::new(std::io::Cursor::new(data)) as PlaylistReader)
            }
            Scripted::Broken(msg) => Err(std::io::Error::other(msg)),
        });
        Ok(Box::pin(stream))
    }
}

/// Build a scraper over a scripted provider, writing under the given base dir
pub fn scraper_with_output(
    provider: ScriptedProvider,
    base_dir: &std::path::Path,
) -> (PlaylistScraper, Config) {
    let mut config = Config::default();
    config.output.base_dir = base_dir.to_path_buf();
    let scraper = PlaylistScraper::new(config.clone(), Arc::new(provider))
        .expect("default config must validate");
    (scraper, config)
}

/// Shorthand for a list of channel name strings
pub fn channels(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
