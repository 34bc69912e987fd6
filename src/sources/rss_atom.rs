use std::time::Duration;

use feed_rs::parser;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use url::Url;

use crate::config::Config;
use crate::domain::Entry;
use crate::errors::{WatchError, WatchResult};
use crate::sources::traits::FeedSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one RSS/Atom/JSON feed over HTTP and maps its items to entries.
pub struct RssAtomSource {
    client: Client,
    feed_url: Url,
}

impl RssAtomSource {
    pub fn new(feed_url: &str, user_agent: &str) -> WatchResult<Self> {
        let feed_url =
            Url::parse(feed_url).map_err(|e| WatchError::InvalidUrl(e.to_string()))?;

        // Always ask for a fresh copy; offers appear and vanish quickly.
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, feed_url })
    }

    pub fn from_config(config: &Config) -> WatchResult<Self> {
        Self::new(&config.feed_url, &config.user_agent)
    }

    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    fn fetch_bytes(&self) -> WatchResult<Vec<u8>> {
        let response = self
            .client
            .get(self.feed_url.clone())
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    /// Parse entries from raw feed bytes
    pub fn entries_from_bytes(bytes: &[u8]) -> WatchResult<Vec<Entry>> {
        let parsed = parser::parse(bytes).map_err(|e| WatchError::FeedParse(e.to_string()))?;

        let entries = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());

                let link = entry
                    .links
                    .into_iter()
                    .next()
                    .map(|l| l.href)
                    .unwrap_or_default();

                let description = entry.summary.map(|s| s.content).unwrap_or_default();

                Entry::new(entry.id, title)
                    .with_link(link)
                    .with_description(description)
            })
            .collect();

        Ok(entries)
    }
}

impl FeedSource for RssAtomSource {
    fn fetch(&self) -> WatchResult<Vec<Entry>> {
        let bytes = self.fetch_bytes()?;
        Self::entries_from_bytes(&bytes)
    }
}
