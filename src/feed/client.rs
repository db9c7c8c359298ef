// Menu feed HTTP client.
// Fetches the remote menu document once per request; no retries.

use std::future::Future;

use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{info, warn};

use crate::error::{LemonError, Result};
use crate::menu::NewMenuItem;

use super::types::normalize_feed;

/// Source of the remote menu.
pub trait MenuFeed: Send + Sync {
    /// Fetch the feed and return normalized rows ready for the cache.
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<NewMenuItem>>> + Send;
}

/// HTTP client for the JSON menu feed.
pub struct FeedClient {
    client: Client,
    feed_url: String,
    image_base_url: String,
}

impl FeedClient {
    pub fn new(feed_url: impl Into<String>, image_base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("lemon-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(LemonError::Network)?;

        Ok(Self {
            client,
            feed_url: feed_url.into(),
            image_base_url: image_base_url.into(),
        })
    }
}

impl MenuFeed for FeedClient {
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<NewMenuItem>>> + Send {
        async move {
            info!(url = %self.feed_url, "Fetching menu feed");
            let response = self.client.get(&self.feed_url).send().await?;

            let status = response.status();
            if !status.is_success() {
                warn!(%status, "Menu feed request failed");
                return Err(LemonError::FeedStatus {
                    status: status.as_u16(),
                });
            }

            let body = response.text().await?;
            let items = normalize_feed(&body, &self.image_base_url)?;
            info!(count = items.len(), "Fetched menu feed");
            Ok(items)
        }
    }
}
