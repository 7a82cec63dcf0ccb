use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::CharacterPage;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote source of character pages.
#[async_trait]
pub trait CharacterApi: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<CharacterPage>;
}

pub struct HttpCharacterApi {
    http: Client,
    base_url: String,
}

impl HttpCharacterApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid api base url '{base_url}'"))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("api base url must be http(s): '{base_url}'"));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CharacterApi for HttpCharacterApi {
    async fn fetch_page(&self, page: u32) -> Result<CharacterPage> {
        let url = format!("{}/character/", self.base_url);
        debug!(%url, page, "requesting character page");

        let body: CharacterPage = self
            .http
            .get(&url)
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed character page body")?;

        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
