use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::info;

use crate::error::SourceError;
use crate::platform::PlatformService;

/// Platform service loading data over HTTP with a [`reqwest`] client.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

impl NativePlatformService {
    /// Creates a new service. Every request made by it fails after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SourceError> {
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            info!("Failed to load {url}: {}", response.status());
            return Err(SourceError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }
}
