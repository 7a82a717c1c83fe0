//! Provides platform specific logic and [`PlatformService`] to access it.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SourceError;

/// Service providing platform specific IO in a generic way.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Loads a byte array from the given url.
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, SourceError>;

    /// Loads the given url and decodes the response as UTF-8 text.
    async fn load_text_from_url(&self, url: &str) -> Result<String, SourceError> {
        let bytes = self.load_bytes_from_url(url).await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SourceError::Malformed)
    }
}

#[cfg(feature = "native")]
pub mod native;

/// Default implementation of the [`PlatformService`] for the current platform.
#[cfg(feature = "native")]
pub type PlatformServiceImpl = native::NativePlatformService;
