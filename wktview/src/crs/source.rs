use async_trait::async_trait;
use wktview_types::CrsId;

use crate::config::ResolverConfig;
use crate::error::SourceError;
use crate::platform::PlatformService;

/// Remote store of projection definitions, consulted on cache misses.
#[async_trait]
pub trait CrsSource: Send + Sync {
    /// Loads the definition text of the given system.
    async fn load_definition(&self, id: CrsId) -> Result<String, SourceError>;
}

/// Loads definitions from `<authority_url>/<code>.<format>` with a [`PlatformService`].
pub struct PlatformCrsSource<S> {
    service: S,
    config: ResolverConfig,
}

impl<S: PlatformService> PlatformCrsSource<S> {
    /// Creates a new source using the given service for IO.
    pub fn new(service: S, config: ResolverConfig) -> Self {
        Self { service, config }
    }

    /// Settings of the source.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

#[async_trait]
impl<S: PlatformService> CrsSource for PlatformCrsSource<S> {
    async fn load_definition(&self, id: CrsId) -> Result<String, SourceError> {
        let url = self.config.definition_url(id);
        log::debug!("Loading definition of EPSG:{id} from {url}");

        let text = self.service.load_text_from_url(&url).await?;
        Ok(text.trim().to_string())
    }
}

/// Source loading definitions over HTTP.
#[cfg(feature = "native")]
pub type RemoteCrsSource = PlatformCrsSource<crate::platform::PlatformServiceImpl>;

#[cfg(feature = "native")]
impl RemoteCrsSource {
    /// Creates a source loading definitions from the authority given in the config.
    pub fn remote(config: ResolverConfig) -> Result<Self, SourceError> {
        let service =
            crate::platform::PlatformServiceImpl::new(&config.user_agent, config.timeout)?;
        Ok(Self::new(service, config))
    }
}
