use std::sync::Arc;

use wktview_types::{CrsId, ProjectionDefinition};

use super::cache::CrsCache;
use super::source::CrsSource;
use crate::config::DefinitionFormat;
use crate::error::PipelineError;

/// Resolves CRS identifiers into projection definitions.
///
/// Lookups go to the [`CrsCache`] first. On a miss the [`CrsSource`] is asked, the answer is checked to actually be a
/// PROJ string and stored in the cache, so the cache only ever holds definitions usable for reprojection. Remote
/// failures of any kind (timeouts, error statuses, unexpected bodies) are reported as [`PipelineError::CrsNotFound`].
pub struct CrsResolver {
    cache: Arc<CrsCache>,
    source: Option<Box<dyn CrsSource>>,
}

impl std::fmt::Debug for CrsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrsResolver")
            .field("cache", &self.cache)
            .field("source", &self.source.as_ref().map(|_| "<dyn CrsSource>"))
            .finish()
    }
}

impl CrsResolver {
    /// Creates a resolver that only consults the given cache.
    pub fn new(cache: Arc<CrsCache>) -> Self {
        Self {
            cache,
            source: None,
        }
    }

    /// Creates a resolver over the process-wide cache loading missing definitions from the authority in the config.
    ///
    /// Fails with [`SourceError::UnsupportedFormat`](crate::error::SourceError::UnsupportedFormat) unless the config
    /// requests PROJ strings.
    #[cfg(feature = "native")]
    pub fn remote(config: crate::config::ResolverConfig) -> Result<Self, crate::error::SourceError> {
        if config.format != DefinitionFormat::Proj4 {
            return Err(crate::error::SourceError::UnsupportedFormat(config.format));
        }

        let source = super::RemoteCrsSource::remote(config)?;
        Ok(Self::new(CrsCache::global()).with_source(source))
    }

    /// Sets the source consulted on cache misses.
    pub fn with_source(mut self, source: impl CrsSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Cache used by the resolver.
    pub fn cache(&self) -> &Arc<CrsCache> {
        &self.cache
    }

    /// Resolves the identifier into its definition.
    pub async fn resolve(&self, id: CrsId) -> Result<ProjectionDefinition, PipelineError> {
        if let Some(definition) = self.cache.get(id) {
            return Ok(definition);
        }

        let Some(source) = &self.source else {
            log::debug!("EPSG:{id} is not cached and remote lookup is disabled");
            return Err(PipelineError::CrsNotFound(id));
        };

        let text = match source.load_definition(id).await {
            Ok(text) => text,
            Err(err) => {
                log::debug!("Failed to load definition of EPSG:{id}: {err}");
                return Err(PipelineError::CrsNotFound(id));
            }
        };

        let marker = DefinitionFormat::Proj4.marker();
        if !text.contains(marker) {
            log::debug!("Definition of EPSG:{id} does not contain '{marker}'");
            return Err(PipelineError::CrsNotFound(id));
        }

        log::info!("Loaded definition of EPSG:{id}");
        Ok(self.cache.insert(id, text))
    }

    /// Checks the range of a numeric code and resolves it.
    pub async fn resolve_code(&self, code: i64) -> Result<ProjectionDefinition, PipelineError> {
        let id = CrsId::new(code)?;
        self.resolve(id).await
    }

    /// Checks a user supplied CRS reference (`"2154"`, `"EPSG:2154"`) and resolves it.
    pub async fn validate(&self, crs_ref: &str) -> Result<ProjectionDefinition, PipelineError> {
        let id = crs_ref.parse::<CrsId>()?;
        self.resolve(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use wktview_types::error::CrsIdError;

    use super::*;
    use crate::error::SourceError;

    /// Answers every request with a distinct definition and counts the requests.
    #[derive(Default)]
    struct CountingSource {
        requests: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CrsSource for CountingSource {
        async fn load_definition(&self, id: CrsId) -> Result<String, SourceError> {
            let n = self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(format!("+proj=tmerc +lon_0={} +title=request {n}", id.code() % 180))
        }
    }

    struct FailingSource(SourceError);

    #[async_trait]
    impl CrsSource for FailingSource {
        async fn load_definition(&self, _id: CrsId) -> Result<String, SourceError> {
            Err(self.0.clone())
        }
    }

    struct FixedSource(&'static str);

    #[async_trait]
    impl CrsSource for FixedSource {
        async fn load_definition(&self, _id: CrsId) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    fn id(code: i64) -> CrsId {
        CrsId::new(code).expect("invalid id")
    }

    #[test]
    fn resolves_seeded_without_source() {
        let source = CountingSource::default();
        let requests = source.requests.clone();
        let resolver = CrsResolver::new(Arc::new(CrsCache::seeded())).with_source(source);

        let definition = tokio_test::block_on(resolver.resolve(CrsId::WGS84)).expect("not resolved");
        assert!(definition.text().contains("+proj=longlat"));
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn out_of_range_code() {
        let source = CountingSource::default();
        let requests = source.requests.clone();
        let resolver = CrsResolver::new(Arc::new(CrsCache::new())).with_source(source);

        assert_eq!(
            tokio_test::block_on(resolver.resolve_code(99999)),
            Err(PipelineError::InvalidCrsRange(CrsIdError::OutOfRange(99999)))
        );
        assert_matches!(
            tokio_test::block_on(resolver.validate("EPSG:abc")),
            Err(PipelineError::InvalidCrsRange(CrsIdError::NotANumber(_)))
        );
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remote_definition_is_cached() {
        let source = CountingSource::default();
        let requests = source.requests.clone();
        let resolver = CrsResolver::new(Arc::new(CrsCache::new())).with_source(source);

        let first = tokio_test::block_on(resolver.validate("EPSG:3400")).expect("not resolved");
        let second = tokio_test::block_on(resolver.resolve(id(3400))).expect("not resolved");
        assert_eq!(first, second);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert!(resolver.cache().contains(id(3400)));
    }

    #[test]
    fn source_failures_are_not_found() {
        for err in [
            SourceError::Transport("timeout".to_string()),
            SourceError::Status(404),
            SourceError::Malformed,
        ] {
            let resolver = CrsResolver::new(Arc::new(CrsCache::new())).with_source(FailingSource(err));
            assert_eq!(
                tokio_test::block_on(resolver.resolve(id(3400))),
                Err(PipelineError::CrsNotFound(id(3400)))
            );
            assert!(resolver.cache().is_empty());
        }
    }

    #[test]
    fn unexpected_body_is_not_found() {
        let resolver = CrsResolver::new(Arc::new(CrsCache::new()))
            .with_source(FixedSource("<html>Not found</html>"));
        assert_eq!(
            tokio_test::block_on(resolver.resolve(id(3400))),
            Err(PipelineError::CrsNotFound(id(3400)))
        );

        let resolver = CrsResolver::new(Arc::new(CrsCache::new())).with_source(FixedSource(
            r#"PROJCS["NAD83 / Alberta 10-TM (Forest)",GEOGCS["NAD83",DATUM["North_American_Datum_1983"]]]"#,
        ));
        assert_eq!(
            tokio_test::block_on(resolver.resolve(id(3400))),
            Err(PipelineError::CrsNotFound(id(3400)))
        );
        assert!(resolver.cache().is_empty());
    }

    #[cfg(feature = "native")]
    #[test]
    fn remote_resolver_requires_proj_strings() {
        let config = crate::config::ResolverConfig {
            format: DefinitionFormat::Wkt,
            ..Default::default()
        };
        assert_matches!(
            CrsResolver::remote(config),
            Err(SourceError::UnsupportedFormat(DefinitionFormat::Wkt))
        );
    }

    #[test]
    fn offline_miss_is_not_found() {
        let resolver = CrsResolver::new(Arc::new(CrsCache::seeded()));
        assert_eq!(
            tokio_test::block_on(resolver.resolve(id(3400))),
            Err(PipelineError::CrsNotFound(id(3400)))
        );
        assert_eq!(
            tokio_test::block_on(resolver.resolve(id(3400)))
                .unwrap_err()
                .to_string(),
            "EPSG not found: 3400"
        );
    }

    #[test]
    fn concurrent_lookups_agree() {
        let resolver = Arc::new(CrsResolver::new(Arc::new(CrsCache::new())).with_source(CountingSource::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                std::thread::spawn(move || tokio_test::block_on(resolver.resolve(id(3400))))
            })
            .collect();
        let definitions: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread panicked").expect("not resolved"))
            .collect();

        assert!(definitions.iter().all(|d| d == &definitions[0]));
        assert_eq!(resolver.cache().len(), 1);
        assert_eq!(resolver.cache().get(id(3400)), Some(definitions[0].clone()));
    }
}
