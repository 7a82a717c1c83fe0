//! Orchestration of a single normalization run.
//!
//! A run moves through the stages `Start → FormatNormalized → CrsExtracted → CrsResolved → Parsed → Encoded`. Each
//! stage consumes the output of the previous one, so a later stage cannot be reached without the earlier ones
//! succeeding. Any stage may stop the run with a [`PipelineError`]; the extraction stage may also stop it early with
//! `Ok(None)` when there is no geometry text.

use geojson::Feature;
use wktview_types::cartesian::Rect;
use wktview_types::{CrsId, Geometry, ProjectionDefinition};

use crate::config::PipelineOptions;
use crate::crs::{extract_crs, CrsResolver};
use crate::detect::{normalize_input, InputFormat, NormalizedInput};
use crate::encode;
use crate::error::PipelineError;
use crate::messenger::{Messenger, Notice};
use crate::reproject::reproject;
use crate::wkt;

/// User supplied input of a run: free text and an optional CRS.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpatialInput {
    wkt: String,
    epsg: Option<String>,
}

impl SpatialInput {
    /// Creates an input without an explicit CRS.
    pub fn new(wkt: impl Into<String>) -> Self {
        Self {
            wkt: wkt.into(),
            epsg: None,
        }
    }

    /// Sets the CRS of the input. Both codes (`2154`) and references (`"EPSG:2154"`) are accepted.
    pub fn with_epsg(mut self, epsg: impl ToString) -> Self {
        self.epsg = Some(epsg.to_string());
        self
    }

    /// Input text.
    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    /// Explicit CRS reference, `None` if it was not given or is blank.
    pub fn epsg(&self) -> Option<&str> {
        self.epsg.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    format: InputFormat,
    crs: CrsId,
    definition: ProjectionDefinition,
    geometry: Geometry,
    projected: Geometry,
    feature: Feature,
    wkb: Vec<u8>,
    ewkb: Vec<u8>,
}

impl NormalizedResult {
    /// Recognized input format.
    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// System of the input coordinates.
    pub fn crs(&self) -> CrsId {
        self.crs
    }

    /// Definition of the input system.
    pub fn definition(&self) -> &ProjectionDefinition {
        &self.definition
    }

    /// Parsed geometry in the input system.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Geometry in EPSG:4326.
    pub fn projected(&self) -> &Geometry {
        &self.projected
    }

    /// GeoJSON feature of the geometry in EPSG:4326.
    pub fn geojson(&self) -> &Feature {
        &self.feature
    }

    /// Serialized GeoJSON feature.
    pub fn geojson_string(&self) -> Result<String, PipelineError> {
        serde_json::to_string(&self.feature).map_err(|err| PipelineError::Encoding(err.to_string()))
    }

    /// Canonical WKT of the geometry in the input system.
    pub fn wkt(&self) -> String {
        wkt::to_wkt(&self.geometry)
    }

    /// WKT of the geometry in the input system with an `SRID=` prefix.
    pub fn ewkt(&self) -> String {
        format!("SRID={};{}", self.crs, self.wkt())
    }

    /// WKB of the geometry in the input system.
    pub fn wkb(&self) -> &[u8] {
        &self.wkb
    }

    /// EWKB of the geometry in the input system.
    pub fn ewkb(&self) -> &[u8] {
        &self.ewkb
    }

    /// Bounds of the geometry in EPSG:4326, `None` if it is empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.projected.bounding_rect()
    }
}

struct CrsExtracted {
    format: InputFormat,
    crs: CrsId,
    geometry_text: String,
}

struct CrsResolved {
    format: InputFormat,
    definition: ProjectionDefinition,
    geometry_text: String,
}

struct Parsed {
    format: InputFormat,
    definition: ProjectionDefinition,
    geometry: Geometry,
    projected: Geometry,
}

/// Turns [`SpatialInput`]s into [`NormalizedResult`]s.
///
/// The pipeline holds no state of its own between runs besides the resolver cache, so one instance can serve any
/// number of concurrent runs.
pub struct Pipeline {
    resolver: CrsResolver,
    options: PipelineOptions,
    messenger: Option<Box<dyn Messenger>>,
}

impl Pipeline {
    /// Creates a new pipeline with default options.
    pub fn new(resolver: CrsResolver) -> Self {
        Self {
            resolver,
            options: PipelineOptions::default(),
            messenger: None,
        }
    }

    /// Sets pipeline options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the receiver of run notices.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Box::new(messenger));
        self
    }

    /// Resolver used for CRS lookups.
    pub fn resolver(&self) -> &CrsResolver {
        &self.resolver
    }

    /// Runs the input through all stages.
    ///
    /// Returns `Ok(None)` if the input has no geometry text, e.g. it is blank or consists of a CRS prefix only.
    pub async fn run(&self, input: &SpatialInput) -> Result<Option<NormalizedResult>, PipelineError> {
        let normalized = normalize_input(input.wkt())?;
        log::trace!("FormatNormalized: {}", normalized.format);
        self.report_conversion(&normalized);

        let Some(extracted) = self.extract(normalized, input)? else {
            log::debug!("Input has no geometry text");
            return Ok(None);
        };
        log::trace!("CrsExtracted: EPSG:{}", extracted.crs);

        let resolved = self.resolve(extracted).await?;
        log::trace!("CrsResolved: {}", resolved.definition);

        let parsed = Self::parse(resolved)?;
        log::trace!("Parsed: {}", parsed.geometry.geometry_type());

        let result = Self::encode(parsed)?;
        log::trace!("Encoded");

        Ok(Some(result))
    }

    fn report_conversion(&self, normalized: &NormalizedInput) {
        let Some(crs) = normalized.forced_crs else {
            return;
        };

        let notice = Notice::FormatConverted {
            format: normalized.format,
            crs,
        };
        log::info!("{notice}");
        if let Some(messenger) = &self.messenger {
            messenger.notify(&notice);
        }
    }

    fn extract(
        &self,
        normalized: NormalizedInput,
        input: &SpatialInput,
    ) -> Result<Option<CrsExtracted>, PipelineError> {
        let extracted = extract_crs(&normalized.wkt)?;
        if extracted.geometry_text.is_empty() {
            return Ok(None);
        }

        let crs = match (normalized.forced_crs, extracted.crs_id()?, input.epsg()) {
            (Some(forced), _, _) => forced,
            (None, Some(embedded), _) => embedded,
            (None, None, Some(explicit)) => explicit.parse()?,
            (None, None, None) => self.options.default_crs,
        };

        Ok(Some(CrsExtracted {
            format: normalized.format,
            crs,
            geometry_text: extracted.geometry_text.to_string(),
        }))
    }

    async fn resolve(&self, extracted: CrsExtracted) -> Result<CrsResolved, PipelineError> {
        let definition = self.resolver.resolve(extracted.crs).await?;
        Ok(CrsResolved {
            format: extracted.format,
            definition,
            geometry_text: extracted.geometry_text,
        })
    }

    fn parse(resolved: CrsResolved) -> Result<Parsed, PipelineError> {
        let geometry = wkt::parse(&resolved.geometry_text)?;
        let projected = reproject(&geometry, &resolved.definition)?;
        Ok(Parsed {
            format: resolved.format,
            definition: resolved.definition,
            geometry,
            projected,
        })
    }

    fn encode(parsed: Parsed) -> Result<NormalizedResult, PipelineError> {
        let crs = parsed.definition.id();
        Ok(NormalizedResult {
            format: parsed.format,
            crs,
            wkb: encode::to_wkb(&parsed.geometry)?,
            ewkb: encode::to_ewkb(&parsed.geometry, crs)?,
            feature: encode::to_geojson(&parsed.projected),
            definition: parsed.definition,
            geometry: parsed.geometry,
            projected: parsed.projected,
        })
    }
}
