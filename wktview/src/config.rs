//! Configuration of the CRS resolver and the pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wktview_types::CrsId;

/// Text format of projection definitions requested from the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionFormat {
    /// PROJ strings, e.g. `+proj=utm +zone=31 +datum=WGS84`.
    #[default]
    Proj4,
    /// OGC WKT CRS definitions. These can be fetched from the authority, but not used for reprojection, so a
    /// [`CrsResolver`](crate::crs::CrsResolver) refuses to be built for this format.
    Wkt,
}

impl DefinitionFormat {
    /// Suffix appended to the authority url after the code.
    pub fn extension(&self) -> &'static str {
        match self {
            DefinitionFormat::Proj4 => "proj4",
            DefinitionFormat::Wkt => "wkt",
        }
    }

    /// Substring every well-formed definition of this format contains.
    pub fn marker(&self) -> &'static str {
        match self {
            DefinitionFormat::Proj4 => "+proj",
            DefinitionFormat::Wkt => "PROJCS",
        }
    }
}

/// Settings of the remote CRS lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base url of the authority. Definitions are loaded from `<authority_url>/<code>.<extension>`.
    pub authority_url: String,
    /// Format of the requested definitions.
    pub format: DefinitionFormat,
    /// Upper bound of a single remote request.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User agent sent with the requests.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            authority_url: "https://epsg.io".to_string(),
            format: DefinitionFormat::Proj4,
            timeout: Duration::from_secs(10),
            user_agent: concat!("wktview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ResolverConfig {
    /// Url of the definition of the given CRS.
    pub fn definition_url(&self, id: CrsId) -> String {
        format!(
            "{}/{}.{}",
            self.authority_url.trim_end_matches('/'),
            id,
            self.format.extension()
        )
    }
}

/// Settings of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// CRS used when the input names none.
    pub default_crs: CrsId,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            default_crs: CrsId::WGS84,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_url() {
        let config = ResolverConfig {
            authority_url: "https://epsg.io/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.definition_url(CrsId::EPSG3857),
            "https://epsg.io/3857.proj4"
        );

        let config = ResolverConfig {
            format: DefinitionFormat::Wkt,
            ..config
        };
        assert_eq!(
            config.definition_url(CrsId::WGS84),
            "https://epsg.io/4326.wkt"
        );
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"timeout": 2.5, "format": "wkt"}"#).expect("invalid config");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.format, DefinitionFormat::Wkt);
        assert_eq!(config.authority_url, "https://epsg.io");
        assert_eq!(config.format.marker(), "PROJCS");
    }

    #[test]
    fn pipeline_options() {
        let options: PipelineOptions =
            serde_json::from_str(r#"{"default_crs": 3857}"#).expect("invalid options");
        assert_eq!(options.default_crs, CrsId::EPSG3857);
        assert!(serde_json::from_str::<PipelineOptions>(r#"{"default_crs": 5}"#).is_err());
    }
}
