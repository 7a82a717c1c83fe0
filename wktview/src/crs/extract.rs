use std::sync::LazyLock;

use regex::Regex;
use wktview_types::CrsId;

use crate::error::PipelineError;

static SRID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*SRID\s*=\s*([^;]*);\s*(.*)$").expect("valid regex"));
static URI_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<([^>]*)>\s*(.*)$").expect("valid regex"));
static EPSG_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"opengis\.net/def/crs/EPSG/[0-9.]+/([0-9]+)$").expect("valid regex")
});
static EPSG_URN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^urn:ogc:def:crs:EPSG:[0-9.]*:([0-9]+)$").expect("valid regex")
});

/// CRS URIs that are not EPSG URIs but name a system with an EPSG equivalent.
const KNOWN_URIS: [(&str, u16); 6] = [
    ("http://www.opengis.net/def/crs/OGC/1.3/CRS84", 4326),
    ("http://www.opengis.net/def/crs/OGC/0/CRS84", 4326),
    ("urn:ogc:def:crs:OGC:1.3:CRS84", 4326),
    ("http://www.opengis.net/def/crs/OGC/1.3/CRS83", 4269),
    ("http://www.opengis.net/def/crs/OGC/1.3/CRS27", 4267),
    ("urn:ogc:def:crs:OGC:1.3:CRS27", 4267),
];

/// Geometry text with the CRS prefix split off.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCrs<'a> {
    /// CRS reference taken from the prefix: the text after `SRID=`, or the code a URI stands for.
    pub crs_ref: Option<String>,
    /// Remaining geometry text, trimmed.
    pub geometry_text: &'a str,
}

impl ExtractedCrs<'_> {
    /// Numeric identifier of the referenced CRS, `None` if the text had no prefix.
    pub fn crs_id(&self) -> Result<Option<CrsId>, PipelineError> {
        Ok(self
            .crs_ref
            .as_deref()
            .map(str::parse::<CrsId>)
            .transpose()?)
    }
}

/// Splits a CRS prefix from the geometry text.
///
/// Two prefixes are recognized: EWKT `SRID=<code>;` and an angle bracketed URI such as
/// `<http://www.opengis.net/def/crs/EPSG/0/2154>`. A URI that names neither an EPSG code nor one of the well known
/// OGC systems fails with [`PipelineError::UnsupportedCrsUri`]. Without a prefix the whole trimmed text is returned.
pub fn extract_crs(text: &str) -> Result<ExtractedCrs<'_>, PipelineError> {
    if let Some(captures) = SRID_PREFIX.captures(text) {
        if let (Some(code), Some(rest)) = (captures.get(1), captures.get(2)) {
            return Ok(ExtractedCrs {
                crs_ref: Some(code.as_str().trim().to_string()),
                geometry_text: rest.as_str().trim(),
            });
        }
    }

    if let Some(captures) = URI_PREFIX.captures(text) {
        if let (Some(uri), Some(rest)) = (captures.get(1), captures.get(2)) {
            return Ok(ExtractedCrs {
                crs_ref: Some(uri_code(uri.as_str())?),
                geometry_text: rest.as_str().trim(),
            });
        }
    }

    Ok(ExtractedCrs {
        crs_ref: None,
        geometry_text: text.trim(),
    })
}

fn uri_code(uri: &str) -> Result<String, PipelineError> {
    let uri = uri
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .replacen("https://", "http://", 1);

    if let Some((_, code)) = KNOWN_URIS.iter().find(|(known, _)| *known == uri) {
        return Ok(code.to_string());
    }

    EPSG_URI
        .captures(&uri)
        .or_else(|| EPSG_URN.captures(&uri))
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_string())
        .ok_or(PipelineError::UnsupportedCrsUri(uri))
}
