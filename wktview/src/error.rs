//! Error types used by the crate.

use thiserror::Error;
use wktview_types::error::{CrsIdError, ProjError};
use wktview_types::CrsId;

use crate::config::DefinitionFormat;

/// Classified failure of a single pipeline run.
///
/// Every variant renders a message suitable for showing to the user as is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The WKT carries a `<URI>` prefix that does not name a supported CRS.
    #[error("CRS URI not supported (only OpenGIS EPSG for now): {0}")]
    UnsupportedCrsUri(String),
    /// Neither the cache nor the remote authority know the CRS.
    #[error("EPSG not found: {0}")]
    CrsNotFound(CrsId),
    /// The CRS reference is not a number in the `1024..=32767` range.
    #[error("invalid EPSG code: {0}")]
    InvalidCrsRange(#[from] CrsIdError),
    /// The geometry text is not valid WKT.
    #[error("WKT parsing failed: {0}")]
    WktParseFailed(#[from] WktError),
    /// A bounding box input has non-finite, inverted or out of range edges.
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
    /// A quadkey addresses a tile deeper than the deepest supported level.
    #[error("invalid quadkey: {0}")]
    InvalidQuadkey(String),
    /// The projection definition cannot be used to transform coordinates.
    #[error("unsupported projection: {0}")]
    UnsupportedProjection(#[from] ProjError),
    /// A coordinate could not be transformed into geographic coordinates.
    #[error("reprojection failed: {0}")]
    ReprojectionFailed(String),
    /// Binary encoding or decoding failed.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl From<geozero::error::GeozeroError> for PipelineError {
    fn from(value: geozero::error::GeozeroError) -> Self {
        Self::Encoding(value.to_string())
    }
}

/// Structured WKT syntax error. Positions are byte offsets into the parsed text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    /// A token that is not allowed at this place.
    #[error("Unexpected `{token}` at position {position}")]
    UnexpectedToken {
        /// Offending token text.
        token: String,
        /// Offset of the token.
        position: usize,
    },
    /// The text ended while more tokens were expected.
    #[error("Unexpected end of input at position {position}")]
    UnexpectedEnd {
        /// Length of the text.
        position: usize,
    },
    /// Geometry keyword is not one of the seven simple feature types.
    #[error("Invalid geometry type: {name}")]
    InvalidGeometryType {
        /// Keyword as written.
        name: String,
    },
    /// Numeric literal that cannot be read as a finite number.
    #[error("Invalid number `{text}` at position {position}")]
    InvalidNumber {
        /// Literal text.
        text: String,
        /// Offset of the literal.
        position: usize,
    },
}

/// Failure to load a projection definition from a remote source. Lookup failures never leave the resolver: they are
/// logged and reported as [`PipelineError::CrsNotFound`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// Network error or timeout.
    #[error("failed to load data: {0}")]
    Transport(String),
    /// The server responded with a non-success status.
    #[error("unexpected response status {0}")]
    Status(u16),
    /// The response body is not a projection definition.
    #[error("response is not a projection definition")]
    Malformed,
    /// Remote lookups are not available.
    #[error("remote lookup is disabled")]
    Disabled,
    /// Definitions of this format cannot be used for reprojection.
    #[error("definitions in {0:?} format cannot be used for reprojection")]
    UnsupportedFormat(DefinitionFormat),
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
