//! Error types used by the crate.

use thiserror::Error;

/// Error converting geometries between representations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
}

/// Error parsing a [`CrsId`](crate::CrsId).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrsIdError {
    /// The value is not an integer authority code.
    #[error("'{0}' is not a valid EPSG code")]
    NotANumber(String),
    /// The code is outside of the supported `1024..=32767` range.
    #[error("EPSG code {0} is out of the supported range 1024-32767")]
    OutOfRange(i64),
}

/// Error interpreting a projection definition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjError {
    /// Definition string is empty or has no `+proj` parameter.
    #[error("projection definition has no +proj parameter")]
    MissingProj,
    /// Projection method or its parameters cannot be expressed by the transformation engine.
    #[error("unsupported projection: {0}")]
    Unsupported(String),
    /// Transformation engine rejected the definition.
    #[error("failed to create projection: {0}")]
    Engine(String),
}
