//! Geometry tree, coordinate reference system identifiers and projections shared by the `wktview` crates.
//!
//! The central type is [`Geometry`], a closed set of the seven OGC simple feature kinds over 2d [`Coord`]s. Every
//! consumer (WKT writer, encoders, reprojection) matches on it exhaustively, so adding a kind forces all of them to be
//! updated.
//!
//! Coordinate systems are identified by [`CrsId`] and described by a [`ProjectionDefinition`], which can be turned into
//! a [`Projection`](geo::Projection) operating on single coordinates.

pub mod cartesian;
mod crs;
pub mod error;
pub mod geo;
mod geometry;
mod geometry_type;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use crs::{CrsId, ProjectionDefinition};
pub use geometry::{Coord, Geometry};
pub use geometry_type::GeometryType;
