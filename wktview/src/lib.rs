//! Wktview turns loosely formatted spatial text into normalized geometry encodings.
//!
//! The input can be WKT, EWKT (`SRID=2154;POINT (700000 6600000)`), WKT with a CRS URI prefix, an H3 cell index, a
//! web mercator quadkey, a geohash or a `left,top,right,bottom` bounding box. Every input is brought to a WKT geometry
//! with a known coordinate reference system, parsed, reprojected to WGS 84 longitude/latitude and encoded as GeoJSON,
//! WKT, WKB and EWKB.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use wktview::crs::{CrsCache, CrsResolver};
//! use wktview::{Pipeline, SpatialInput};
//!
//! # tokio_test::block_on(async {
//! let pipeline = Pipeline::new(CrsResolver::new(Arc::new(CrsCache::seeded())));
//! let input = SpatialInput::new("SRID=32631;POINT (500000 0)");
//!
//! let result = pipeline.run(&input).await.unwrap().unwrap();
//! assert_eq!(result.wkt(), "POINT (500000 0)");
//! assert_eq!(result.crs().code(), 32631);
//! # });
//! ```
//!
//! # Main components
//!
//! * [`detect`] recognizes the input format and converts non-WKT inputs into WKT polygons,
//! * [`crs`] splits a CRS prefix from the text and resolves the CRS into a projection definition, using a shared
//!   [`CrsCache`](crs::CrsCache) and, with the `native` feature, the [epsg.io](https://epsg.io) authority,
//! * [`wkt`] parses the geometry text,
//! * [`reproject`](reproject::reproject) transforms the geometry into EPSG:4326,
//! * [`encode`] produces the output encodings.
//!
//! [`Pipeline`] runs these stages in order for a single [`SpatialInput`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod crs;
pub mod detect;
pub mod encode;
pub mod error;
mod messenger;
mod pipeline;
pub mod platform;
pub mod reproject;
pub mod samples;
mod share;
pub mod wkt;

pub use config::{DefinitionFormat, PipelineOptions, ResolverConfig};
pub use error::{PipelineError, WktError};
pub use messenger::{LogMessenger, Messenger, Notice};
pub use pipeline::{NormalizedResult, Pipeline, SpatialInput};
pub use share::{ShareRecord, MAX_QUERY_LENGTH};

// Reexport wktview_types
pub use wktview_types;
