//! Finding out in which coordinate reference system the input is, and what that system is.
//!
//! [`extract_crs`] splits an `SRID=...;` or `<URI>` prefix from the geometry text. [`CrsResolver`] turns the
//! identifier into a [`ProjectionDefinition`](wktview_types::ProjectionDefinition), consulting the shared
//! [`CrsCache`] first and a [`CrsSource`] (normally the epsg.io authority) on a miss.

mod cache;
mod extract;
mod resolver;
mod source;

pub use cache::CrsCache;
pub use extract::{extract_crs, ExtractedCrs};
pub use resolver::CrsResolver;
#[cfg(feature = "native")]
pub use source::RemoteCrsSource;
pub use source::{CrsSource, PlatformCrsSource};
