//! Implementations for some of the common projections.
mod proj_string;
mod web_mercator;

pub use proj_string::ProjDefinition;
pub use web_mercator::WebMercator;

#[cfg(feature = "proj4rs")]
mod proj4;
#[cfg(feature = "proj4rs")]
pub use proj4::Proj4Projection;
