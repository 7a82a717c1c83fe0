//! Transformation of parsed geometries into WGS 84 longitude/latitude.

use wktview_types::geo::InvertedProjection;
use wktview_types::{CrsId, Geometry, ProjectionDefinition};

use crate::error::PipelineError;

/// Transforms every coordinate of the geometry from the system described by `definition` into EPSG:4326.
///
/// Geometries already in EPSG:4326 are returned unchanged without building a projection. The transformation is all or
/// nothing: if any coordinate fails, the whole geometry fails with [`PipelineError::ReprojectionFailed`]. Datum shifts
/// of the definition (`+towgs84`, `+datum`) are applied, so geographic systems on other datums move as well.
pub fn reproject(
    geometry: &Geometry,
    definition: &ProjectionDefinition,
) -> Result<Geometry, PipelineError> {
    if definition.id() == CrsId::WGS84 {
        return Ok(geometry.clone());
    }

    let projection = definition.get_projection()?;
    let to_geographic = InvertedProjection::new(projection);

    geometry.project(&to_geographic).ok_or_else(|| {
        PipelineError::ReprojectionFailed(format!(
            "{} cannot be transformed from EPSG:{} to EPSG:4326",
            geometry.geometry_type(),
            definition.id()
        ))
    })
}
