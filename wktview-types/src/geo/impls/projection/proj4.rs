use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::ProjError;
use crate::geo::projection::Projection;
use crate::geometry::Coord;

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Projection between WGS 84 longitude/latitude and a system given by a PROJ string, backed by [`proj4rs`].
///
/// Datum shifts given by `+towgs84` or `+datum` are applied in both directions, and so is unit scaling.
pub struct Proj4Projection {
    source: Proj,
    wgs84: Proj,
    geographic: bool,
}

impl Proj4Projection {
    /// Creates a new projection from a PROJ string. `geographic` tells whether the coordinates of the system are
    /// angles, which are given in degrees and converted to radians for the engine.
    pub fn new(definition: &str, geographic: bool) -> Result<Self, ProjError> {
        let source = Proj::from_proj_string(definition)
            .map_err(|err| ProjError::Engine(format!("{definition}: {err:?}")))?;
        let wgs84 = Proj::from_proj_string(WGS84)
            .map_err(|err| ProjError::Engine(format!("{WGS84}: {err:?}")))?;

        Ok(Self {
            source,
            wgs84,
            geographic,
        })
    }

    fn apply(from: &Proj, to: &Proj, point: (f64, f64)) -> Option<(f64, f64)> {
        let mut point = (point.0, point.1, 0.0);
        match transform(from, to, &mut point) {
            Ok(()) => Some((point.0, point.1)),
            Err(err) => {
                log::trace!("Failed to transform coordinate: {err:?}");
                None
            }
        }
    }
}

impl Projection for Proj4Projection {
    fn project(&self, input: &Coord) -> Option<Coord> {
        let (x, y) = Self::apply(
            &self.wgs84,
            &self.source,
            (input.x.to_radians(), input.y.to_radians()),
        )?;

        let projected = if self.geographic {
            Coord::new(x.to_degrees(), y.to_degrees())
        } else {
            Coord::new(x, y)
        };
        projected.is_finite().then_some(projected)
    }

    fn unproject(&self, input: &Coord) -> Option<Coord> {
        if !input.is_finite() {
            return None;
        }

        let point = if self.geographic {
            (input.x.to_radians(), input.y.to_radians())
        } else {
            (input.x, input.y)
        };
        let (lon, lat) = Self::apply(&self.source, &self.wgs84, point)?;

        let unprojected = Coord::new(lon.to_degrees(), lat.to_degrees());
        unprojected.is_finite().then_some(unprojected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn utm_central_meridian() {
        let pr = Proj4Projection::new("+proj=utm +zone=31 +datum=WGS84 +units=m +no_defs", false)
            .expect("invalid definition");

        let projected = pr
            .project(&Coord::new(3.0, 0.0))
            .expect("projection failed");
        assert_abs_diff_eq!(projected.x, 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(projected.y, 0.0, epsilon = 1e-3);

        let unprojected = pr
            .unproject(&Coord::new(500_000.0, 0.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, 3.0, epsilon = 1e-7);
        assert_abs_diff_eq!(unprojected.y, 0.0, epsilon = 1e-7);
    }

    #[test]
    fn oblique_stereographic_origin() {
        let pr = Proj4Projection::new(
            "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +units=m +no_defs",
            false,
        )
        .expect("invalid definition");

        let unprojected = pr
            .unproject(&Coord::new(155_000.0, 463_000.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, 5.38763888888889, epsilon = 1e-7);
        assert_abs_diff_eq!(unprojected.y, 52.15616055555555, epsilon = 1e-7);
    }

    #[test]
    fn projected_units() {
        let pr = Proj4Projection::new("+proj=utm +zone=31 +datum=WGS84 +units=km +no_defs", false)
            .expect("invalid definition");
        let unprojected = pr
            .unproject(&Coord::new(500.0, 0.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, 3.0, epsilon = 1e-7);
    }

    #[test]
    fn geographic_wgs84_is_unchanged() {
        let pr = Proj4Projection::new("+proj=longlat +datum=WGS84 +no_defs", true)
            .expect("invalid definition");
        let unprojected = pr
            .unproject(&Coord::new(30.0, 10.0))
            .expect("unprojection failed");
        assert_abs_diff_eq!(unprojected.x, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(unprojected.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_method() {
        assert!(Proj4Projection::new("+proj=no_such_method +ellps=WGS84", false).is_err());
    }
}
