use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::geo::projection::Projection;
use crate::geometry::Coord;

/// Spherical (pseudo) Mercator used by web maps, EPSG:3857.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator {
    radius: f64,
}

impl WebMercator {
    /// Semi-major axis of the WGS 84 ellipsoid, used as the sphere radius by EPSG:3857.
    pub const WGS84_RADIUS: f64 = 6_378_137.0;

    /// Creates a new instance over a sphere of the given radius in meters.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(Self::WGS84_RADIUS)
    }
}

impl Projection for WebMercator {
    fn project(&self, input: &Coord) -> Option<Coord> {
        if input.y.abs() >= 90.0 {
            return None;
        }

        let x = self.radius * input.x.to_radians();
        let y = self.radius * (FRAC_PI_4 + input.y.to_radians() / 2.0).tan().ln();

        let projected = Coord::new(x, y);
        projected.is_finite().then_some(projected)
    }

    fn unproject(&self, input: &Coord) -> Option<Coord> {
        let lat = 2.0 * (input.y / self.radius).exp().atan() - FRAC_PI_2;
        let lon = input.x / self.radius;

        let unprojected = Coord::new(lon.to_degrees(), lat.to_degrees());
        unprojected.is_finite().then_some(unprojected)
    }
}
