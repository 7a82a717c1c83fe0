use crate::geometry::Coord;

/// Conversion between geographic coordinates (longitude and latitude in degrees, in this order) and the coordinates
/// of some coordinate system.
pub trait Projection {
    /// Converts a geographic coordinate into the projected system. Returns `None` if the coordinate cannot be
    /// represented in the target system.
    fn project(&self, input: &Coord) -> Option<Coord>;
    /// Converts a coordinate of the projected system back into geographic coordinates.
    fn unproject(&self, input: &Coord) -> Option<Coord>;
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    fn project(&self, input: &Coord) -> Option<Coord> {
        (**self).project(input)
    }

    fn unproject(&self, input: &Coord) -> Option<Coord> {
        (**self).unproject(input)
    }
}

/// Projection with swapped directions: projecting with it unprojects with the inner one.
///
/// Used to bring geometries authored in some coordinate system into geographic coordinates with
/// [`Geometry::project`](crate::Geometry::project).
pub struct InvertedProjection<P> {
    inner: P,
}

impl<P: Projection> InvertedProjection<P> {
    /// Creates a new instance.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Projection> Projection for InvertedProjection<P> {
    fn project(&self, input: &Coord) -> Option<Coord> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Coord) -> Option<Coord> {
        self.inner.project(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offset;

    impl Projection for Offset {
        fn project(&self, input: &Coord) -> Option<Coord> {
            Some(Coord::new(input.x + 1.0, input.y + 2.0))
        }

        fn unproject(&self, input: &Coord) -> Option<Coord> {
            Some(Coord::new(input.x - 1.0, input.y - 2.0))
        }
    }

    #[test]
    fn inverted_projection() {
        let inverted = InvertedProjection::new(Offset);
        assert_eq!(
            inverted.project(&Coord::new(1.0, 2.0)),
            Some(Coord::new(0.0, 0.0))
        );
        assert_eq!(
            inverted.unproject(&Coord::new(0.0, 0.0)),
            Some(Coord::new(1.0, 2.0))
        );
    }
}
