use serde::{Deserialize, Serialize};

use crate::cartesian::Rect;
use crate::geo::Projection;
use crate::geometry_type::GeometryType;

/// 2d position. For geographic coordinate systems `x` is longitude and `y` is latitude, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Coord {
    /// X ordinate (easting or longitude).
    pub x: f64,
    /// Y ordinate (northing or latitude).
    pub y: f64,
}

impl Coord {
    /// Creates a new coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both ordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Geometry tree.
///
/// Rings of polygons are stored as they were authored, no orientation or closing is enforced. An empty point is
/// represented as `Point(None)`, other kinds are empty when they contain no members.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Geometry {
    /// Single position, or `POINT EMPTY`.
    Point(Option<Coord>),
    /// Sequence of positions.
    LineString(Vec<Coord>),
    /// Exterior ring followed by interior rings.
    Polygon(Vec<Vec<Coord>>),
    /// Set of positions.
    MultiPoint(Vec<Coord>),
    /// Set of line strings.
    MultiLineString(Vec<Vec<Coord>>),
    /// Set of polygons.
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    /// Set of arbitrary geometries.
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Kind of the geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Returns true if the geometry has no members (`<TYPE> EMPTY`).
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(c) => c.is_none(),
            Geometry::LineString(v) | Geometry::MultiPoint(v) => v.is_empty(),
            Geometry::Polygon(v) | Geometry::MultiLineString(v) => v.is_empty(),
            Geometry::MultiPolygon(v) => v.is_empty(),
            Geometry::GeometryCollection(v) => v.is_empty(),
        }
    }

    /// Iterates over all coordinates of the geometry in the order they are stored.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(c) => Box::new(c.iter()),
            Geometry::LineString(v) | Geometry::MultiPoint(v) => Box::new(v.iter()),
            Geometry::Polygon(v) | Geometry::MultiLineString(v) => Box::new(v.iter().flatten()),
            Geometry::MultiPolygon(v) => Box::new(v.iter().flatten().flatten()),
            Geometry::GeometryCollection(v) => Box::new(v.iter().flat_map(|g| g.coords())),
        }
    }

    /// Bounding rectangle of all coordinates, or `None` for an empty geometry.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_coords(self.coords())
    }

    /// Creates a new geometry by applying `projection` to every coordinate.
    ///
    /// Returns `None` if any of the coordinates cannot be projected. The source geometry is never modified, so a
    /// failure leaves no partially projected result behind.
    pub fn project<P>(&self, projection: &P) -> Option<Geometry>
    where
        P: Projection + ?Sized,
    {
        let line = |line: &Vec<Coord>| -> Option<Vec<Coord>> {
            line.iter().map(|c| projection.project(c)).collect()
        };
        let lines =
            |lines: &Vec<Vec<Coord>>| -> Option<Vec<Vec<Coord>>> { lines.iter().map(line).collect() };

        Some(match self {
            Geometry::Point(None) => Geometry::Point(None),
            Geometry::Point(Some(c)) => Geometry::Point(Some(projection.project(c)?)),
            Geometry::LineString(v) => Geometry::LineString(line(v)?),
            Geometry::MultiPoint(v) => Geometry::MultiPoint(line(v)?),
            Geometry::Polygon(v) => Geometry::Polygon(lines(v)?),
            Geometry::MultiLineString(v) => Geometry::MultiLineString(lines(v)?),
            Geometry::MultiPolygon(v) => {
                Geometry::MultiPolygon(v.iter().map(lines).collect::<Option<_>>()?)
            }
            Geometry::GeometryCollection(v) => Geometry::GeometryCollection(
                v.iter()
                    .map(|g| g.project(projection))
                    .collect::<Option<_>>()?,
            ),
        })
    }
}

impl From<Coord> for Geometry {
    fn from(value: Coord) -> Self {
        Self::Point(Some(value))
    }
}

impl From<Rect> for Geometry {
    fn from(value: Rect) -> Self {
        Self::Polygon(vec![value.into_ring()])
    }
}
