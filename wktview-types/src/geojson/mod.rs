//! Conversion of [`Geometry`] into [`geojson`] types.

use geojson::{Feature, PolygonType, Position, Value};

use crate::geometry::{Coord, Geometry};

fn position(c: &Coord) -> Position {
    vec![c.x, c.y]
}

fn positions(line: &[Coord]) -> Vec<Position> {
    line.iter().map(position).collect()
}

fn polygon(rings: &[Vec<Coord>]) -> PolygonType {
    rings.iter().map(|r| positions(r)).collect()
}

impl Geometry {
    /// GeoJSON geometry value, `None` for `POINT EMPTY` which GeoJSON cannot express.
    ///
    /// Empty points inside a geometry collection are skipped.
    pub fn to_geojson_value(&self) -> Option<Value> {
        Some(match self {
            Geometry::Point(c) => Value::Point(position(c.as_ref()?)),
            Geometry::LineString(v) => Value::LineString(positions(v)),
            Geometry::Polygon(v) => Value::Polygon(polygon(v)),
            Geometry::MultiPoint(v) => Value::MultiPoint(positions(v)),
            Geometry::MultiLineString(v) => {
                Value::MultiLineString(v.iter().map(|l| positions(l)).collect())
            }
            Geometry::MultiPolygon(v) => Value::MultiPolygon(v.iter().map(|p| polygon(p)).collect()),
            Geometry::GeometryCollection(v) => Value::GeometryCollection(
                v.iter()
                    .filter_map(|g| g.to_geojson_value().map(geojson::Geometry::new))
                    .collect(),
            ),
        })
    }

    /// GeoJSON feature with this geometry and `null` properties.
    pub fn to_geojson_feature(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: self.to_geojson_value().map(geojson::Geometry::new),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }
}
