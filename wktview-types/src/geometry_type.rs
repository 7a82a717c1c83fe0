//! See documentation for [`GeometryType`].
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a [`Geometry`](crate::Geometry) node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GeometryType {
    /// Single position.
    Point,
    /// Sequence of positions.
    LineString,
    /// Exterior ring followed by interior rings.
    Polygon,
    /// Set of points.
    MultiPoint,
    /// Set of line strings.
    MultiLineString,
    /// Set of polygons.
    MultiPolygon,
    /// Heterogeneous set of geometries.
    GeometryCollection,
}

impl GeometryType {
    /// Upper case WKT keyword, e.g. `MULTIPOLYGON`.
    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wkt_keyword())
    }
}

impl FromStr for GeometryType {
    type Err = ();

    /// Parses a WKT keyword, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [GeometryType; 7] = [
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
            GeometryType::MultiPoint,
            GeometryType::MultiLineString,
            GeometryType::MultiPolygon,
            GeometryType::GeometryCollection,
        ];

        ALL.into_iter()
            .find(|t| t.wkt_keyword().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_parsing_ignores_case() {
        assert_eq!("polygon".parse::<GeometryType>(), Ok(GeometryType::Polygon));
        assert_eq!("MultiLineString".parse::<GeometryType>(), Ok(GeometryType::MultiLineString));
        assert_eq!(
            "GEOMETRYCOLLECTION".parse::<GeometryType>(),
            Ok(GeometryType::GeometryCollection)
        );
        assert!("POLYGONZ".parse::<GeometryType>().is_err());
        assert!("".parse::<GeometryType>().is_err());
    }
}
