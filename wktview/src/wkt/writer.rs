use std::fmt::{Result, Write};

use wktview_types::{Coord, Geometry};

/// Canonical WKT text of the geometry, e.g. `POINT (30 10)`.
pub fn to_wkt(geometry: &Geometry) -> String {
    let mut wkt = String::new();
    // Writing into a String never fails.
    let _ = write_wkt(geometry, &mut wkt);
    wkt
}

/// Writes canonical WKT text of the geometry into `out`.
pub fn write_wkt(geometry: &Geometry, out: &mut impl Write) -> Result {
    out.write_str(geometry.geometry_type().wkt_keyword())?;
    if geometry_is_empty(geometry) {
        return out.write_str(" EMPTY");
    }

    out.write_char(' ')?;
    match geometry {
        Geometry::Point(point) => match point {
            Some(coord) => {
                out.write_char('(')?;
                write_coord(coord, out)?;
                out.write_char(')')
            }
            None => Ok(()),
        },
        Geometry::LineString(coords) => write_coords(coords, out),
        Geometry::Polygon(rings) => write_list(rings, out, |ring, out| write_coords(ring, out)),
        Geometry::MultiPoint(points) => write_list(points, out, |point, out| {
            out.write_char('(')?;
            write_coord(point, out)?;
            out.write_char(')')
        }),
        Geometry::MultiLineString(lines) => {
            write_list(lines, out, |line, out| write_coords(line, out))
        }
        Geometry::MultiPolygon(polygons) => write_list(polygons, out, |polygon, out| {
            write_list(polygon, out, |ring, out| write_coords(ring, out))
        }),
        Geometry::GeometryCollection(members) => {
            write_list(members, out, |member, out| write_wkt(member, out))
        }
    }
}

// A collection containing only empty members still has structure to write.
fn geometry_is_empty(geometry: &Geometry) -> bool {
    match geometry {
        Geometry::GeometryCollection(members) => members.is_empty(),
        Geometry::Point(point) => point.is_none(),
        Geometry::LineString(coords) | Geometry::MultiPoint(coords) => coords.is_empty(),
        Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => rings.is_empty(),
        Geometry::MultiPolygon(polygons) => polygons.is_empty(),
    }
}

fn write_list<T, W: Write>(
    items: &[T],
    out: &mut W,
    mut write_item: impl FnMut(&T, &mut W) -> Result,
) -> Result {
    out.write_char('(')?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.write_str(", ")?;
        }
        write_item(item, out)?;
    }
    out.write_char(')')
}

fn write_coords(coords: &[Coord], out: &mut impl Write) -> Result {
    write_list(coords, out, |coord, out| write_coord(coord, out))
}

fn write_coord(coord: &Coord, out: &mut impl Write) -> Result {
    write!(out, "{} {}", coord.x, coord.y)
}
