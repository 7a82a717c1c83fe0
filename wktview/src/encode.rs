//! Output encodings of geometries: GeoJSON, WKT, WKB and EWKB.
//!
//! Binary encodings are little endian and two dimensional. EWKB carries the SRID in its header. An empty point is
//! written the way PostGIS does it, as a point with NaN ordinates.

use geojson::Feature;
use geozero::error::GeozeroError;
use geozero::wkb::{Ewkb, Wkb};
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry, ToWkb};
use wktview_types::{Coord, CrsId, Geometry};

use crate::error::PipelineError;

const EWKB_SRID_FLAG: u32 = 0x2000_0000;

/// GeoJSON feature with the geometry and no properties.
pub fn to_geojson(geometry: &Geometry) -> Feature {
    geometry.to_geojson_feature()
}

/// Serialized GeoJSON feature.
pub fn to_geojson_string(geometry: &Geometry) -> Result<String, PipelineError> {
    serde_json::to_string(&to_geojson(geometry))
        .map_err(|err| PipelineError::Encoding(err.to_string()))
}

/// Canonical WKT text.
pub fn to_wkt(geometry: &Geometry) -> String {
    crate::wkt::to_wkt(geometry)
}

/// ISO WKB bytes.
pub fn to_wkb(geometry: &Geometry) -> Result<Vec<u8>, PipelineError> {
    Ok(WkbSource(geometry).to_wkb(CoordDimensions::xy())?)
}

/// PostGIS EWKB bytes with the SRID of the geometry.
pub fn to_ewkb(geometry: &Geometry, srid: CrsId) -> Result<Vec<u8>, PipelineError> {
    Ok(WkbSource(geometry).to_ewkb(CoordDimensions::xy(), Some(srid.into()))?)
}

/// Reads ISO WKB bytes.
pub fn decode_wkb(bytes: &[u8]) -> Result<Geometry, PipelineError> {
    read_geometry(&Wkb(bytes.to_vec()))
}

/// Reads PostGIS EWKB bytes, returning the geometry and its SRID if the header carries one.
pub fn decode_ewkb(bytes: &[u8]) -> Result<(Geometry, Option<CrsId>), PipelineError> {
    let geometry = read_geometry(&Ewkb(bytes.to_vec()))?;
    let srid = ewkb_srid(bytes)?
        .filter(|srid| *srid != 0)
        .map(|srid| CrsId::new(i64::from(srid)))
        .transpose()?;

    Ok((geometry, srid))
}

fn ewkb_srid(bytes: &[u8]) -> Result<Option<i32>, PipelineError> {
    let truncated = || PipelineError::Encoding("EWKB header is truncated".to_string());

    let little_endian = match bytes.first() {
        Some(0) => false,
        Some(1) => true,
        Some(other) => {
            return Err(PipelineError::Encoding(format!(
                "invalid byte order marker {other}"
            )))
        }
        None => return Err(truncated()),
    };
    let word = |range: std::ops::Range<usize>| -> Result<[u8; 4], PipelineError> {
        bytes
            .get(range)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(truncated)
    };

    let type_bytes = word(1..5)?;
    let type_code = if little_endian {
        u32::from_le_bytes(type_bytes)
    } else {
        u32::from_be_bytes(type_bytes)
    };
    if type_code & EWKB_SRID_FLAG == 0 {
        return Ok(None);
    }

    let srid_bytes = word(5..9)?;
    Ok(Some(if little_endian {
        i32::from_le_bytes(srid_bytes)
    } else {
        i32::from_be_bytes(srid_bytes)
    }))
}

/// Feeds a [`Geometry`] into geozero processors.
struct WkbSource<'a>(&'a Geometry);

impl GeozeroGeometry for WkbSource<'_> {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> geozero::error::Result<()> {
        process_geometry(self.0, 0, processor)
    }
}

fn process_geometry<P: GeomProcessor>(
    geometry: &Geometry,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    match geometry {
        Geometry::Point(Some(coord)) => {
            processor.point_begin(idx)?;
            processor.xy(coord.x, coord.y, 0)?;
            processor.point_end(idx)
        }
        Geometry::Point(None) => {
            processor.point_begin(idx)?;
            processor.xy(f64::NAN, f64::NAN, 0)?;
            processor.point_end(idx)
        }
        Geometry::LineString(coords) => process_line(coords, true, idx, processor),
        Geometry::Polygon(rings) => process_polygon(rings, true, idx, processor),
        Geometry::MultiPoint(points) => {
            processor.multipoint_begin(points.len(), idx)?;
            for (i, point) in points.iter().enumerate() {
                processor.xy(point.x, point.y, i)?;
            }
            processor.multipoint_end(idx)
        }
        Geometry::MultiLineString(lines) => {
            processor.multilinestring_begin(lines.len(), idx)?;
            for (i, line) in lines.iter().enumerate() {
                process_line(line, false, i, processor)?;
            }
            processor.multilinestring_end(idx)
        }
        Geometry::MultiPolygon(polygons) => {
            processor.multipolygon_begin(polygons.len(), idx)?;
            for (i, polygon) in polygons.iter().enumerate() {
                process_polygon(polygon, false, i, processor)?;
            }
            processor.multipolygon_end(idx)
        }
        Geometry::GeometryCollection(members) => {
            processor.geometrycollection_begin(members.len(), idx)?;
            for (i, member) in members.iter().enumerate() {
                process_geometry(member, i, processor)?;
            }
            processor.geometrycollection_end(idx)
        }
    }
}

fn process_line<P: GeomProcessor>(
    coords: &[Coord],
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.linestring_begin(tagged, coords.len(), idx)?;
    for (i, coord) in coords.iter().enumerate() {
        processor.xy(coord.x, coord.y, i)?;
    }
    processor.linestring_end(tagged, idx)
}

fn process_polygon<P: GeomProcessor>(
    rings: &[Vec<Coord>],
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.polygon_begin(tagged, rings.len(), idx)?;
    for (i, ring) in rings.iter().enumerate() {
        process_line(ring, false, i, processor)?;
    }
    processor.polygon_end(tagged, idx)
}

fn read_geometry(source: &impl GeozeroGeometry) -> Result<Geometry, PipelineError> {
    let mut builder = GeometryBuilder::default();
    source.process_geom(&mut builder)?;
    builder
        .result
        .ok_or_else(|| PipelineError::Encoding("binary input has no geometry".to_string()))
}

/// Geometry that is still being read, one per nesting level.
enum Partial {
    Point(Option<Coord>),
    Line(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    Collection(Vec<Geometry>),
}

/// Collects geozero processor events into a [`Geometry`].
#[derive(Default)]
struct GeometryBuilder {
    stack: Vec<Partial>,
    result: Option<Geometry>,
}

fn unexpected(event: &str) -> GeozeroError {
    GeozeroError::Geometry(format!("unexpected {event} in binary geometry"))
}

impl GeometryBuilder {
    fn pop(&mut self, event: &str) -> geozero::error::Result<Partial> {
        self.stack.pop().ok_or_else(|| unexpected(event))
    }

    fn attach(&mut self, geometry: Geometry) -> geozero::error::Result<()> {
        match (self.stack.last_mut(), geometry) {
            (None, geometry) if self.result.is_none() => {
                self.result = Some(geometry);
                Ok(())
            }
            (Some(Partial::Collection(members)), geometry) => {
                members.push(geometry);
                Ok(())
            }
            (Some(Partial::MultiPoint(points)), Geometry::Point(point)) => {
                points.extend(point);
                Ok(())
            }
            (Some(Partial::Polygon(rings)), Geometry::LineString(ring)) => {
                rings.push(ring);
                Ok(())
            }
            (Some(Partial::MultiLineString(lines)), Geometry::LineString(line)) => {
                lines.push(line);
                Ok(())
            }
            (Some(Partial::MultiPolygon(polygons)), Geometry::Polygon(polygon)) => {
                polygons.push(polygon);
                Ok(())
            }
            (_, geometry) => Err(unexpected(geometry.geometry_type().wkt_keyword())),
        }
    }
}

impl GeomProcessor for GeometryBuilder {
    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> geozero::error::Result<()> {
        let coord = Coord::new(x, y);
        match self.stack.last_mut() {
            // PostGIS writes empty points with NaN ordinates
            Some(Partial::Point(point)) => {
                *point = (!(x.is_nan() && y.is_nan())).then_some(coord);
            }
            Some(Partial::Line(coords)) | Some(Partial::MultiPoint(coords)) => coords.push(coord),
            _ => return Err(unexpected("coordinate")),
        }
        Ok(())
    }

    fn empty_point(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.attach(Geometry::Point(None))
    }

    fn point_begin(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Partial::Point(None));
        Ok(())
    }

    fn point_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("point end")? {
            Partial::Point(point) => self.attach(Geometry::Point(point)),
            _ => Err(unexpected("point end")),
        }
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Partial::MultiPoint(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipoint_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("multipoint end")? {
            Partial::MultiPoint(points) => self.attach(Geometry::MultiPoint(points)),
            _ => Err(unexpected("multipoint end")),
        }
    }

    fn linestring_begin(
        &mut self,
        _tagged: bool,
        size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        self.stack.push(Partial::Line(Vec::with_capacity(size)));
        Ok(())
    }

    fn linestring_end(&mut self, _tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("linestring end")? {
            Partial::Line(coords) => self.attach(Geometry::LineString(coords)),
            _ => Err(unexpected("linestring end")),
        }
    }

    fn multilinestring_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack
            .push(Partial::MultiLineString(Vec::with_capacity(size)));
        Ok(())
    }

    fn multilinestring_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("multilinestring end")? {
            Partial::MultiLineString(lines) => self.attach(Geometry::MultiLineString(lines)),
            _ => Err(unexpected("multilinestring end")),
        }
    }

    fn polygon_begin(
        &mut self,
        _tagged: bool,
        size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        self.stack.push(Partial::Polygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn polygon_end(&mut self, _tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("polygon end")? {
            Partial::Polygon(rings) => self.attach(Geometry::Polygon(rings)),
            _ => Err(unexpected("polygon end")),
        }
    }

    fn multipolygon_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack
            .push(Partial::MultiPolygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipolygon_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("multipolygon end")? {
            Partial::MultiPolygon(polygons) => self.attach(Geometry::MultiPolygon(polygons)),
            _ => Err(unexpected("multipolygon end")),
        }
    }

    fn geometrycollection_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Partial::Collection(Vec::with_capacity(size)));
        Ok(())
    }

    fn geometrycollection_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop("geometry collection end")? {
            Partial::Collection(members) => self.attach(Geometry::GeometryCollection(members)),
            _ => Err(unexpected("geometry collection end")),
        }
    }
}
