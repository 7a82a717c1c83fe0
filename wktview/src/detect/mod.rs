//! Recognition of the textual input format and conversion of non-WKT inputs into WKT polygons.
//!
//! Formats are tried in a fixed order: H3 cell index, quadkey, bounding box, geohash, and finally WKT/EWKT, which
//! accepts everything the others did not claim.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use h3o::CellIndex;
use regex::Regex;
use wktview_types::cartesian::Rect;
use wktview_types::{Coord, CrsId, Geometry};

use crate::error::PipelineError;
use crate::wkt;

mod quadkey;

pub use quadkey::{TileIndex, MAX_QUADKEY_LEVEL};

const WORLD: Rect = Rect {
    x_min: -180.0,
    y_min: -90.0,
    x_max: 180.0,
    y_max: 90.0,
};

const NUMBER: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?";

static H3_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{15,16}$").expect("valid regex"));
static QUADKEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-3]+$").expect("valid regex"));
static BBOX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^({NUMBER})\s*,\s*({NUMBER})\s*,\s*({NUMBER})\s*,\s*({NUMBER})$"
    ))
    .expect("valid regex")
});
static GEOHASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9b-hjkmnp-z]{1,12}$").expect("valid regex"));

/// Recognized kind of user input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// H3 cell index, 15 or 16 hex digits.
    H3,
    /// Web mercator tile quadkey.
    Quadkey,
    /// `left,top,right,bottom` in degrees.
    BoundingBox,
    /// Geohash cell, up to 12 characters.
    Geohash,
    /// WKT, possibly with an `SRID=...;` or `<URI>` prefix.
    Wkt,
}

impl InputFormat {
    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::H3 => "H3 cell",
            InputFormat::Quadkey => "quadkey",
            InputFormat::BoundingBox => "bounding box",
            InputFormat::Geohash => "geohash",
            InputFormat::Wkt => "WKT",
        }
    }
}

impl Display for InputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Input text after format recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    /// Recognized format.
    pub format: InputFormat,
    /// WKT text. For converted formats this is a polygon in geographic coordinates, otherwise the trimmed input.
    pub wkt: String,
    /// CRS implied by the format. Set for every converted format.
    pub forced_crs: Option<CrsId>,
}

impl NormalizedInput {
    fn converted(format: InputFormat, geometry: &Geometry) -> Self {
        Self {
            format,
            wkt: wkt::to_wkt(geometry),
            forced_crs: Some(CrsId::WGS84),
        }
    }
}

/// Recognizes the format of the input and converts anything that is not WKT into a WKT polygon.
///
/// Fails for inputs that look like a bounding box but do not describe a valid one, and for quadkeys deeper than
/// [`MAX_QUADKEY_LEVEL`].
pub fn normalize_input(raw: &str) -> Result<NormalizedInput, PipelineError> {
    let text = raw.trim();

    if let Some(geometry) = h3_cell(text) {
        return Ok(NormalizedInput::converted(InputFormat::H3, &geometry));
    }

    if QUADKEY_PATTERN.is_match(text) {
        let geometry = quadkey_tile(text).ok_or_else(|| {
            PipelineError::InvalidQuadkey(format!(
                "{text}: level {} is deeper than {MAX_QUADKEY_LEVEL}",
                text.len()
            ))
        })?;
        return Ok(NormalizedInput::converted(InputFormat::Quadkey, &geometry));
    }

    if BBOX_PATTERN.is_match(text) {
        let geometry = bounding_box(text)?;
        return Ok(NormalizedInput::converted(
            InputFormat::BoundingBox,
            &geometry,
        ));
    }

    if let Some(geometry) = geohash_cell(text) {
        return Ok(NormalizedInput::converted(InputFormat::Geohash, &geometry));
    }

    Ok(NormalizedInput {
        format: InputFormat::Wkt,
        wkt: text.to_string(),
        forced_crs: None,
    })
}

/// Boundary polygon of an H3 cell, `None` if the text is not a valid cell index.
pub fn h3_cell(text: &str) -> Option<Geometry> {
    if !H3_PATTERN.is_match(text) {
        return None;
    }

    let index = u64::from_str_radix(text, 16).ok()?;
    let cell = CellIndex::try_from(index).ok()?;

    let mut ring: Vec<Coord> = cell
        .boundary()
        .iter()
        .map(|vertex| Coord::new(vertex.lng(), vertex.lat()))
        .collect();
    ring.push(*ring.first()?);

    Some(Geometry::Polygon(vec![ring]))
}

/// Polygon of the tile addressed by a quadkey.
pub fn quadkey_tile(text: &str) -> Option<Geometry> {
    if !QUADKEY_PATTERN.is_match(text) {
        return None;
    }

    TileIndex::from_quadkey(text).map(|index| index.bounds().into())
}

/// Polygon of a `left,top,right,bottom` bounding box.
pub fn bounding_box(text: &str) -> Result<Geometry, PipelineError> {
    let invalid = |reason: &str| PipelineError::InvalidBoundingBox(format!("{text}: {reason}"));

    let captures = BBOX_PATTERN
        .captures(text)
        .ok_or_else(|| invalid("expected left,top,right,bottom"))?;
    let mut edges = [0.0; 4];
    for (edge, capture) in edges.iter_mut().zip(captures.iter().skip(1)) {
        *edge = capture
            .and_then(|c| c.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("edges must be finite numbers"))?;
    }

    let [left, top, right, bottom] = edges;
    if left >= right {
        return Err(invalid("left edge must be less than right edge"));
    }
    if bottom >= top {
        return Err(invalid("bottom edge must be less than top edge"));
    }
    if !WORLD.contains(left, bottom) || !WORLD.contains(right, top) {
        return Err(invalid("edges must be longitudes and latitudes in degrees"));
    }

    Ok(Rect::new(left, bottom, right, top).into())
}

/// Polygon of a geohash cell, `None` if the text is not a geohash.
pub fn geohash_cell(text: &str) -> Option<Geometry> {
    if !GEOHASH_PATTERN.is_match(text) {
        return None;
    }

    match geohash::decode_bbox(text) {
        Ok(rect) => Some(
            Rect::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y).into(),
        ),
        Err(err) => {
            log::debug!("'{text}' looks like a geohash but cannot be decoded: {err:?}");
            None
        }
    }
}
