use std::f64::consts::PI;

use wktview_types::cartesian::Rect;

/// Deepest zoom level a quadkey can address.
pub const MAX_QUADKEY_LEVEL: u32 = 30;

/// Index of a tile in the web mercator tiling with `Y == 0` at the top of the map.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct TileIndex {
    /// X index.
    pub x: u32,
    /// Y index.
    pub y: u32,
    /// Z index.
    pub z: u32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Decodes a quadkey (`"120210"`). Every digit is one zoom level, bit 0 of the digit selects the right half of the
    /// parent tile, bit 1 the bottom half.
    ///
    /// Returns `None` for empty keys, keys with characters other than `0..=3` and keys deeper than
    /// [`MAX_QUADKEY_LEVEL`].
    pub fn from_quadkey(quadkey: &str) -> Option<Self> {
        if quadkey.is_empty() || quadkey.len() > MAX_QUADKEY_LEVEL as usize {
            return None;
        }

        let mut index = Self::new(0, 0, 0);
        for digit in quadkey.chars() {
            let digit = digit.to_digit(4)?;
            index.x = (index.x << 1) | (digit & 1);
            index.y = (index.y << 1) | (digit >> 1);
            index.z += 1;
        }

        Some(index)
    }

    /// Longitude/latitude bounds of the tile in degrees.
    pub fn bounds(&self) -> Rect {
        let n = f64::from(1u32 << self.z);
        let lon = |x: u32| f64::from(x) / n * 360.0 - 180.0;
        let lat = |y: u32| (PI * (1.0 - 2.0 * f64::from(y) / n)).sinh().atan().to_degrees();

        Rect::new(
            lon(self.x),
            lat(self.y + 1),
            lon(self.x + 1),
            lat(self.y),
        )
    }
}
