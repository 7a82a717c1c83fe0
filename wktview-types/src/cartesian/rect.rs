use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// Axis aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Left edge.
    pub x_min: N,
    /// Bottom edge.
    pub y_min: N,
    /// Right edge.
    pub x_max: N,
    /// Top edge.
    pub y_max: N,
}

impl<N: Float> Rect<N> {
    /// Creates a new rectangle. The values are stored as given.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Left edge.
    pub fn x_min(&self) -> N {
        self.x_min
    }

    /// Right edge.
    pub fn x_max(&self) -> N {
        self.x_max
    }

    /// Bottom edge.
    pub fn y_min(&self) -> N {
        self.y_min
    }

    /// Top edge.
    pub fn y_max(&self) -> N {
        self.y_max
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Returns true if the rectangle contains the point (edges inclusive).
    pub fn contains(&self, x: N, y: N) -> bool {
        self.x_min <= x && self.x_max >= x && self.y_min <= y && self.y_max >= y
    }
}

impl Rect<f64> {
    /// Bounding rectangle of the given coordinates, `None` if the iterator is empty.
    pub fn from_coords<'a>(mut coords: impl Iterator<Item = &'a Coord>) -> Option<Self> {
        let first = coords.next()?;
        let init = Self::new(first.x, first.y, first.x, first.y);
        Some(coords.fold(init, |rect, c| rect.merge(Self::new(c.x, c.y, c.x, c.y))))
    }

    /// Corners of the rectangle in the order top-left, top-right, bottom-right, bottom-left.
    pub fn into_quadrangle(self) -> [Coord; 4] {
        [
            Coord::new(self.x_min, self.y_max),
            Coord::new(self.x_max, self.y_max),
            Coord::new(self.x_max, self.y_min),
            Coord::new(self.x_min, self.y_min),
        ]
    }

    /// Closed ring of the rectangle: top-left, top-right, bottom-right, bottom-left, top-left.
    pub fn into_ring(self) -> Vec<Coord> {
        let corners = self.into_quadrangle();
        let mut ring = Vec::from(corners);
        ring.push(corners[0]);
        ring
    }
}
