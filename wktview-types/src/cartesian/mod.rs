//! Types and functions on geometries in cartesian coordinates.

mod rect;

pub use rect::Rect;
