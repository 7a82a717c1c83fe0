//! Conversion between coordinate systems (see [`Projection`]) and the definitions they are built from.

pub mod impls;
mod projection;

pub use projection::{InvertedProjection, Projection};
