//! Implementations of the [`Projection`](super::Projection) trait.
pub mod projection;
