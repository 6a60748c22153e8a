//! Common geometry types shared across the precip-map crates.

pub mod error;
pub mod extent;
pub mod shape;

pub use error::{MapError, MapResult};
pub use extent::Extent;
pub use shape::{BoxCorners, PointExtra, Shape, ShapeList, Vertex, VertexList};
