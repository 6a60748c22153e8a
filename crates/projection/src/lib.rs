//! Cartographic projections for precipitation mapping.
//!
//! Converts between geodetic coordinates (longitude/latitude in degrees)
//! and the projected grid systems the map layers use: the HRAP national
//! precipitation grid, Universal Transverse Mercator, and a geographic
//! pass-through. Also re-projects whole shape trees while keeping their
//! cached extents consistent.

pub mod crs;
pub mod geographic;
pub mod hrap;
pub mod registry;
pub mod spheroid;
pub mod transform;
pub mod utm;

pub use crs::{need_to_project, Projection, ProjectionKind};
pub use geographic::Geographic;
pub use hrap::Hrap;
pub use registry::ProjectionRegistry;
pub use spheroid::{Datum, Spheroid};
pub use transform::{project_shape, project_shape_in_place};
pub use utm::{ConvergenceMode, Utm};
