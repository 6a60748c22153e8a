//! Geographic pass-through projection.

use serde::{Deserialize, Serialize};

/// Identity projection: geodetic degrees in, the same degrees out.
///
/// Layers whose source data is already longitude/latitude use this so
/// the rest of the pipeline can treat every layer uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geographic;

impl Geographic {
    /// Forward transform (identity).
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }

    /// Inverse transform (identity).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    /// Crude scale estimate: km per degree of longitude at the sample
    /// latitude. Indicative display scale only, not a distance formula.
    pub fn kilometers_per_unit(&self, _x: f64, y: f64) -> f64 {
        111.3 * y.to_radians().cos()
    }
}
