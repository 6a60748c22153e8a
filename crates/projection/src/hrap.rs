//! HRAP national precipitation grid projection.
//!
//! A polar-stereographic-style grid on a mean sphere, true at 60°N with
//! its reference meridian at 105°W. One grid unit is 4.7625 km at the
//! standard latitude and the north pole sits at cell (column 401,
//! row 1601). Both directions are closed form.

use crate::spheroid::asinz;
use serde::{Deserialize, Serialize};

/// Mean earth radius used by the grid definition (km).
const EARTH_RADIUS_KM: f64 = 6371.2;
/// Grid mesh length at the standard latitude (km).
const MESH_LENGTH_KM: f64 = 4.7625;
/// Reference meridian, degrees west of Greenwich.
const STANDARD_LONGITUDE: f64 = 105.0;
/// Latitude at which the grid is true (degrees).
const STANDARD_LATITUDE: f64 = 60.0;
/// Grid column of the north pole.
const POLE_COLUMN: f64 = 401.0;
/// Grid row of the north pole.
const POLE_ROW: f64 = 1601.0;

/// The HRAP precipitation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hrap;

impl Hrap {
    /// Sphere radius expressed in grid units, scaled for the standard
    /// latitude.
    fn grid_radius() -> f64 {
        EARTH_RADIUS_KM * (1.0 + STANDARD_LATITUDE.to_radians().sin()) / MESH_LENGTH_KM
    }

    /// Geodetic degrees to HRAP (column, row).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let re = Self::grid_radius();
        let lat = lat_deg.to_radians();
        // Rotate to the reference meridian; input longitude is negative
        // in the western hemisphere.
        let rotated = (180.0 - STANDARD_LONGITUDE - lon_deg).to_radians();
        let r = re * lat.cos() / (1.0 + lat.sin());
        (
            r * rotated.sin() + POLE_COLUMN,
            r * rotated.cos() + POLE_ROW,
        )
    }

    /// HRAP (column, row) to geodetic degrees.
    ///
    /// The returned longitude follows the western-hemisphere convention
    /// of the grid's consumers: it is always negative, even for points
    /// that would normalize east of Greenwich.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - POLE_COLUMN;
        let dy = y - POLE_ROW;
        let rr = dx * dx + dy * dy;
        let gi = Self::grid_radius() * Self::grid_radius();
        let lat = asinz((gi - rr) / (gi + rr)).to_degrees();

        let mut angle = dy.atan2(dx).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        let mut lon_west = 270.0 + STANDARD_LONGITUDE - angle;
        if lon_west < 0.0 {
            lon_west += 360.0;
        }
        if lon_west > 360.0 {
            lon_west -= 360.0;
        }
        (-lon_west, lat)
    }

    /// Kilometers per grid unit near a sample point: invert back to
    /// geodetic space, then apply the closed-form latitude-only scale.
    pub fn kilometers_per_unit(&self, x: f64, y: f64) -> f64 {
        let (_lon, lat) = self.inverse(x, y);
        MESH_LENGTH_KM * (1.0 + lat.to_radians().sin())
            / (1.0 + STANDARD_LATITUDE.to_radians().sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pole_maps_to_fixed_cell() {
        let proj = Hrap;
        let (col, row) = proj.forward(-105.0, 90.0);
        assert!((col - 401.0).abs() < 1e-9, "col = {}", col);
        assert!((row - 1601.0).abs() < 1e-9, "row = {}", row);
    }

    #[test]
    fn test_roundtrip_central_plains() {
        let proj = Hrap;
        let (col, row) = proj.forward(-98.5, 39.0);

        // CONUS cells land in the positive national-grid window.
        assert!(col > 0.0 && col < 1160.0, "col = {}", col);
        assert!(row > 0.0 && row < 1000.0, "row = {}", row);

        let (lon, lat) = proj.inverse(col, row);
        assert!((lon - (-98.5)).abs() < 1e-4, "lon = {}", lon);
        assert!((lat - 39.0).abs() < 1e-4, "lat = {}", lat);
    }

    #[test]
    fn test_inverse_longitude_always_negative() {
        let proj = Hrap;
        for &(col, row) in &[(100.0, 100.0), (900.0, 800.0), (401.0, 100.0), (1200.0, 400.0)] {
            let (lon, _lat) = proj.inverse(col, row);
            assert!(lon <= 0.0, "lon = {} at ({}, {})", lon, col, row);
        }
    }

    #[test]
    fn test_scale_true_at_standard_latitude() {
        let proj = Hrap;
        let (col, row) = proj.forward(-105.0, 60.0);
        let km = proj.kilometers_per_unit(col, row);
        assert!((km - 4.7625).abs() < 1e-9, "km = {}", km);
    }

    #[test]
    fn test_scale_shrinks_toward_equator() {
        let proj = Hrap;
        let (col, row) = proj.forward(-105.0, 30.0);
        let km = proj.kilometers_per_unit(col, row);
        assert!(km < 4.7625, "km = {}", km);
    }
}
