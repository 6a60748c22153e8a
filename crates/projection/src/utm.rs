//! Universal Transverse Mercator projection.
//!
//! Ported from the classical USGS GCTP formulation: a truncated
//! power-series ellipsoidal branch and a closed-form spherical branch,
//! selected by the spheroid's eccentricity. The inverse ellipsoidal
//! transform recovers the footpoint latitude by a bounded fixed-point
//! iteration on the meridian-distance series.

use crate::spheroid::{adjust_longitude, asinz, Datum, Spheroid};
use map_common::{MapError, MapResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Default scale factor along the central meridian.
pub const DEFAULT_SCALE_FACTOR: f64 = 0.9996;
/// Default false easting (meters).
pub const DEFAULT_FALSE_EASTING: f64 = 500_000.0;
/// False northing applied to southern-hemisphere zones (meters).
pub const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.0;

const MAX_INVERSE_ITERATIONS: usize = 6;
const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Policy for an inverse transform whose footpoint iteration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConvergenceMode {
    /// Surface the failure as an error.
    #[default]
    Strict,
    /// Historical behavior: quietly return (0, 0).
    ClampToOrigin,
}

/// One UTM zone's projection.
///
/// A negative `zone` encodes a southern-hemisphere zone of the same
/// magnitude, which changes only the default false northing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utm {
    pub zone: i32,
    pub datum: Datum,
    pub spheroid: Spheroid,
    /// Central meridian (radians).
    pub lon_center: f64,
    /// Latitude of origin (radians).
    pub lat_origin: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub scale_factor: f64,
    /// Meridian distance at the origin latitude, cached at construction.
    ml0: f64,
    pub convergence_mode: ConvergenceMode,
}

impl Utm {
    /// A zone with NAD83 and the standard UTM constants.
    pub fn new(zone: i32) -> MapResult<Self> {
        Self::with_datum(zone, Datum::Nad83)
    }

    /// A zone on the given datum with the standard UTM constants.
    pub fn with_datum(zone: i32, datum: Datum) -> MapResult<Self> {
        Self::with_params(zone, datum, None, None, None, None, None)
    }

    /// Full constructor; `None` selects each documented default.
    pub fn with_params(
        zone: i32,
        datum: Datum,
        false_easting: Option<f64>,
        false_northing: Option<f64>,
        central_longitude_deg: Option<f64>,
        origin_latitude_deg: Option<f64>,
        scale_factor: Option<f64>,
    ) -> MapResult<Self> {
        if zone == 0 || zone.abs() > 60 {
            return Err(MapError::InvalidZone(zone));
        }
        let spheroid = Spheroid::from_datum(datum);
        let lon_center = central_longitude_deg
            .unwrap_or_else(|| zone_central_meridian(zone))
            .to_radians();
        let lat_origin = origin_latitude_deg.unwrap_or(0.0).to_radians();
        let ml0 = spheroid.meridian_distance(lat_origin);
        Ok(Self {
            zone,
            datum,
            spheroid,
            lon_center,
            lat_origin,
            false_easting: false_easting.unwrap_or(DEFAULT_FALSE_EASTING),
            false_northing: false_northing.unwrap_or(if zone < 0 {
                SOUTHERN_FALSE_NORTHING
            } else {
                0.0
            }),
            scale_factor: scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR),
            ml0,
            convergence_mode: ConvergenceMode::default(),
        })
    }

    /// Spherical-branch construction on the mean sphere, for callers
    /// that want the closed-form math.
    pub fn new_spherical(zone: i32) -> MapResult<Self> {
        Self::with_datum(zone, Datum::Sphere)
    }

    /// Parse the tokens following `UTM` in a projection descriptor:
    /// `zone[,datum,falseEasting,falseNorthing,centralLongitude,originLatitude,scale]`.
    /// Empty or missing trailing tokens fall back to the defaults.
    pub fn from_tokens(tokens: &[&str]) -> MapResult<Self> {
        let zone_token = present(tokens, 0)
            .ok_or_else(|| MapError::InvalidDescriptor("UTM descriptor missing zone".into()))?;
        let zone: i32 = zone_token
            .parse()
            .map_err(|_| MapError::InvalidDescriptor(format!("bad UTM zone: {zone_token:?}")))?;

        let datum = match present(tokens, 1) {
            Some(name) => Datum::from_name(name),
            None => Datum::Nad83,
        };

        Self::with_params(
            zone,
            datum,
            numeric(tokens, 2)?,
            numeric(tokens, 3)?,
            numeric(tokens, 4)?,
            numeric(tokens, 5)?,
            numeric(tokens, 6)?,
        )
    }

    /// Switch the non-convergence policy; returns self for chaining.
    pub fn with_convergence_mode(mut self, mode: ConvergenceMode) -> Self {
        self.convergence_mode = mode;
        self
    }

    /// Geodetic degrees to projected meters (easting, northing).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> MapResult<(f64, f64)> {
        let lat = lat_deg.to_radians();
        let delta_lon = adjust_longitude(lon_deg.to_radians() - self.lon_center);
        let sin_phi = lat.sin();
        let cos_phi = lat.cos();

        if self.spheroid.is_spherical() {
            let b = cos_phi * delta_lon.sin();
            if (b.abs() - 1.0).abs() < 1e-10 {
                return Err(MapError::ProjectionDomain(format!(
                    "({lon_deg}, {lat_deg}) is 90 degrees from the central meridian"
                )));
            }
            let rk = self.spheroid.a * self.scale_factor;
            let x = 0.5 * rk * ((1.0 + b) / (1.0 - b)).ln() + self.false_easting;
            let mut con = (cos_phi * delta_lon.cos() / (1.0 - b * b).sqrt())
                .clamp(-1.0, 1.0)
                .acos();
            if lat < 0.0 {
                con = -con;
            }
            let y = rk * (con - self.lat_origin) + self.false_northing;
            return Ok((x, y));
        }

        let sp = &self.spheroid;
        let al = cos_phi * delta_lon;
        let als = al * al;
        let c = sp.esp * cos_phi * cos_phi;
        let tq = lat.tan();
        let t = tq * tq;
        let con = 1.0 - sp.es * sin_phi * sin_phi;
        let n = sp.a / con.sqrt();
        let ml = sp.meridian_distance(lat);

        let x = self.scale_factor
            * n
            * al
            * (1.0
                + als / 6.0
                    * (1.0 - t + c
                        + als / 20.0 * (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * sp.esp)))
            + self.false_easting;
        let y = self.scale_factor
            * (ml - self.ml0
                + n * tq
                    * (als
                        * (0.5
                            + als / 24.0
                                * (5.0 - t + 9.0 * c + 4.0 * c * c
                                    + als / 30.0
                                        * (61.0 - 58.0 * t + t * t + 600.0 * c
                                            - 330.0 * sp.esp)))))
            + self.false_northing;
        Ok((x, y))
    }

    /// Projected meters to geodetic degrees (longitude, latitude).
    pub fn inverse(&self, x: f64, y: f64) -> MapResult<(f64, f64)> {
        let dx = x - self.false_easting;
        let dy = y - self.false_northing;

        if self.spheroid.is_spherical() {
            let rk = self.spheroid.a * self.scale_factor;
            let f = (dx / rk).exp();
            let g = 0.5 * (f - 1.0 / f);
            let temp = self.lat_origin + dy / rk;
            let h = temp.cos();
            let con = ((1.0 - h * h) / (1.0 + g * g)).sqrt();
            let mut lat = asinz(con);
            if temp < 0.0 {
                lat = -lat;
            }
            let lon = if g == 0.0 && h == 0.0 {
                self.lon_center
            } else {
                adjust_longitude(g.atan2(h) + self.lon_center)
            };
            return Ok((lon.to_degrees(), lat.to_degrees()));
        }

        let sp = &self.spheroid;
        let con = (self.ml0 + dy / self.scale_factor) / sp.a;
        let phi = match self.footpoint_latitude(con) {
            Some(phi) => phi,
            None => match self.convergence_mode {
                ConvergenceMode::Strict => {
                    return Err(MapError::ConvergenceFailure { x, y });
                }
                ConvergenceMode::ClampToOrigin => {
                    tracing::warn!(x, y, "footpoint iteration did not converge, clamping");
                    return Ok((0.0, 0.0));
                }
            },
        };

        if phi.abs() >= FRAC_PI_2 {
            // Poleward of the series' validity: closed-form polar branch.
            let lat = FRAC_PI_2.copysign(dy);
            return Ok((self.lon_center.to_degrees(), lat.to_degrees()));
        }

        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let tan_phi = phi.tan();
        let c = sp.esp * cos_phi * cos_phi;
        let cs = c * c;
        let t = tan_phi * tan_phi;
        let ts = t * t;
        let con = 1.0 - sp.es * sin_phi * sin_phi;
        let n = sp.a / con.sqrt();
        let r = n * (1.0 - sp.es) / con;
        let d = dx / (n * self.scale_factor);
        let ds = d * d;

        let lat = phi
            - (n * tan_phi * ds / r)
                * (0.5
                    - ds / 24.0
                        * (5.0 + 3.0 * t + 10.0 * c - 4.0 * cs - 9.0 * sp.esp
                            - ds / 30.0
                                * (61.0 + 90.0 * t + 298.0 * c + 45.0 * ts
                                    - 252.0 * sp.esp
                                    - 3.0 * cs)));
        let lon = adjust_longitude(
            self.lon_center
                + d * (1.0
                    - ds / 6.0
                        * (1.0 + 2.0 * t + c
                            - ds / 20.0
                                * (5.0 - 2.0 * c + 28.0 * t - 3.0 * cs
                                    + 8.0 * sp.esp
                                    + 24.0 * ts)))
                    / cos_phi,
        );
        Ok((lon.to_degrees(), lat.to_degrees()))
    }

    /// Projected units are meters, so the display scale is flat.
    pub fn kilometers_per_unit(&self, _x: f64, _y: f64) -> f64 {
        0.001
    }

    /// Fixed-point iteration for the footpoint latitude, capped at
    /// [`MAX_INVERSE_ITERATIONS`] steps. `None` means no convergence
    /// within tolerance by the final step.
    fn footpoint_latitude(&self, con: f64) -> Option<f64> {
        let sp = &self.spheroid;
        let mut phi = con;
        for _ in 0..MAX_INVERSE_ITERATIONS {
            let next = (con + sp.e1 * (2.0 * phi).sin() - sp.e2 * (4.0 * phi).sin()
                + sp.e3 * (6.0 * phi).sin())
                / sp.e0;
            let delta = (next - phi).abs();
            phi = next;
            if delta <= CONVERGENCE_TOLERANCE {
                return Some(phi);
            }
        }
        None
    }
}

/// Central meridian in degrees for a zone number: `6·|zone| − 183`.
pub fn zone_central_meridian(zone: i32) -> f64 {
    (6 * zone.abs() - 183) as f64
}

fn present<'a>(tokens: &[&'a str], index: usize) -> Option<&'a str> {
    tokens
        .get(index)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
}

fn numeric(tokens: &[&str], index: usize) -> MapResult<Option<f64>> {
    match present(tokens, index) {
        None => Ok(None),
        Some(t) => t
            .parse()
            .map(Some)
            .map_err(|_| MapError::InvalidDescriptor(format!("bad UTM parameter: {t:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(zone_central_meridian(1), -177.0);
        assert_eq!(zone_central_meridian(60), 177.0);

        assert!(matches!(Utm::new(0), Err(MapError::InvalidZone(0))));
        assert!(matches!(Utm::new(61), Err(MapError::InvalidZone(61))));
        assert!(matches!(Utm::new(-61), Err(MapError::InvalidZone(-61))));
        assert!(Utm::new(1).is_ok());
        assert!(Utm::new(60).is_ok());
    }

    #[test]
    fn test_zone13_central_meridian_forward() {
        let proj = Utm::new(13).unwrap();
        // -105 is exactly zone 13's central meridian, so the easting is
        // the false easting and the northing matches the published
        // meridian distance scaled by k0.
        let (x, y) = proj.forward(-105.0, 40.0).unwrap();
        assert!((x - 500_000.0).abs() < 1e-6, "x = {}", x);
        assert!((y - 4_427_757.2).abs() < 5.0, "y = {}", y);
    }

    #[test]
    fn test_ellipsoidal_roundtrip() {
        let proj = Utm::new(13).unwrap();
        for &(lon, lat) in &[
            (-104.0, 39.5),
            (-106.25, 41.0),
            (-102.0, 35.0),
            (-108.0, 45.0),
        ] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-6, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_spherical_roundtrip() {
        let proj = Utm::new_spherical(13).unwrap();
        assert!(proj.spheroid.is_spherical());

        for &(lon, lat) in &[(-104.0, 40.0), (-105.5, 20.0), (-103.0, -35.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-6, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_spherical_forward_rejects_antipodal_meridian() {
        let proj = Utm::new_spherical(31).unwrap();
        // Zone 31's central meridian is 3°E; 93°E on the equator is 90°
        // away and projects to infinity.
        let result = proj.forward(93.0, 0.0);
        assert!(matches!(result, Err(MapError::ProjectionDomain(_))));
    }

    #[test]
    fn test_southern_zone_false_northing() {
        let north = Utm::new(56).unwrap();
        let south = Utm::new(-56).unwrap();
        assert_eq!(north.false_northing, 0.0);
        assert_eq!(south.false_northing, SOUTHERN_FALSE_NORTHING);

        // Sydney-ish point lands below the false northing in the south.
        let (_, y) = south.forward(151.0, -33.9).unwrap();
        assert!(y > 6_000_000.0 && y < SOUTHERN_FALSE_NORTHING, "y = {}", y);

        let (lon, lat) = south.inverse(south.forward(151.0, -33.9).unwrap().0, y).unwrap();
        assert!((lon - 151.0).abs() < 1e-6);
        assert!((lat - (-33.9)).abs() < 1e-6);
    }

    #[test]
    fn test_from_tokens_defaults() {
        let proj = Utm::from_tokens(&["19"]).unwrap();
        assert_eq!(proj.zone, 19);
        assert_eq!(proj.datum, Datum::Nad83);
        assert_eq!(proj.false_easting, DEFAULT_FALSE_EASTING);
        assert_eq!(proj.false_northing, 0.0);
        assert_eq!(proj.scale_factor, DEFAULT_SCALE_FACTOR);
        assert!((proj.lon_center.to_degrees() - (-69.0)).abs() < 1e-12);
    }

    #[test]
    fn test_from_tokens_empty_tokens_fall_back() {
        let proj = Utm::from_tokens(&["13", "", "", "", "", "", ""]).unwrap();
        assert_eq!(proj.datum, Datum::Nad83);
        assert_eq!(proj.false_easting, DEFAULT_FALSE_EASTING);
        assert_eq!(proj.scale_factor, DEFAULT_SCALE_FACTOR);
    }

    #[test]
    fn test_from_tokens_overrides() {
        let proj =
            Utm::from_tokens(&["13", "NAD27", "250000", "100", "-104.5", "1.5", "0.9999"]).unwrap();
        assert_eq!(proj.datum, Datum::Nad27);
        assert_eq!(proj.false_easting, 250_000.0);
        assert_eq!(proj.false_northing, 100.0);
        assert!((proj.lon_center.to_degrees() - (-104.5)).abs() < 1e-12);
        assert!((proj.lat_origin.to_degrees() - 1.5).abs() < 1e-12);
        assert_eq!(proj.scale_factor, 0.9999);
    }

    #[test]
    fn test_from_tokens_unrecognized_datum_falls_back_to_nad27() {
        let proj = Utm::from_tokens(&["13", "WGS72"]).unwrap();
        assert_eq!(proj.datum, Datum::Nad27);
    }

    #[test]
    fn test_from_tokens_bad_numeric() {
        assert!(matches!(
            Utm::from_tokens(&["13", "NAD83", "abc"]),
            Err(MapError::InvalidDescriptor(_))
        ));
        assert!(matches!(
            Utm::from_tokens(&["x13"]),
            Err(MapError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_clamp_mode_returns_origin() {
        // An absurd northing drives the footpoint series far outside
        // convergence. Strict mode errors; legacy mode clamps.
        let strict = Utm::new(13).unwrap();
        let y = 1e300;
        let result = strict.inverse(500_000.0, y);
        assert!(matches!(result, Err(MapError::ConvergenceFailure { .. })));

        let legacy = Utm::new(13)
            .unwrap()
            .with_convergence_mode(ConvergenceMode::ClampToOrigin);
        let (lon, lat) = legacy.inverse(500_000.0, y).unwrap();
        assert_eq!((lon, lat), (0.0, 0.0));
    }

    #[test]
    fn test_kilometers_per_unit_is_flat() {
        let proj = Utm::new(13).unwrap();
        assert_eq!(proj.kilometers_per_unit(500_000.0, 4_000_000.0), 0.001);
    }
}
