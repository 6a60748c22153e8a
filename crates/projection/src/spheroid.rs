//! Reference spheroids and the numerical helpers shared by projections.
//!
//! The series coefficients follow the classical USGS GCTP formulation:
//! `e0..e3` feed the meridian-distance expansion, `es`/`esp` are the
//! first and second eccentricity squared.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean sphere radius shared by both recognized datums (meters).
pub const SPHERE_RADIUS_M: f64 = 6_370_997.0;

/// Eccentricity-squared threshold below which a spheroid is treated as
/// a sphere and the closed-form transform branches apply.
pub const SPHERICAL_EPS: f64 = 1e-5;

const MAX_ADJUST_ITERATIONS: usize = 4;

/// Recognized reference datums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Datum {
    /// Clarke 1866 ellipsoid.
    Nad27,
    /// GRS 1980 ellipsoid.
    Nad83,
    /// Mean-radius sphere. Never produced by name lookup; constructed
    /// programmatically when spherical transform math is wanted.
    Sphere,
}

impl Datum {
    /// Resolve a datum name, case-insensitively.
    ///
    /// Anything unrecognized falls back to NAD27. The fallback is a
    /// deliberately forgiving policy inherited from the configuration
    /// files this parser serves, not an error.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("NAD83") {
            Datum::Nad83
        } else {
            Datum::Nad27
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Datum::Nad27 => "NAD27",
            Datum::Nad83 => "NAD83",
            Datum::Sphere => "SPHERE",
        }
    }

    /// Semi-major axis in meters.
    pub fn semi_major(&self) -> f64 {
        match self {
            Datum::Nad27 => 6_378_206.4,
            Datum::Nad83 => 6_378_137.0,
            Datum::Sphere => SPHERE_RADIUS_M,
        }
    }

    /// Semi-minor axis in meters.
    pub fn semi_minor(&self) -> f64 {
        match self {
            Datum::Nad27 => 6_356_583.8,
            Datum::Nad83 => 6_356_752.31414,
            Datum::Sphere => SPHERE_RADIUS_M,
        }
    }
}

/// Spheroid constants derived once at construction and reused across
/// many transform calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spheroid {
    /// Semi-major axis (meters).
    pub a: f64,
    /// Semi-minor axis (meters).
    pub b: f64,
    /// First eccentricity squared.
    pub es: f64,
    /// Second eccentricity squared.
    pub esp: f64,
    pub e0: f64,
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
}

impl Spheroid {
    /// Derive the cached constants for a datum's ellipsoid.
    pub fn from_datum(datum: Datum) -> Self {
        Self::from_axes(datum.semi_major(), datum.semi_minor())
    }

    /// Derive the cached constants from raw axis lengths.
    pub fn from_axes(a: f64, b: f64) -> Self {
        let es = 1.0 - (b * b) / (a * a);
        let esp = es / (1.0 - es);
        Self {
            a,
            b,
            es,
            esp,
            e0: 1.0 - 0.25 * es * (1.0 + es / 16.0 * (3.0 + 1.25 * es)),
            e1: 0.375 * es * (1.0 + 0.25 * es * (1.0 + 0.46875 * es)),
            e2: 0.05859375 * es * es * (1.0 + 0.75 * es),
            e3: es * es * es * (35.0 / 3072.0),
        }
    }

    /// Whether the closed-form spherical transform branches apply.
    pub fn is_spherical(&self) -> bool {
        self.es < SPHERICAL_EPS
    }

    /// Distance along the meridian from the equator to latitude `phi`
    /// (radians in, meters out), via the truncated series.
    pub fn meridian_distance(&self, phi: f64) -> f64 {
        self.a
            * (self.e0 * phi - self.e1 * (2.0 * phi).sin() + self.e2 * (4.0 * phi).sin()
                - self.e3 * (6.0 * phi).sin())
    }
}

/// Reduce an angle into `[-π, π]` by repeated subtraction of
/// `sign(x)·2π`, bounded to a fixed iteration count.
///
/// Every projection routes longitudes through this helper so round
/// trips stay bit-for-bit stable.
pub fn adjust_longitude(mut x: f64) -> f64 {
    for _ in 0..MAX_ADJUST_ITERATIONS {
        if x.abs() <= PI {
            break;
        }
        x -= x.signum() * 2.0 * PI;
    }
    x
}

/// Arcsine with the argument clamped into `[-1, 1]`, so accumulated
/// floating-point error at the domain edge cannot produce NaN.
pub fn asinz(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}
