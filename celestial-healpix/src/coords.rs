//! Angular coordinate systems accepted at the API boundary.
//!
//! | System | Components | Units | Valid range |
//! |--------|------------|-------|-------------|
//! | [`CoordSystem::Eq`] | right ascension, declination | degrees | dec in [-90, 90], any finite ra |
//! | [`CoordSystem::Ang`] | colatitude theta, longitude phi | radians | theta in [0, pi], any finite phi |
//!
//! Longitudes are wrapped (ra to [0, 360), phi to [0, 2pi)); latitudes are
//! validated and never clamped. Internally everything runs in (theta, phi),
//! with `theta = pi/2 - dec` and `phi = ra`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::constants::{DEG_TO_RAD, HALF_PI, PI, RAD_TO_DEG, TWOPI};
use crate::error::{Error, Result};
use crate::math::{vincenty_angular_separation, wrap_0_2pi, wrap_0_360};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoordSystem {
    /// Equatorial (ra, dec) in degrees.
    Eq,
    /// Angular (theta, phi) in radians.
    Ang,
}

impl FromStr for CoordSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "ang" => Ok(Self::Ang),
            _ => Err(Error::UnknownSystem(s.to_string())),
        }
    }
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => f.write_str("eq"),
            Self::Ang => f.write_str("ang"),
        }
    }
}

/// A point on the sphere in either boundary representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Eq { ra: f64, dec: f64 },
    Ang { theta: f64, phi: f64 },
}

impl Position {
    /// Builds a position from two components interpreted per `system`.
    pub fn new(system: CoordSystem, a: f64, b: f64) -> Self {
        match system {
            CoordSystem::Eq => Self::Eq { ra: a, dec: b },
            CoordSystem::Ang => Self::Ang { theta: a, phi: b },
        }
    }

    pub fn system(&self) -> CoordSystem {
        match self {
            Self::Eq { .. } => CoordSystem::Eq,
            Self::Ang { .. } => CoordSystem::Ang,
        }
    }

    /// Validated (theta, phi) in radians, phi wrapped to [0, 2pi).
    pub fn to_ang(&self) -> Result<(f64, f64)> {
        match *self {
            Self::Eq { ra, dec } => eq2ang(ra, dec),
            Self::Ang { theta, phi } => Ok((validate_theta(theta)?, validate_phi(phi)?)),
        }
    }

    /// Validated (ra, dec) in degrees, ra wrapped to [0, 360).
    pub fn to_eq(&self) -> Result<(f64, f64)> {
        let (theta, phi) = self.to_ang()?;
        Ok(ang2eq(theta, phi))
    }
}

pub fn validate_theta(theta: f64) -> Result<f64> {
    if !theta.is_finite() {
        return Err(Error::domain("theta", theta, "not finite"));
    }
    if !(0.0..=PI).contains(&theta) {
        return Err(Error::domain("theta", theta, "must be within [0, pi] radians"));
    }
    Ok(theta)
}

pub fn validate_phi(phi: f64) -> Result<f64> {
    if !phi.is_finite() {
        return Err(Error::domain("phi", phi, "not finite"));
    }
    Ok(wrap_0_2pi(phi))
}

pub fn validate_dec(dec: f64) -> Result<f64> {
    if !dec.is_finite() {
        return Err(Error::domain("dec", dec, "not finite"));
    }
    if !(-90.0..=90.0).contains(&dec) {
        return Err(Error::domain("dec", dec, "must be within [-90, 90] degrees"));
    }
    Ok(dec)
}

pub fn validate_ra(ra: f64) -> Result<f64> {
    if !ra.is_finite() {
        return Err(Error::domain("ra", ra, "not finite"));
    }
    Ok(wrap_0_360(ra))
}

/// Converts (ra, dec) degrees to (theta, phi) radians.
pub fn eq2ang(ra: f64, dec: f64) -> Result<(f64, f64)> {
    let ra = validate_ra(ra)?;
    let dec = validate_dec(dec)?;
    // dec is already validated, this only absorbs rounding at the poles
    let theta = ((90.0 - dec) * DEG_TO_RAD).clamp(0.0, PI);
    Ok((theta, wrap_0_2pi(ra * DEG_TO_RAD)))
}

/// Converts (theta, phi) radians to (ra, dec) degrees. Inputs are assumed
/// valid; use [`Position::to_eq`] for checked conversion.
#[inline]
pub fn ang2eq(theta: f64, phi: f64) -> (f64, f64) {
    let ra = wrap_0_360(phi * RAD_TO_DEG);
    let dec = 90.0 - theta * RAD_TO_DEG;
    (ra, dec)
}

/// Unit vector for (theta, phi).
#[inline]
pub fn ang2vec(theta: f64, phi: f64) -> [f64; 3] {
    let (st, ct) = libm::sincos(theta);
    let (sp, cp) = libm::sincos(phi);
    [st * cp, st * sp, ct]
}

/// (theta, phi) of a non-zero vector.
#[inline]
pub fn vec2ang(v: [f64; 3]) -> (f64, f64) {
    let rxy = libm::hypot(v[0], v[1]);
    let theta = libm::atan2(rxy, v[2]);
    let phi = if rxy == 0.0 {
        0.0
    } else {
        wrap_0_2pi(libm::atan2(v[1], v[0]))
    };
    (theta, phi)
}

/// Great-circle distance in radians between two (theta, phi) points.
#[inline]
pub fn angular_distance(theta1: f64, phi1: f64, theta2: f64, phi2: f64) -> f64 {
    let (st1, ct1) = libm::sincos(theta1);
    let (st2, ct2) = libm::sincos(theta2);
    // sin(lat) = cos(theta), cos(lat) = sin(theta)
    vincenty_angular_separation(ct1, st1, ct2, st2, phi2 - phi1)
}

/// Great-circle distance in degrees between two (ra, dec) points in degrees.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (d1_sin, d1_cos) = libm::sincos(dec1_deg * DEG_TO_RAD);
    let (d2_sin, d2_cos) = libm::sincos(dec2_deg * DEG_TO_RAD);
    let delta_lon = (ra2_deg - ra1_deg) * DEG_TO_RAD;
    vincenty_angular_separation(d1_sin, d1_cos, d2_sin, d2_cos, delta_lon) * RAD_TO_DEG
}

/// Draws `n` points uniformly over the whole sphere, as (ra, dec) degrees.
pub fn randsphere<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut ra = Vec::with_capacity(n);
    let mut dec = Vec::with_capacity(n);
    for _ in 0..n {
        let phi = rng.gen::<f64>() * TWOPI;
        let z = 1.0 - 2.0 * rng.gen::<f64>();
        let (r, d) = ang2eq(libm::acos(z), phi);
        ra.push(r);
        dec.push(d);
    }
    (ra, dec)
}

/// Draws `n` points uniformly inside the spherical cap of radius
/// `radius_deg` around (`ra_deg`, `dec_deg`), as (ra, dec) degrees.
pub fn randcap<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    ra_deg: f64,
    dec_deg: f64,
    radius_deg: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let (theta0, phi0) = eq2ang(ra_deg, dec_deg)?;
    if !radius_deg.is_finite() || !(0.0..=180.0).contains(&radius_deg) {
        return Err(Error::domain(
            "radius",
            radius_deg,
            "must be within [0, 180] degrees",
        ));
    }
    let lat0 = HALF_PI - theta0;
    let (sin_lat0, cos_lat0) = libm::sincos(lat0);
    let cos_radius = libm::cos(radius_deg * DEG_TO_RAD);

    let mut ra = Vec::with_capacity(n);
    let mut dec = Vec::with_capacity(n);
    for _ in 0..n {
        // cos(distance) uniform in [cos(radius), 1] gives uniform area
        let cos_d = cos_radius + (1.0 - cos_radius) * rng.gen::<f64>();
        let sin_d = libm::sqrt((1.0 - cos_d * cos_d).max(0.0));
        let bearing = rng.gen::<f64>() * TWOPI;
        let (sin_b, cos_b) = libm::sincos(bearing);

        let sin_lat = (sin_lat0 * cos_d + cos_lat0 * sin_d * cos_b).clamp(-1.0, 1.0);
        let lat = libm::asin(sin_lat);
        let dlon = libm::atan2(sin_b * sin_d * cos_lat0, cos_d - sin_lat0 * sin_lat);

        ra.push(wrap_0_360((phi0 + dlon) * RAD_TO_DEG));
        dec.push(lat * RAD_TO_DEG);
    }
    Ok((ra, dec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_system_parse() {
        assert_eq!("eq".parse::<CoordSystem>().unwrap(), CoordSystem::Eq);
        assert_eq!("ANG".parse::<CoordSystem>().unwrap(), CoordSystem::Ang);
        let err = "galactic".parse::<CoordSystem>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
    }

    #[test]
    fn test_eq2ang_poles_and_equator() {
        let (theta, _) = eq2ang(0.0, 90.0).unwrap();
        assert_eq!(theta, 0.0);
        let (theta, _) = eq2ang(0.0, -90.0).unwrap();
        assert!((theta - PI).abs() < 1e-15 && theta <= PI);
        let (theta, phi) = eq2ang(180.0, 0.0).unwrap();
        assert!((theta - HALF_PI).abs() < 1e-15);
        assert!((phi - PI).abs() < 1e-15);
    }

    #[test]
    fn test_eq2ang_wraps_ra() {
        let (_, phi_a) = eq2ang(-90.0, 10.0).unwrap();
        let (_, phi_b) = eq2ang(270.0, 10.0).unwrap();
        assert!((phi_a - phi_b).abs() < 1e-12);
    }

    #[test]
    fn test_eq2ang_rejects_bad_dec() {
        assert_eq!(eq2ang(0.0, 90.5).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(eq2ang(0.0, f64::NAN).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(
            eq2ang(f64::INFINITY, 0.0).unwrap_err().kind(),
            ErrorKind::Domain
        );
    }

    #[test]
    fn test_position_to_ang() {
        let p = Position::new(CoordSystem::Ang, 1.0, -1.0);
        let (theta, phi) = p.to_ang().unwrap();
        assert_eq!(theta, 1.0);
        assert!((phi - (TWOPI - 1.0)).abs() < 1e-15);
        assert!(Position::new(CoordSystem::Ang, -0.1, 0.0).to_ang().is_err());
        assert!(Position::new(CoordSystem::Ang, 3.2, 0.0).to_ang().is_err());
    }

    #[test]
    fn test_ang2eq_inverse_of_eq2ang() {
        let (theta, phi) = eq2ang(123.456, -33.3).unwrap();
        let (ra, dec) = ang2eq(theta, phi);
        assert!((ra - 123.456).abs() < 1e-10);
        assert!((dec + 33.3).abs() < 1e-10);
    }

    #[test]
    fn test_vec_roundtrip() {
        let v = ang2vec(1.1, 4.0);
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-15);
        let (theta, phi) = vec2ang(v);
        assert!((theta - 1.1).abs() < 1e-12);
        assert!((phi - 4.0).abs() < 1e-12);
        assert_eq!(vec2ang([0.0, 0.0, 1.0]), (0.0, 0.0));
    }

    #[test]
    fn test_angular_distance() {
        assert!((angular_distance(0.0, 0.0, PI, 0.0) - PI).abs() < 1e-12);
        assert!((angular_distance(HALF_PI, 0.0, HALF_PI, HALF_PI) - HALF_PI).abs() < 1e-12);
        assert!(angular_distance(0.3, 1.0, 0.3, 1.0).abs() < 1e-12);
        // longitude is irrelevant at the pole
        assert!((angular_distance(0.0, 0.0, 0.5, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_angular_separation_deg() {
        assert!((angular_separation_deg(0.0, 0.0, 90.0, 0.0) - 90.0).abs() < 1e-10);
        assert!((angular_separation_deg(0.0, 90.0, 0.0, -90.0) - 180.0).abs() < 1e-10);
        let dist = angular_separation_deg(0.0, 0.0, 0.1, 0.1);
        assert!(dist > 0.14 && dist < 0.15);
    }

    #[test]
    fn test_randsphere_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (ra, dec) = randsphere(&mut rng, 5000);
        assert_eq!(ra.len(), 5000);
        assert!(ra.iter().all(|r| (0.0..360.0).contains(r)));
        assert!(dec.iter().all(|d| (-90.0..=90.0).contains(d)));
        let north = dec.iter().filter(|&&d| d > 0.0).count();
        assert!((2300..2700).contains(&north), "north = {north}");
    }

    #[test]
    fn test_randcap_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (ra, dec) = randcap(&mut rng, 2000, 350.0, 80.0, 15.0).unwrap();
        for (r, d) in ra.iter().zip(&dec) {
            let sep = angular_separation_deg(350.0, 80.0, *r, *d);
            assert!(sep <= 15.0 + 1e-9, "sep {sep}");
        }
        assert!(randcap(&mut rng, 1, 0.0, 0.0, -1.0).is_err());
    }
}
