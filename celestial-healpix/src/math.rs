//! Small numeric helpers shared by the pixelization code.
//!
//! Wrapping uses `libm::fmod` rather than `%` so that the behavior for
//! negative inputs is explicit: `fmod` keeps the sign of the dividend and the
//! wrap functions then shift negative results up by one period.

use crate::constants::TWOPI;

#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

/// Wraps an angle to [0, 2pi) radians.
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w < 0.0 {
        // -tiny + 2pi rounds to 2pi, which is outside the half-open range
        let shifted = w + TWOPI;
        if shifted >= TWOPI {
            0.0
        } else {
            shifted
        }
    } else {
        w
    }
}

/// Wraps an angle to [0, 360) degrees.
#[inline]
pub fn wrap_0_360(x: f64) -> f64 {
    let w = fmod(x, 360.0);
    if w < 0.0 {
        let shifted = w + 360.0;
        if shifted >= 360.0 {
            0.0
        } else {
            shifted
        }
    } else {
        w
    }
}

/// Great-circle distance from latitude sines/cosines and a longitude
/// difference. Accurate at all separations, including near 0 and pi.
#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Integer square root, exact for every `u64`.
#[inline]
pub fn isqrt(x: u64) -> u64 {
    let mut r = libm::sqrt(x as f64) as u64;
    while r > 0 && r.checked_mul(r).map_or(true, |sq| sq > x) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= x) {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;

    #[test]
    fn test_wrap_0_2pi() {
        assert_eq!(wrap_0_2pi(1.0), 1.0);
        assert!((wrap_0_2pi(-PI / 2.0) - (3.0 * PI / 2.0)).abs() < 1e-15);
        assert!((wrap_0_2pi(3.0 * PI) - PI).abs() < 1e-15);
        assert!(wrap_0_2pi(TWOPI).abs() < 1e-15);
    }

    #[test]
    fn test_wrap_0_2pi_tiny_negative_stays_in_range() {
        let w = wrap_0_2pi(-1e-300);
        assert!((0.0..TWOPI).contains(&w));
    }

    #[test]
    fn test_wrap_0_360() {
        assert_eq!(wrap_0_360(45.0), 45.0);
        assert_eq!(wrap_0_360(360.0), 0.0);
        assert!((wrap_0_360(-90.0) - 270.0).abs() < 1e-12);
        assert!((wrap_0_360(725.0) - 5.0).abs() < 1e-12);
        assert!((0.0..360.0).contains(&wrap_0_360(-1e-300)));
    }

    #[test]
    fn test_vincenty_separation() {
        // equator, 90 degrees apart
        let sep = vincenty_angular_separation(0.0, 1.0, 0.0, 1.0, PI / 2.0);
        assert!((sep - PI / 2.0).abs() < 1e-12);
        // pole to pole
        let sep = vincenty_angular_separation(1.0, 0.0, -1.0, 0.0, 0.0);
        assert!((sep - PI).abs() < 1e-12);
        // same point
        let sep = vincenty_angular_separation(0.5, 0.75_f64.sqrt(), 0.5, 0.75_f64.sqrt(), 0.0);
        assert!(sep.abs() < 1e-12);
    }

    #[test]
    fn test_isqrt() {
        for x in 0..2000u64 {
            let r = isqrt(x);
            assert!(r * r <= x && (r + 1) * (r + 1) > x, "isqrt({x}) = {r}");
        }
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
        let big = (1u64 << 31) * (1u64 << 31);
        assert_eq!(isqrt(big), 1 << 31);
        assert_eq!(isqrt(big - 1), (1 << 31) - 1);
    }
}
