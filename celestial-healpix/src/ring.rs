//! RING-scheme index arithmetic.
//!
//! Rings are numbered `1..=4*nside-1` from the north pole. The first and last
//! `nside - 1` rings form the polar caps, where ring `i` (counted from the
//! nearer pole) holds `4*i` pixels. The `2*nside + 1` rings between them form
//! the equatorial belt, where every ring holds `4*nside` pixels and the first
//! pixel of every other ring is shifted by half a pixel in longitude.
//!
//! All functions here are pure and assume validated input: `theta` in
//! [0, pi], `phi` finite, `pix` in `[0, npix)`, `nside` a supported power of
//! two. Range checks live in [`crate::HealPix`].

use crate::constants::{HALF_PI, INV_HALF_PI, PI, POLE_GUARD, TRANSITION_Z, TWOPI};
use crate::math::{isqrt, wrap_0_2pi};

/// Layout of one ring: its first pixel, pixel count, and whether its first
/// pixel center sits half a pixel east of longitude zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingInfo {
    pub start: u64,
    pub len: u64,
    pub shifted: bool,
}

#[inline]
pub(crate) fn npix_of(nside: i64) -> i64 {
    12 * nside * nside
}

#[inline]
pub(crate) fn ncap_of(nside: i64) -> i64 {
    2 * nside * (nside - 1)
}

/// z = cos(theta), plus sin(theta) when theta is close enough to a pole that
/// `1 - |z|` loses precision.
#[inline]
pub(crate) fn z_and_sin(theta: f64) -> (f64, Option<f64>) {
    let z = libm::cos(theta);
    if theta < POLE_GUARD || theta > PI - POLE_GUARD {
        (z, Some(libm::sin(theta)))
    } else {
        (z, None)
    }
}

/// `nside * sqrt(3 * (1 - |z|))`: the continuous ring coordinate inside a
/// polar cap, counted from the nearer pole.
#[inline]
pub(crate) fn cap_ring_coordinate(nside: f64, za: f64, sth: Option<f64>) -> f64 {
    match sth {
        Some(s) => nside * s / libm::sqrt((1.0 + za) / 3.0),
        None => nside * libm::sqrt(3.0 * (1.0 - za)),
    }
}

/// Colatitude of a pixel center from its ring height, using the
/// `sqrt(tmp * (2 - tmp))` form near the poles.
#[inline]
fn cap_theta(z: f64, tmp: f64) -> f64 {
    if z.abs() > 0.99 {
        libm::atan2(libm::sqrt(tmp * (2.0 - tmp)), z)
    } else {
        libm::acos(z)
    }
}

/// Pixel containing (theta, phi). Boundary points go to the pixel on the
/// increasing side of every floored coordinate.
pub fn ang2pix(nside: u64, theta: f64, phi: f64) -> u64 {
    let (z, sth) = z_and_sin(theta);
    zphi2pix(nside, z, phi, sth)
}

pub(crate) fn zphi2pix(nside: u64, z: f64, phi: f64, sth: Option<f64>) -> u64 {
    let ns = nside as i64;
    let nsf = nside as f64;
    let za = z.abs();
    let tt = wrap_0_2pi(phi) * INV_HALF_PI;

    if za <= TRANSITION_Z {
        let temp1 = nsf * (0.5 + tt);
        let temp2 = nsf * z * 0.75;
        let jp = (temp1 - temp2) as i64;
        let jm = (temp1 + temp2) as i64;

        let ir = ns + 1 + jp - jm;
        let kshift = 1 - (ir & 1);
        let ip = ((jp + jm - ns + kshift + 1) / 2).rem_euclid(4 * ns);

        (ncap_of(ns) + (ir - 1) * 4 * ns + ip) as u64
    } else {
        let tp = tt - libm::floor(tt);
        let tmp = cap_ring_coordinate(nsf, za, sth);

        let jp = (tp * tmp) as i64;
        let jm = ((1.0 - tp) * tmp) as i64;

        let ir = jp + jm + 1;
        let ip = ((tt * ir as f64) as i64).rem_euclid(4 * ir);

        if z > 0.0 {
            (2 * ir * (ir - 1) + ip) as u64
        } else {
            (npix_of(ns) - 2 * ir * (ir + 1) + ip) as u64
        }
    }
}

/// Center (theta, phi) of a pixel.
pub fn pix2ang(nside: u64, pix: u64) -> (f64, f64) {
    let ns = nside as i64;
    let p = pix as i64;
    let npix = npix_of(ns);
    let ncap = ncap_of(ns);
    let fact2 = 4.0 / npix as f64;

    if p < ncap {
        let iring = (1 + isqrt((1 + 2 * p) as u64) as i64) >> 1;
        let iphi = p + 1 - 2 * iring * (iring - 1);
        let tmp = (iring * iring) as f64 * fact2;
        let z = 1.0 - tmp;
        let phi = (iphi as f64 - 0.5) * HALF_PI / iring as f64;
        (cap_theta(z, tmp), phi)
    } else if p < npix - ncap {
        let fact1 = (2 * ns) as f64 * fact2;
        let nl4 = 4 * ns;
        let ip = p - ncap;
        let tmp = ip / nl4;
        let iring = tmp + ns;
        let iphi = ip - nl4 * tmp + 1;
        let fodd = if (iring + ns) & 1 != 0 { 1.0 } else { 0.5 };
        let z = (2 * ns - iring) as f64 * fact1;
        let phi = (iphi as f64 - fodd) * PI * 0.75 * fact1;
        (libm::acos(z), phi)
    } else {
        let ip = npix - p;
        let iring = (1 + isqrt((2 * ip - 1) as u64) as i64) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let tmp = (iring * iring) as f64 * fact2;
        let z = tmp - 1.0;
        let phi = (iphi as f64 - 0.5) * HALF_PI / iring as f64;
        (cap_theta(z, tmp), phi)
    }
}

/// Ring number (1-based, from the north pole) of a pixel.
pub fn pix2ring(nside: u64, pix: u64) -> u64 {
    let ns = nside as i64;
    let p = pix as i64;
    let npix = npix_of(ns);
    let ncap = ncap_of(ns);

    let ring = if p < ncap {
        (1 + isqrt((1 + 2 * p) as u64) as i64) >> 1
    } else if p < npix - ncap {
        (p - ncap) / (4 * ns) + ns
    } else {
        let ip = npix - p;
        4 * ns - ((1 + isqrt((2 * ip - 1) as u64) as i64) >> 1)
    };
    ring as u64
}

/// Number of the southernmost ring whose z is strictly above `z`
/// (0 when `z` lies north of ring 1).
pub fn ring_above(nside: u64, z: f64) -> u64 {
    let nsf = nside as f64;
    let az = z.abs();
    if az <= TRANSITION_Z {
        return (nsf * (2.0 - 1.5 * z)) as u64;
    }
    let iring = (nsf * libm::sqrt(3.0 * (1.0 - az))) as u64;
    if z > 0.0 {
        iring
    } else {
        4 * nside - iring - 1
    }
}

/// z = cos(theta) of ring `ring`. Ring 0 and ring `4*nside` stand for the
/// north and south poles.
pub fn ring2z(nside: u64, ring: u64) -> f64 {
    let ns = nside as i64;
    let r = ring as i64;
    let fact2 = 4.0 / npix_of(ns) as f64;
    if r < ns {
        1.0 - (r * r) as f64 * fact2
    } else if r <= 3 * ns {
        (2 * ns - r) as f64 * (2 * ns) as f64 * fact2
    } else {
        let rs = 4 * ns - r;
        (rs * rs) as f64 * fact2 - 1.0
    }
}

/// First pixel, pixel count and shift flag of ring `ring` (`1..4*nside`).
pub fn ring_info(nside: u64, ring: u64) -> RingInfo {
    let ns = nside as i64;
    let r = ring as i64;
    if r < ns {
        RingInfo {
            start: (2 * r * (r - 1)) as u64,
            len: (4 * r) as u64,
            shifted: true,
        }
    } else if r < 3 * ns {
        RingInfo {
            start: (ncap_of(ns) + (r - ns) * 4 * ns) as u64,
            len: (4 * ns) as u64,
            shifted: (r - ns) & 1 == 0,
        }
    } else {
        let nr = 4 * ns - r;
        RingInfo {
            start: (npix_of(ns) - 2 * nr * (nr + 1)) as u64,
            len: (4 * nr) as u64,
            shifted: true,
        }
    }
}

/// Offsets `lo..=hi` (possibly negative or past the ring length) of the
/// ring pixels whose center longitude lies in `(phi_lo, phi_hi]`.
#[inline]
pub(crate) fn phi_span(info: &RingInfo, phi_lo: f64, phi_hi: f64) -> (i64, i64) {
    let shift = if info.shifted { 0.5 } else { 0.0 };
    let scale = info.len as f64 / TWOPI;
    let lo = libm::floor(scale * phi_lo - shift) as i64 + 1;
    let hi = libm::floor(scale * phi_hi - shift) as i64;
    (lo, hi)
}

/// Appends the ring pixels at offsets `lo..=hi` to `out`, folding offsets
/// that fall outside `[0, len)` back onto the ring. The pixels come out in
/// increasing offset order; `hi - lo + 1` must not exceed the ring length.
pub(crate) fn push_span(info: &RingInfo, lo: i64, hi: i64, out: &mut Vec<u64>) {
    if lo > hi {
        return;
    }
    let len = info.len as i64;
    let (mut lo, mut hi) = (lo, hi);
    if hi >= len {
        lo -= len;
        hi -= len;
    } else if hi < 0 {
        lo += len;
        hi += len;
    }
    if lo < 0 {
        out.extend(info.start..=info.start + hi as u64);
        out.extend(info.start + (lo + len) as u64..info.start + info.len);
    } else {
        out.extend(info.start + lo as u64..=info.start + hi as u64);
    }
}
