//! NESTED-scheme index arithmetic and RING/NESTED conversion.
//!
//! A nested index packs a base face number (0..12) above the Z-order
//! interleaving of the pixel's (ix, iy) position inside that face:
//!
//! ```text
//! pix = face << (2 * order) | interleave(ix, iy)
//! ```
//!
//! with `ix` on the even bits and `iy` on the odd bits. Faces 0-3 touch the
//! north pole, 4-7 straddle the equator, 8-11 touch the south pole.
//!
//! Same assumptions as [`crate::ring`]: inputs are validated by the caller.

use crate::constants::{HALF_PI, INV_HALF_PI, TRANSITION_Z};
use crate::math::{isqrt, wrap_0_2pi};
use crate::ring::{cap_ring_coordinate, ncap_of, npix_of, z_and_sin};

/// Ring number of each face's southernmost corner, in units of nside.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude of each face's center, in units of pi/4.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Pixel containing (theta, phi).
pub fn ang2pix(order: u32, theta: f64, phi: f64) -> u64 {
    let nside = 1u64 << order;
    let (z, sth) = z_and_sin(theta);
    let (face, ix, iy) = compute_face_and_position(phi, z, sth, nside, order);
    xyf2nest(order, ix, iy, face)
}

/// Center (theta, phi) of a pixel.
pub fn pix2ang(order: u32, pix: u64) -> (f64, f64) {
    let ns = 1i64 << order;
    let (ix, iy, face) = nest2xyf(order, pix);
    let fact2 = 4.0 / npix_of(ns) as f64;

    let jr = JRLL[face as usize] * ns - ix - iy - 1;

    let (nr, theta, kshift) = if jr < ns {
        let tmp = (jr * jr) as f64 * fact2;
        let z = 1.0 - tmp;
        (jr, polar_theta(z, tmp), 0)
    } else if jr > 3 * ns {
        let nr = 4 * ns - jr;
        let tmp = (nr * nr) as f64 * fact2;
        let z = tmp - 1.0;
        (nr, polar_theta(z, tmp), 0)
    } else {
        let fact1 = (2 * ns) as f64 * fact2;
        let z = (2 * ns - jr) as f64 * fact1;
        (ns, libm::acos(z), (jr - ns) & 1)
    };

    let nl4 = 4 * ns;
    let mut jp = (JPLL[face as usize] * nr + ix - iy + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    }
    if jp < 1 {
        jp += nl4;
    }

    let phi = (jp as f64 - (kshift + 1) as f64 * 0.5) * (HALF_PI / nr as f64);
    (theta, phi)
}

#[inline]
fn polar_theta(z: f64, tmp: f64) -> f64 {
    if z.abs() > 0.99 {
        libm::atan2(libm::sqrt(tmp * (2.0 - tmp)), z)
    } else {
        libm::acos(z)
    }
}

/// Determine which of the 12 base faces contains the point,
/// and compute the (ix, iy) position within that face.
fn compute_face_and_position(
    phi: f64,
    z: f64,
    sth: Option<f64>,
    nside: u64,
    order: u32,
) -> (u64, i64, i64) {
    let tt = wrap_0_2pi(phi) * INV_HALF_PI;
    if z.abs() <= TRANSITION_Z {
        compute_equatorial_face(tt, z, nside, order)
    } else {
        compute_polar_face(tt, z, sth, nside)
    }
}

/// Face and position for the equatorial belt (|z| <= 2/3).
fn compute_equatorial_face(tt: f64, z: f64, nside: u64, order: u32) -> (u64, i64, i64) {
    let nsf = nside as f64;
    let ns = nside as i64;
    let temp1 = nsf * (0.5 + tt);
    let temp2 = nsf * (z * 0.75);
    let jp = (temp1 - temp2) as i64;
    let jm = (temp1 + temp2) as i64;
    let face = face_from_edge_indices(jp >> order, jm >> order);
    let ix = jm & (ns - 1);
    let iy = ns - (jp & (ns - 1)) - 1;
    (face, ix, iy)
}

/// Face number from the face-column indices of the ascending (`ifp`) and
/// descending (`ifm`) edge lines through a point.
#[inline]
fn face_from_edge_indices(ifp: i64, ifm: i64) -> u64 {
    match ifp.cmp(&ifm) {
        std::cmp::Ordering::Equal => (ifp | 4) as u64,
        std::cmp::Ordering::Less => ifp as u64,
        std::cmp::Ordering::Greater => (ifm + 8) as u64,
    }
}

/// Face and position for the polar caps (|z| > 2/3).
fn compute_polar_face(tt: f64, z: f64, sth: Option<f64>, nside: u64) -> (u64, i64, i64) {
    let ns = nside as i64;
    let ntt = (tt as i64).min(3);
    let tp = tt - ntt as f64;
    let tmp = cap_ring_coordinate(nside as f64, z.abs(), sth);
    let jp = ((tp * tmp) as i64).min(ns - 1);
    let jm = (((1.0 - tp) * tmp) as i64).min(ns - 1);
    if z >= 0.0 {
        (ntt as u64, ns - jm - 1, ns - jp - 1)
    } else {
        (ntt as u64 + 8, jp, jm)
    }
}

/// Spread the low 32 bits of `v` onto the even bits of the result.
#[inline]
fn spread_bits(v: u64) -> u64 {
    let mut x = v & 0x0000_0000_FFFF_FFFF;
    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    (x | (x << 1)) & 0x5555_5555_5555_5555
}

/// Inverse of [`spread_bits`]: gather the even bits of `v`.
#[inline]
fn compress_bits(v: u64) -> u64 {
    let mut x = v & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x >> 4)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x >> 8)) & 0x0000_FFFF_0000_FFFF;
    (x | (x >> 16)) & 0x0000_0000_FFFF_FFFF
}

#[inline]
pub(crate) fn xyf2nest(order: u32, ix: i64, iy: i64, face: u64) -> u64 {
    (face << (2 * order)) + spread_bits(ix as u64) + (spread_bits(iy as u64) << 1)
}

#[inline]
pub(crate) fn nest2xyf(order: u32, pix: u64) -> (i64, i64, u64) {
    let npface = 1u64 << (2 * order);
    let face = pix >> (2 * order);
    let p = pix & (npface - 1);
    (compress_bits(p) as i64, compress_bits(p >> 1) as i64, face)
}

/// RING index of the pixel at (ix, iy) on `face`.
fn xyf2ring(order: u32, ix: i64, iy: i64, face: u64) -> u64 {
    let ns = 1i64 << order;
    let nl4 = 4 * ns;
    let jr = JRLL[face as usize] * ns - ix - iy - 1;

    let (nr, n_before, kshift) = if jr < ns {
        (jr, 2 * jr * (jr - 1), 0)
    } else if jr > 3 * ns {
        let nr = nl4 - jr;
        (nr, npix_of(ns) - 2 * (nr + 1) * nr, 0)
    } else {
        (ns, ncap_of(ns) + (jr - ns) * nl4, (jr - ns) & 1)
    };

    let mut jp = (JPLL[face as usize] * nr + ix - iy + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    } else if jp < 1 {
        jp += nl4;
    }
    (n_before + jp - 1) as u64
}

/// (ix, iy, face) of a RING index.
fn ring2xyf(order: u32, pix: u64) -> (i64, i64, u64) {
    let ns = 1i64 << order;
    let nl2 = 2 * ns;
    let p = pix as i64;
    let npix = npix_of(ns);
    let ncap = ncap_of(ns);

    let (iring, iphi, kshift, nr, face) = if p < ncap {
        let iring = (1 + isqrt((1 + 2 * p) as u64) as i64) >> 1;
        let iphi = p + 1 - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, (iphi - 1) / iring)
    } else if p < npix - ncap {
        let ip = p - ncap;
        let tmp = ip >> (order + 2);
        let iring = tmp + ns;
        let iphi = ip - tmp * 4 * ns + 1;
        let kshift = (iring + ns) & 1;
        let ire = tmp + 1;
        let irm = nl2 + 2 - ire;
        let ifm = (iphi - ire / 2 + ns - 1) >> order;
        let ifp = (iphi - irm / 2 + ns - 1) >> order;
        let face = face_from_edge_indices(ifp, ifm) as i64;
        (iring, iphi, kshift, ns, face)
    } else {
        let ip = npix - p;
        let iring = (1 + isqrt((2 * ip - 1) as u64) as i64) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        (2 * nl2 - iring, iphi, 0, iring, 8 + (iphi - 1) / iring)
    };

    let irt = iring - JRLL[face as usize] * ns + 1;
    let mut ipt = 2 * iphi - JPLL[face as usize] * nr - kshift - 1;
    if ipt >= nl2 {
        ipt -= 8 * ns;
    }

    let ix = (ipt - irt) >> 1;
    let iy = (-ipt - irt) >> 1;
    (ix, iy, face as u64)
}

pub fn nest2ring(order: u32, pix: u64) -> u64 {
    let (ix, iy, face) = nest2xyf(order, pix);
    xyf2ring(order, ix, iy, face)
}

pub fn ring2nest(order: u32, pix: u64) -> u64 {
    let (ix, iy, face) = ring2xyf(order, pix);
    xyf2nest(order, ix, iy, face)
}
