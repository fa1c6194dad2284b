//! Disc and strip queries.
//!
//! Both queries work in RING order, one ring at a time, and translate the
//! result to nested indices afterwards when needed. Within the result pixels
//! are ordered by ring (north to south) and then by in-ring offset; in the
//! ring scheme that is plain ascending order.

use crate::constants::{DEG_TO_RAD, PI};
use crate::coords::{validate_theta, Position};
use crate::error::{Error, Result};
use crate::healpix::HealPix;
use crate::ring::{phi_span, push_span, ring2z, ring_above, ring_info};
use crate::scheme::Scheme;

fn validate_radius(radius: f64) -> Result<f64> {
    if !radius.is_finite() {
        return Err(Error::domain("radius", radius, "not finite"));
    }
    if radius < 0.0 {
        return Err(Error::domain("radius", radius, "must not be negative"));
    }
    Ok(radius)
}

impl HealPix {
    /// Pixels whose centers lie within `radius` radians of `center`.
    ///
    /// With `inclusive` the radius is first widened by
    /// [`max_pixrad`](HealPix::max_pixrad), which returns every pixel whose
    /// area touches the disc, plus some that only come close.
    ///
    /// A radius of zero returns the single pixel containing `center`. A
    /// (padded) radius of pi or more returns every pixel in index order.
    ///
    /// # Errors
    /// [`Error::Domain`] for a negative or non-finite radius or an invalid
    /// center.
    pub fn query_disc(&self, center: Position, radius: f64, inclusive: bool) -> Result<Vec<u64>> {
        let (theta0, phi0) = center.to_ang()?;
        let radius = validate_radius(radius)?;

        if radius == 0.0 {
            return Ok(vec![self.ang2pix_unchecked(theta0, phi0)]);
        }

        let radius = if inclusive {
            radius + self.max_pixrad()
        } else {
            radius
        };
        if radius >= PI {
            return Ok((0..self.npix()).collect());
        }

        let mut pixels = disc_ring_pixels(self.nside(), theta0, phi0, radius);
        self.ring_to_own_scheme(&mut pixels);

        tracing::trace!(
            nside = self.nside(),
            theta0,
            phi0,
            radius,
            inclusive,
            count = pixels.len(),
            "disc query"
        );
        Ok(pixels)
    }

    /// [`query_disc`](HealPix::query_disc) with the center as (ra, dec) and
    /// the radius in degrees.
    pub fn query_disc_eq(
        &self,
        ra: f64,
        dec: f64,
        radius_deg: f64,
        inclusive: bool,
    ) -> Result<Vec<u64>> {
        let radius = validate_radius(radius_deg)?;
        self.query_disc(Position::Eq { ra, dec }, radius * DEG_TO_RAD, inclusive)
    }

    /// Pixels whose center colatitude lies in the closed band
    /// `[theta1, theta2]`.
    ///
    /// When `theta1 > theta2` the strip wraps over both poles: the result is
    /// the pixels in `[0, theta2]` followed by those in `[theta1, pi]`.
    pub fn query_strip(&self, theta1: f64, theta2: f64) -> Result<Vec<u64>> {
        let theta1 = validate_theta(theta1)?;
        let theta2 = validate_theta(theta2)?;

        let mut pixels = Vec::new();
        if theta1 <= theta2 {
            self.push_strip(theta1, theta2, &mut pixels);
        } else {
            self.push_strip(0.0, theta2, &mut pixels);
            self.push_strip(theta1, PI, &mut pixels);
        }
        self.ring_to_own_scheme(&mut pixels);
        Ok(pixels)
    }

    /// Appends, in RING order, the rings whose center colatitude lies in
    /// `[theta_north, theta_south]`.
    fn push_strip(&self, theta_north: f64, theta_south: f64, out: &mut Vec<u64>) {
        let nside = self.nside();
        let nrings = self.nrings();

        // ring_above gives the neighbourhood, the center colatitudes decide
        let mut first = ring_above(nside, libm::cos(theta_north)).clamp(1, nrings);
        while first > 1 && ring_theta(nside, first - 1) >= theta_north {
            first -= 1;
        }
        while first <= nrings && ring_theta(nside, first) < theta_north {
            first += 1;
        }

        let mut last = (ring_above(nside, libm::cos(theta_south)) + 1).min(nrings);
        while last < nrings && ring_theta(nside, last + 1) <= theta_south {
            last += 1;
        }
        while last >= 1 && ring_theta(nside, last) > theta_south {
            last -= 1;
        }

        if first > last {
            return;
        }
        let start = ring_info(nside, first).start;
        let end = ring_info(nside, last);
        out.extend(start..end.start + end.len);
    }

    fn ring_to_own_scheme(&self, pixels: &mut [u64]) {
        if self.scheme() == Scheme::Nested {
            for pix in pixels.iter_mut() {
                *pix = self.from_ring_unchecked(*pix);
            }
        }
    }
}

/// Colatitude of the pixel centers on `ring`.
fn ring_theta(nside: u64, ring: u64) -> f64 {
    crate::ring::pix2ang(nside, ring_info(nside, ring).start).0
}

/// RING pixels whose centers are within `radius` of (theta0, phi0), for
/// `0 < radius < pi`.
pub(crate) fn disc_ring_pixels(nside: u64, theta0: f64, phi0: f64, radius: f64) -> Vec<u64> {
    let nrings = 4 * nside - 1;
    let npix = 12 * nside * nside;
    let mut out = Vec::new();

    let cos_r = libm::cos(radius);
    let z0 = libm::cos(theta0);
    // only a center exactly on a pole skips the ring walk; cos(theta0)
    // rounds to 1 well before theta0 reaches 0
    let sin0 = if theta0 == 0.0 || theta0 == PI {
        0.0
    } else {
        libm::sin(theta0)
    };

    let rlat1 = theta0 - radius;
    let first = ring_above(nside, libm::cos(rlat1)) + 1;
    if rlat1 <= 0.0 && first > 1 {
        // every ring north of `first` lies wholly inside the disc
        let info = ring_info(nside, first - 1);
        out.extend(0..info.start + info.len);
    }

    let rlat2 = theta0 + radius;
    let last = ring_above(nside, libm::cos(rlat2));

    // a disc centered on a pole is made of the cap blocks alone
    if sin0 > 0.0 {
        let xa = 1.0 / sin0;
        for ring in first..=last {
            let info = ring_info(nside, ring);
            let z = ring2z(nside, ring);
            let x = (cos_r - z * z0) * xa;
            let ysq = 1.0 - z * z - x * x;
            if ysq <= 0.0 {
                // the ring is either wholly inside or wholly outside
                if x < 0.0 {
                    out.extend(info.start..info.start + info.len);
                }
                continue;
            }
            let dphi = libm::atan2(libm::sqrt(ysq), x);
            let (lo, hi) = phi_span(&info, phi0 - dphi, phi0 + dphi);
            if hi - lo + 1 >= info.len as i64 {
                out.extend(info.start..info.start + info.len);
            } else {
                push_span(&info, lo, hi, &mut out);
            }
        }
    }

    if rlat2 >= PI && last < nrings {
        let info = ring_info(nside, last + 1);
        out.extend(info.start..npix);
    }
    out
}
