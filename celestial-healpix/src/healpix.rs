//! The [`HealPix`] resolution: a validated (scheme, nside) pair.
//!
//! `HealPix` is a small `Copy` value with no interior state. Every transform
//! validates its input, then dispatches on the scheme tag to the pure
//! functions in [`crate::ring`] and [`crate::nest`].
//!
//! # Example
//!
//! ```
//! use celestial_healpix::{HealPix, Scheme};
//!
//! let hp = HealPix::new(Scheme::Ring, 4096).unwrap();
//! assert_eq!(hp.npix(), 201_326_592);
//! assert!((hp.area() - 6.24178e-8).abs() < 1e-12);
//!
//! let pix = hp.eq2pix(83.633, -5.375).unwrap();
//! let (ra, dec) = hp.pix2eq(pix).unwrap();
//! assert!((ra - 83.633).abs() < 0.02 && (dec + 5.375).abs() < 0.02);
//! ```

use std::fmt;

use crate::constants::{FOUR_PI, MAX_NSIDE, MAX_ORDER, NFACES, PI, RAD_TO_DEG};
use crate::coords::{ang2eq, angular_distance, eq2ang, validate_phi, validate_theta};
use crate::error::{Error, Result};
use crate::scheme::Scheme;
use crate::{nest, ring};

/// Whether `nside` is a supported resolution: a power of two in
/// `1..=2^29`.
pub fn nside_is_ok(nside: u64) -> bool {
    nside > 0 && nside <= MAX_NSIDE && nside.is_power_of_two()
}

/// Whether `npix` is the pixel count of a supported resolution.
pub fn npix_is_ok(npix: u64) -> bool {
    npix2nside(npix).is_ok()
}

pub fn nside2npix(nside: u64) -> Result<u64> {
    check_nside(nside)?;
    Ok(NFACES * nside * nside)
}

/// Resolution whose pixel count is `npix`.
pub fn npix2nside(npix: u64) -> Result<u64> {
    if npix == 0 || npix % NFACES != 0 {
        return Err(Error::invalid_value(format!(
            "{npix} is not a valid pixel count (must be 12 * nside^2)"
        )));
    }
    let nside = crate::math::isqrt(npix / NFACES);
    if nside * nside * NFACES != npix || !nside_is_ok(nside) {
        return Err(Error::invalid_value(format!(
            "{npix} is not a valid pixel count (must be 12 * nside^2)"
        )));
    }
    Ok(nside)
}

/// log2(nside).
pub fn nside2order(nside: u64) -> Result<u32> {
    check_nside(nside)?;
    Ok(nside.trailing_zeros())
}

fn check_nside(nside: u64) -> Result<()> {
    if nside == 0 {
        return Err(Error::invalid_nside(nside, "must be positive"));
    }
    if !nside.is_power_of_two() {
        return Err(Error::invalid_nside(nside, "must be a power of two"));
    }
    if nside > MAX_NSIDE {
        return Err(Error::invalid_nside(nside, "exceeds the maximum of 2^29"));
    }
    Ok(())
}

/// A HEALPix resolution under one ordering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HealPix {
    scheme: Scheme,
    nside: u64,
    order: u32,
}

impl HealPix {
    /// # Errors
    /// [`Error::InvalidNside`] when `nside` is zero, not a power of two, or
    /// above 2^29.
    pub fn new(scheme: Scheme, nside: u64) -> Result<Self> {
        check_nside(nside)?;
        Ok(Self {
            scheme,
            nside,
            order: nside.trailing_zeros(),
        })
    }

    /// Like [`HealPix::new`], with the scheme given by name (`"ring"`,
    /// `"nest"`, `"nested"`, any case).
    pub fn from_name(scheme: &str, nside: u64) -> Result<Self> {
        Self::new(scheme.parse()?, nside)
    }

    /// Resolution of the order `order` (nside = 2^order).
    pub fn from_order(scheme: Scheme, order: u32) -> Result<Self> {
        match 1u64.checked_shl(order) {
            Some(nside) if order <= MAX_ORDER => Self::new(scheme, nside),
            _ => Err(Error::invalid_nside(
                0,
                &format!("order {order} exceeds the maximum of {MAX_ORDER}"),
            )),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }

    pub fn nside(&self) -> u64 {
        self.nside
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn npix(&self) -> u64 {
        NFACES * self.nside * self.nside
    }

    /// Pixels in one polar cap (the north cap and the south cap are the same size).
    pub fn ncap(&self) -> u64 {
        2 * self.nside * (self.nside - 1)
    }

    /// Pixels in the equatorial belt, rings `nside..=3*nside`.
    pub fn nequatorial(&self) -> u64 {
        self.npix() - 2 * self.ncap()
    }

    /// Number of rings, `4*nside - 1`.
    pub fn nrings(&self) -> u64 {
        4 * self.nside - 1
    }

    /// Area of one pixel in steradians.
    pub fn area(&self) -> f64 {
        FOUR_PI / self.npix() as f64
    }

    /// Area of one pixel in square degrees.
    pub fn area_deg2(&self) -> f64 {
        self.area() * RAD_TO_DEG * RAD_TO_DEG
    }

    /// Maximum angular distance (radians) between any pixel center and any
    /// of its corners.
    pub fn max_pixrad(&self) -> f64 {
        let nsf = self.nside as f64;
        let theta_a = libm::acos(2.0 / 3.0);
        let phi_a = PI / (4.0 * nsf);
        let t1 = (1.0 - 1.0 / nsf) * (1.0 - 1.0 / nsf);
        let theta_b = libm::acos(1.0 - t1 / 3.0);
        angular_distance(theta_a, phi_a, theta_b, 0.0)
    }

    /// Same resolution under another ordering.
    pub fn with_scheme(&self, scheme: Scheme) -> Self {
        Self { scheme, ..*self }
    }

    #[inline]
    pub(crate) fn check_pixel(&self, pix: u64) -> Result<u64> {
        let npix = self.npix();
        if pix >= npix {
            return Err(Error::PixelOutOfRange { pixel: pix, npix });
        }
        Ok(pix)
    }

    /// Pixel containing (theta, phi) radians.
    ///
    /// # Errors
    /// [`Error::Domain`] if theta is outside [0, pi] or either value is not
    /// finite.
    pub fn ang2pix(&self, theta: f64, phi: f64) -> Result<u64> {
        let theta = validate_theta(theta)?;
        let phi = validate_phi(phi)?;
        Ok(self.ang2pix_unchecked(theta, phi))
    }

    /// Pixel containing (ra, dec) degrees.
    ///
    /// # Errors
    /// [`Error::Domain`] if dec is outside [-90, 90] or either value is not
    /// finite.
    pub fn eq2pix(&self, ra: f64, dec: f64) -> Result<u64> {
        let (theta, phi) = eq2ang(ra, dec)?;
        Ok(self.ang2pix_unchecked(theta, phi))
    }

    #[inline]
    pub(crate) fn ang2pix_unchecked(&self, theta: f64, phi: f64) -> u64 {
        match self.scheme {
            Scheme::Ring => ring::ang2pix(self.nside, theta, phi),
            Scheme::Nested => nest::ang2pix(self.order, theta, phi),
        }
    }

    /// Center of a pixel as (theta, phi) radians.
    ///
    /// # Errors
    /// [`Error::PixelOutOfRange`] if `pix >= npix`.
    pub fn pix2ang(&self, pix: u64) -> Result<(f64, f64)> {
        let pix = self.check_pixel(pix)?;
        Ok(self.pix2ang_unchecked(pix))
    }

    /// Center of a pixel as (ra, dec) degrees.
    pub fn pix2eq(&self, pix: u64) -> Result<(f64, f64)> {
        let (theta, phi) = self.pix2ang(pix)?;
        Ok(ang2eq(theta, phi))
    }

    #[inline]
    pub(crate) fn pix2ang_unchecked(&self, pix: u64) -> (f64, f64) {
        match self.scheme {
            Scheme::Ring => ring::pix2ang(self.nside, pix),
            Scheme::Nested => nest::pix2ang(self.order, pix),
        }
    }

    /// Converts a RING index to the NESTED index of the same pixel.
    pub fn ring2nest(&self, pix: u64) -> Result<u64> {
        let pix = self.check_pixel(pix)?;
        Ok(nest::ring2nest(self.order, pix))
    }

    /// Converts a NESTED index to the RING index of the same pixel.
    pub fn nest2ring(&self, pix: u64) -> Result<u64> {
        let pix = self.check_pixel(pix)?;
        Ok(nest::nest2ring(self.order, pix))
    }

    /// Converts an index in this resolution's scheme into `target`'s.
    pub fn to_scheme(&self, pix: u64, target: Scheme) -> Result<u64> {
        let pix = self.check_pixel(pix)?;
        Ok(self.convert_unchecked(pix, target))
    }

    #[inline]
    pub(crate) fn convert_unchecked(&self, pix: u64, target: Scheme) -> u64 {
        match (self.scheme, target) {
            (Scheme::Ring, Scheme::Nested) => nest::ring2nest(self.order, pix),
            (Scheme::Nested, Scheme::Ring) => nest::nest2ring(self.order, pix),
            _ => pix,
        }
    }

    /// RING index of a pixel given in this resolution's scheme.
    #[inline]
    pub(crate) fn to_ring_unchecked(&self, pix: u64) -> u64 {
        self.convert_unchecked(pix, Scheme::Ring)
    }

    /// Index in this resolution's scheme of a RING index.
    #[inline]
    pub(crate) fn from_ring_unchecked(&self, ring_pix: u64) -> u64 {
        match self.scheme {
            Scheme::Ring => ring_pix,
            Scheme::Nested => nest::ring2nest(self.order, ring_pix),
        }
    }

    /// Ring number (1 at the north pole, `4*nside - 1` at the south pole)
    /// of a pixel.
    pub fn pix2ring(&self, pix: u64) -> Result<u64> {
        let pix = self.check_pixel(pix)?;
        Ok(ring::pix2ring(self.nside, self.to_ring_unchecked(pix)))
    }

    /// Southernmost ring lying strictly north of z = cos(theta); 0 if none.
    pub fn ring_above(&self, z: f64) -> u64 {
        ring::ring_above(self.nside, z)
    }

    /// z = cos(theta) of the centers of ring `ring`.
    pub fn ring2z(&self, ring: u64) -> Result<f64> {
        if ring == 0 || ring > self.nrings() {
            return Err(Error::invalid_value(format!(
                "ring {ring} out of range [1, {}]",
                self.nrings()
            )));
        }
        Ok(ring::ring2z(self.nside, ring))
    }
}

impl fmt::Display for HealPix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scheme:      {}", self.scheme.code())?;
        writeln!(f, "scheme_name: {}", self.scheme.ordering_keyword())?;
        writeln!(f, "nside:       {}", self.nside)?;
        writeln!(f, "npix:        {}", self.npix())?;
        writeln!(f, "ncap:        {}", self.ncap())?;
        write!(f, "area:        {:e} square radians", self.area())
    }
}
