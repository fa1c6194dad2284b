//! Random positions drawn from a per-pixel density.
//!
//! A [`DensityMap`] holds one non-negative weight per pixel and the running
//! (prefix) sum of those weights. Drawing a point happens in two stages:
//!
//! 1. **Pick a pixel.** A uniform value in `[0, total)` is located in the
//!    cumulative array by binary search, so each pixel is chosen with
//!    probability proportional to its weight. Zero-weight pixels are never
//!    chosen.
//! 2. **Place the point inside the pixel.** A point is drawn uniformly in
//!    (cos theta, phi) over a box bounding the pixel and kept only if it maps
//!    back to the same pixel. Uniform in (cos theta, phi) is uniform in
//!    area, so points are spread evenly over the pixel.
//!
//! # Restricted regions
//!
//! A [`SampleRegion`] limits the draws to an (ra, dec) rectangle. Rather than
//! sampling the whole sky and throwing most points away, the sampler first
//! collects every pixel that can overlap the rectangle (ring by ring, from the
//! rectangle widened by [`HealPix::max_pixrad`]) and builds a cumulative array
//! over just those pixels. Pixel footprints straddle the rectangle's edges,
//! so points are still checked against the exact bounds
//! `ra_lo <= ra < ra_hi`, `dec_lo <= dec <= dec_hi` and redrawn when they fall
//! outside.
//!
//! Rejection is capped by [`SamplerConfig`]. A region that overlaps only a
//! sliver of weighted area ends with [`Error::RejectionLimit`] instead of
//! looping forever.
//!
//! # Example
//!
//! ```
//! use celestial_healpix::{DensityMap, HealPix, SampleRegion, Scheme};
//! use rand::SeedableRng;
//!
//! let hp = HealPix::new(Scheme::Ring, 8).unwrap();
//! let density = DensityMap::new(hp, vec![1.0; hp.npix() as usize]).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let region = SampleRegion::new(Some((60.0, 95.0)), Some((-62.0, -42.0))).unwrap();
//! let (ra, dec) = density.genrand(&mut rng, 100, Some(&region)).unwrap();
//! assert!(ra.iter().all(|&r| (60.0..95.0).contains(&r)));
//! assert!(dec.iter().all(|&d| (-62.0..=-42.0).contains(&d)));
//! ```

use std::borrow::Cow;

use rand::Rng;

use crate::constants::{DEG_TO_RAD, PI};
use crate::coords::ang2eq;
use crate::error::{Error, Result};
use crate::healpix::HealPix;
use crate::map::Map;
use crate::math::wrap_0_2pi;
use crate::ring::{self, phi_span, push_span, ring2z, ring_above, ring_info};

/// Limits on rejection sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Pixel draws allowed per requested point, summed over the whole call.
    pub max_attempts_per_point: u64,
    /// Tries at placing one point inside the footprint of a chosen pixel.
    pub max_footprint_attempts: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_point: 10_000,
            max_footprint_attempts: 1_000,
        }
    }
}

/// An (ra, dec) rectangle in degrees. `None` leaves that axis unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRegion {
    /// `[lo, hi)` with `0 <= lo < hi <= 360`.
    pub ra: Option<(f64, f64)>,
    /// `[lo, hi]` with `-90 <= lo <= hi <= 90`.
    pub dec: Option<(f64, f64)>,
}

impl SampleRegion {
    pub fn new(ra: Option<(f64, f64)>, dec: Option<(f64, f64)>) -> Result<Self> {
        let region = Self { ra, dec };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((lo, hi)) = self.ra {
            if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo < hi && hi <= 360.0) {
                return Err(Error::invalid_value(format!(
                    "ra range [{lo}, {hi}) must satisfy 0 <= lo < hi <= 360"
                )));
            }
        }
        if let Some((lo, hi)) = self.dec {
            if !(lo.is_finite() && hi.is_finite() && -90.0 <= lo && lo <= hi && hi <= 90.0) {
                return Err(Error::invalid_value(format!(
                    "dec range [{lo}, {hi}] must satisfy -90 <= lo <= hi <= 90"
                )));
            }
        }
        Ok(())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.ra.is_none() && self.dec.is_none()
    }

    /// Whether (ra, dec) degrees lies in the region. ra is expected in
    /// [0, 360).
    #[inline]
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        let ra_ok = self.ra.map_or(true, |(lo, hi)| lo <= ra && ra < hi);
        let dec_ok = self.dec.map_or(true, |(lo, hi)| lo <= dec && dec <= hi);
        ra_ok && dec_ok
    }
}

/// Pixels eligible for one `genrand` call and their cumulative weights.
struct Selector<'a> {
    /// Map-scheme pixel of each cumulative entry; `None` means entry `i` is
    /// pixel `i`.
    pixels: Option<Vec<u64>>,
    cumulative: Cow<'a, [f64]>,
}

impl Selector<'_> {
    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Pixel owning the cumulative position `u`, or `None` when rounding put
    /// `u` at or past the total.
    #[inline]
    fn pick(&self, u: f64) -> Option<u64> {
        let k = self.cumulative.partition_point(|&c| c <= u);
        if k == self.cumulative.len() {
            return None;
        }
        Some(match &self.pixels {
            Some(pixels) => pixels[k],
            None => k as u64,
        })
    }
}

/// A sampling density over the pixels of one resolution.
#[derive(Debug, Clone)]
pub struct DensityMap {
    healpix: HealPix,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    config: SamplerConfig,
}

impl DensityMap {
    /// Builds the sampler from one weight per pixel, indexed in `healpix`'s
    /// scheme.
    ///
    /// # Errors
    /// [`Error::InvalidValue`] if `weights` does not have `npix` entries, any
    /// weight is negative or not finite, or the weights sum to zero.
    pub fn new(healpix: HealPix, weights: Vec<f64>) -> Result<Self> {
        let cumulative = build_cumulative(&healpix, &weights)?;
        Ok(Self {
            healpix,
            weights,
            cumulative,
            config: SamplerConfig::default(),
        })
    }

    /// Builds the sampler from a map's values.
    pub fn from_map(map: &Map) -> Result<Self> {
        Self::new(map.healpix(), map.data().to_vec())
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the weights and rebuilds the cumulative array. On error the
    /// previous weights are kept.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        self.cumulative = build_cumulative(&self.healpix, &weights)?;
        self.weights = weights;
        Ok(())
    }

    pub fn healpix(&self) -> HealPix {
        self.healpix
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draws `n` independent positions distributed as the density, returned
    /// as parallel `(ra, dec)` vectors in degrees.
    ///
    /// # Errors
    /// * [`Error::InvalidValue`] if `n == 0` or `region` is malformed.
    /// * [`Error::EmptyRegion`] if no pixel overlapping `region` carries
    ///   weight.
    /// * [`Error::RejectionLimit`] if rejection exceeds the configured caps.
    pub fn genrand<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
        region: Option<&SampleRegion>,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        if n == 0 {
            return Err(Error::invalid_value("number of points must be positive"));
        }
        let region = match region {
            Some(r) => {
                r.validate()?;
                Some(r).filter(|r| !r.is_unrestricted())
            }
            None => None,
        };

        let selector = match region {
            Some(r) => self.region_selector(r)?,
            None => Selector {
                pixels: None,
                cumulative: Cow::Borrowed(self.cumulative.as_slice()),
            },
        };
        let total = selector.total();

        let max_attempts = self.config.max_attempts_per_point.saturating_mul(n as u64);
        let mut attempts: u64 = 0;
        let mut ra = Vec::with_capacity(n);
        let mut dec = Vec::with_capacity(n);

        while ra.len() < n {
            if attempts >= max_attempts {
                tracing::warn!(
                    attempts,
                    accepted = ra.len(),
                    requested = n,
                    "density sampling hit the rejection cap"
                );
                return Err(Error::RejectionLimit {
                    attempts,
                    accepted: ra.len(),
                    requested: n,
                });
            }
            attempts += 1;

            let Some(pix) = selector.pick(rng.gen::<f64>() * total) else {
                continue;
            };
            let ring_pix = self.healpix.to_ring_unchecked(pix);
            let Some((theta, phi)) = self.point_in_pixel(rng, ring_pix) else {
                tracing::warn!(pixel = pix, "could not place a point inside a pixel footprint");
                return Err(Error::RejectionLimit {
                    attempts: self.config.max_footprint_attempts,
                    accepted: ra.len(),
                    requested: n,
                });
            };

            let (r, d) = ang2eq(theta, phi);
            if region.map_or(true, |reg| reg.contains(r, d)) {
                ra.push(r);
                dec.push(d);
            }
        }

        let acceptance = n as f64 / attempts as f64;
        if region.is_some() && acceptance < 0.05 {
            tracing::warn!(
                acceptance,
                attempts,
                "most draws fell outside the sampling region"
            );
        }
        Ok((ra, dec))
    }

    /// Uniform point inside the footprint of RING pixel `ring_pix`, or `None`
    /// after `max_footprint_attempts` misses.
    fn point_in_pixel<R: Rng + ?Sized>(&self, rng: &mut R, ring_pix: u64) -> Option<(f64, f64)> {
        let nside = self.healpix.nside();
        let iring = ring::pix2ring(nside, ring_pix);
        let info = ring_info(nside, iring);
        let (_, phi_center) = ring::pix2ang(nside, ring_pix);

        // corners lie on the neighbouring rings; the widest point is on this one
        let z_top = ring2z(nside, iring - 1);
        let z_bottom = ring2z(nside, iring + 1);
        let half_width = PI / info.len as f64;

        for _ in 0..self.config.max_footprint_attempts {
            let z = z_bottom + (z_top - z_bottom) * rng.gen::<f64>();
            let phi = phi_center + half_width * (2.0 * rng.gen::<f64>() - 1.0);
            let theta = libm::acos(z.clamp(-1.0, 1.0));
            if ring::ang2pix(nside, theta, phi) == ring_pix {
                return Some((theta, wrap_0_2pi(phi)));
            }
        }
        None
    }

    fn region_selector(&self, region: &SampleRegion) -> Result<Selector<'static>> {
        let pixels: Vec<u64> = region_candidates(&self.healpix, region)
            .into_iter()
            .map(|p| self.healpix.from_ring_unchecked(p))
            .collect();

        let mut cumulative = Vec::with_capacity(pixels.len());
        let mut running = 0.0;
        for &pix in &pixels {
            running += self.weights[pix as usize];
            cumulative.push(running);
        }

        tracing::debug!(
            candidates = pixels.len(),
            weight = running,
            "built restricted sampling index"
        );

        if running <= 0.0 {
            return Err(Error::empty_region(format!(
                "no weighted pixel overlaps ra {:?} dec {:?}",
                region.ra, region.dec
            )));
        }
        Ok(Selector {
            pixels: Some(pixels),
            cumulative: Cow::Owned(cumulative),
        })
    }
}

fn build_cumulative(healpix: &HealPix, weights: &[f64]) -> Result<Vec<f64>> {
    if weights.len() as u64 != healpix.npix() {
        return Err(Error::invalid_value(format!(
            "{} weights given for {} pixels",
            weights.len(),
            healpix.npix()
        )));
    }
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut running = 0.0;
    for (pix, &w) in weights.iter().enumerate() {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::invalid_value(format!(
                "weight of pixel {pix} is {w}; weights must be finite and non-negative"
            )));
        }
        running += w;
        cumulative.push(running);
    }
    if running <= 0.0 {
        return Err(Error::invalid_value("total weight is zero"));
    }
    tracing::debug!(
        nside = healpix.nside(),
        npix = weights.len(),
        total = running,
        "built cumulative weight index"
    );
    Ok(cumulative)
}

/// RING pixels whose area can overlap `region`: pixel centers within
/// `max_pixrad` of the rectangle, found ring by ring.
pub(crate) fn region_candidates(healpix: &HealPix, region: &SampleRegion) -> Vec<u64> {
    let nside = healpix.nside();
    let pad = healpix.max_pixrad();
    let sin_pad = libm::sin(pad);

    let (dec_lo, dec_hi) = region.dec.unwrap_or((-90.0, 90.0));
    let theta_north = ((90.0 - dec_hi) * DEG_TO_RAD - pad).max(0.0);
    let theta_south = ((90.0 - dec_lo) * DEG_TO_RAD + pad).min(PI);

    let first = ring_above(nside, libm::cos(theta_north)) + 1;
    let last = ring_above(nside, libm::cos(theta_south)).min(healpix.nrings());

    let mut out = Vec::new();
    for iring in first..=last {
        let info = ring_info(nside, iring);
        let Some((ra_lo, ra_hi)) = region.ra else {
            out.extend(info.start..info.start + info.len);
            continue;
        };
        let z = ring2z(nside, iring);
        let sin_theta = libm::sqrt((1.0 - z) * (1.0 + z));
        if sin_pad >= sin_theta {
            // ring close enough to a pole that every longitude is in reach
            out.extend(info.start..info.start + info.len);
            continue;
        }
        let dphi = libm::asin(sin_pad / sin_theta);
        let (lo, hi) = phi_span(&info, ra_lo * DEG_TO_RAD - dphi, ra_hi * DEG_TO_RAD + dphi);
        if hi - lo + 1 >= info.len as i64 {
            out.extend(info.start..info.start + info.len);
        } else {
            push_span(&info, lo, hi, &mut out);
        }
    }
    out
}
