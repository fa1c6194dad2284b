//! Slice-in, `Vec`-out forms of the [`HealPix`] transforms.
//!
//! Each element goes through the scalar transform independently. With the
//! `parallel` feature the elements are spread over rayon's pool; output order
//! always matches input order. A call either converts every element or
//! returns the first error it meets.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::coords::{ang2eq, eq2ang, validate_phi, validate_theta};
use crate::error::{Error, Result};
use crate::healpix::HealPix;

fn check_lengths(first: &str, a: usize, second: &str, b: usize) -> Result<()> {
    if a != b {
        return Err(Error::invalid_value(format!(
            "{first} has {a} elements but {second} has {b}"
        )));
    }
    Ok(())
}

fn map_pairs<T, F>(a: &[f64], b: &[f64], f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(f64, f64) -> Result<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        a.par_iter().zip(b.par_iter()).map(|(&x, &y)| f(x, y)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()
    }
}

fn map_pixels<F>(pixels: &[u64], f: F) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: Fn(u64) -> Result<(f64, f64)> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let pairs: Vec<(f64, f64)> = pixels.par_iter().map(|&p| f(p)).collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let pairs: Vec<(f64, f64)> = pixels.iter().map(|&p| f(p)).collect::<Result<_>>()?;

    Ok(pairs.into_iter().unzip())
}

impl HealPix {
    /// Pixels containing each (theta[i], phi[i]).
    ///
    /// # Errors
    /// [`Error::InvalidValue`] if the slices differ in length, otherwise the
    /// first [`Error::Domain`] raised by an element.
    pub fn ang2pix_many(&self, theta: &[f64], phi: &[f64]) -> Result<Vec<u64>> {
        check_lengths("theta", theta.len(), "phi", phi.len())?;
        map_pairs(theta, phi, |t, p| {
            Ok(self.ang2pix_unchecked(validate_theta(t)?, validate_phi(p)?))
        })
    }

    /// Pixels containing each (ra[i], dec[i]), in degrees.
    pub fn eq2pix_many(&self, ra: &[f64], dec: &[f64]) -> Result<Vec<u64>> {
        check_lengths("ra", ra.len(), "dec", dec.len())?;
        map_pairs(ra, dec, |r, d| {
            let (theta, phi) = eq2ang(r, d)?;
            Ok(self.ang2pix_unchecked(theta, phi))
        })
    }

    /// Centers of `pixels` as parallel `(theta, phi)` vectors.
    pub fn pix2ang_many(&self, pixels: &[u64]) -> Result<(Vec<f64>, Vec<f64>)> {
        map_pixels(pixels, |p| Ok(self.pix2ang_unchecked(self.check_pixel(p)?)))
    }

    /// Centers of `pixels` as parallel `(ra, dec)` vectors in degrees.
    pub fn pix2eq_many(&self, pixels: &[u64]) -> Result<(Vec<f64>, Vec<f64>)> {
        map_pixels(pixels, |p| {
            let (theta, phi) = self.pix2ang_unchecked(self.check_pixel(p)?);
            Ok(ang2eq(theta, phi))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{HealPix, Scheme};

    #[test]
    fn test_many_matches_scalar() {
        let hp = HealPix::new(Scheme::Nested, 16).unwrap();
        let ra = [0.0, 45.5, 180.0, 359.9, 12.0];
        let dec = [0.0, 30.0, -89.9, 45.0, 90.0];
        let pix = hp.eq2pix_many(&ra, &dec).unwrap();
        assert_eq!(pix.len(), ra.len());
        for i in 0..ra.len() {
            assert_eq!(pix[i], hp.eq2pix(ra[i], dec[i]).unwrap());
        }

        let (r, d) = hp.pix2eq_many(&pix).unwrap();
        for (i, &p) in pix.iter().enumerate() {
            let (r1, d1) = hp.pix2eq(p).unwrap();
            assert_eq!((r[i], d[i]), (r1, d1));
        }
    }

    #[test]
    fn test_many_roundtrip_all_pixels() {
        let hp = HealPix::new(Scheme::Ring, 8).unwrap();
        let pixels: Vec<u64> = (0..hp.npix()).collect();
        let (theta, phi) = hp.pix2ang_many(&pixels).unwrap();
        assert_eq!(hp.ang2pix_many(&theta, &phi).unwrap(), pixels);
    }

    #[test]
    fn test_many_length_mismatch() {
        let hp = HealPix::new(Scheme::Ring, 4).unwrap();
        let err = hp.ang2pix_many(&[0.1, 0.2], &[0.1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("theta has 2 elements"));
    }

    #[test]
    fn test_many_fails_as_a_whole() {
        let hp = HealPix::new(Scheme::Ring, 4).unwrap();
        let err = hp.eq2pix_many(&[10.0, 20.0, 30.0], &[0.0, 95.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        let err = hp.pix2ang_many(&[0, 1, 192]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_many_empty() {
        let hp = HealPix::new(Scheme::Ring, 4).unwrap();
        assert!(hp.ang2pix_many(&[], &[]).unwrap().is_empty());
        let (t, p) = hp.pix2ang_many(&[]).unwrap();
        assert!(t.is_empty() && p.is_empty());
    }
}
