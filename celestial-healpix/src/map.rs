//! Per-pixel value arrays.
//!
//! A [`Map`] is the hand-off point between whatever loads map files and the
//! samplers in this crate: a resolution plus one `f64` per pixel. The
//! resolution is inferred from the array length, so a loader only has to
//! supply the ordering scheme alongside the data.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};
use crate::healpix::{npix2nside, HealPix};
use crate::scheme::Scheme;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MapRecord", into = "MapRecord"))]
pub struct Map {
    healpix: HealPix,
    data: Vec<f64>,
}

impl Map {
    /// Wraps `data` as a map in `scheme`, inferring nside from its length.
    ///
    /// # Errors
    /// [`Error::InvalidValue`] if the length is not `12 * nside^2` for a
    /// supported nside.
    pub fn new(scheme: Scheme, data: Vec<f64>) -> Result<Self> {
        let nside = npix2nside(data.len() as u64)?;
        Ok(Self {
            healpix: HealPix::new(scheme, nside)?,
            data,
        })
    }

    /// Wraps `data` as a map at an explicit resolution.
    pub fn with_healpix(healpix: HealPix, data: Vec<f64>) -> Result<Self> {
        if data.len() as u64 != healpix.npix() {
            return Err(Error::invalid_value(format!(
                "map has {} values but nside {} needs {}",
                data.len(),
                healpix.nside(),
                healpix.npix()
            )));
        }
        Ok(Self { healpix, data })
    }

    /// A map with every pixel set to `value`.
    pub fn filled(healpix: HealPix, value: f64) -> Self {
        Self {
            healpix,
            data: vec![value; healpix.npix() as usize],
        }
    }

    pub fn healpix(&self) -> HealPix {
        self.healpix
    }

    pub fn scheme(&self) -> Scheme {
        self.healpix.scheme()
    }

    pub fn nside(&self) -> u64 {
        self.healpix.nside()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value of pixel `pix`, range-checked.
    pub fn get(&self, pix: u64) -> Result<f64> {
        let pix = self.healpix.check_pixel(pix)?;
        Ok(self.data[pix as usize])
    }

    /// Value of the pixel containing (ra, dec) degrees.
    pub fn value_at_eq(&self, ra: f64, dec: f64) -> Result<f64> {
        let pix = self.healpix.eq2pix(ra, dec)?;
        Ok(self.data[pix as usize])
    }

    /// The same map reordered into `scheme`.
    pub fn convert(&self, scheme: Scheme) -> Map {
        if scheme == self.scheme() {
            return self.clone();
        }
        let mut data = vec![0.0; self.data.len()];
        for (pix, &value) in self.data.iter().enumerate() {
            let target = self.healpix.convert_unchecked(pix as u64, scheme);
            data[target as usize] = value;
        }
        Map {
            healpix: self.healpix.with_scheme(scheme),
            data,
        }
    }
}

/// Values printed at each end of the data before eliding the middle.
const DISPLAY_EDGE: usize = 3;

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "healpix map")?;
        writeln!(f)?;
        writeln!(f, "metadata:")?;
        writeln!(f, "{}", self.healpix)?;
        writeln!(f, "map data:")?;

        let n = self.data.len();
        let fmt_values = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        if n <= 2 * DISPLAY_EDGE {
            write!(f, "[{}]", fmt_values(&self.data[..]))
        } else {
            write!(
                f,
                "[{}, ..., {}]",
                fmt_values(&self.data[..DISPLAY_EDGE]),
                fmt_values(&self.data[n - DISPLAY_EDGE..])
            )
        }
    }
}

impl Index<u64> for Map {
    type Output = f64;

    fn index(&self, pix: u64) -> &f64 {
        &self.data[pix as usize]
    }
}

impl IndexMut<u64> for Map {
    fn index_mut(&mut self, pix: u64) -> &mut f64 {
        &mut self.data[pix as usize]
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct MapRecord {
    scheme: Scheme,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<MapRecord> for Map {
    type Error = Error;

    fn try_from(record: MapRecord) -> Result<Self> {
        Map::new(record.scheme, record.data)
    }
}

#[cfg(feature = "serde")]
impl From<Map> for MapRecord {
    fn from(map: Map) -> Self {
        MapRecord {
            scheme: map.scheme(),
            data: map.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_infers_nside() {
        let map = Map::new(Scheme::Ring, vec![1.0; 768]).unwrap();
        assert_eq!(map.nside(), 8);
        assert_eq!(map.len(), 768);
        assert_eq!(
            Map::new(Scheme::Ring, vec![1.0; 100]).unwrap_err().kind(),
            ErrorKind::Value
        );
        assert!(Map::new(Scheme::Ring, Vec::new()).is_err());
    }

    #[test]
    fn test_explicit_healpix_length_check() {
        let hp = HealPix::new(Scheme::Nested, 2).unwrap();
        assert!(Map::with_healpix(hp, vec![0.0; 48]).is_ok());
        let err = Map::with_healpix(hp, vec![0.0; 47]).unwrap_err();
        assert!(err.to_string().contains("needs 48"));
    }

    #[test]
    fn test_convert_keeps_values_on_the_same_sky_position() {
        let hp = HealPix::new(Scheme::Ring, 4).unwrap();
        let data: Vec<f64> = (0..hp.npix()).map(|p| p as f64).collect();
        let ring = Map::with_healpix(hp, data).unwrap();
        let nest = ring.convert(Scheme::Nested);
        assert_eq!(nest.scheme(), Scheme::Nested);
        for &(ra, dec) in &[(0.0, 0.0), (100.0, 45.0), (250.0, -70.0)] {
            assert_eq!(
                ring.value_at_eq(ra, dec).unwrap(),
                nest.value_at_eq(ra, dec).unwrap()
            );
        }
        assert_eq!(nest.convert(Scheme::Ring), ring);
    }

    #[test]
    fn test_display_summarises_resolution_and_data() {
        let hp = HealPix::new(Scheme::Nested, 1).unwrap();
        let data: Vec<f64> = (0..12).map(|p| p as f64 * 0.5).collect();
        let text = Map::with_healpix(hp, data).unwrap().to_string();
        assert!(text.starts_with("healpix map\n\nmetadata:\n"));
        assert!(text.contains(&hp.to_string()));
        assert!(text.contains("scheme_name: NESTED"));
        assert!(text.ends_with("map data:\n[0, 0.5, 1, ..., 4.5, 5, 5.5]"));
    }

    #[test]
    fn test_index_and_get() {
        let hp = HealPix::new(Scheme::Ring, 1).unwrap();
        let mut map = Map::filled(hp, 0.5);
        map[3] = 2.0;
        assert_eq!(map[3], 2.0);
        assert_eq!(map.get(3).unwrap(), 2.0);
        assert_eq!(map.get(12).unwrap_err().kind(), ErrorKind::Range);
    }
}
