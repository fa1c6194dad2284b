//! HEALPix pixelization of the sphere, disc queries and density sampling.
//!
//! HEALPix divides the sphere into `12 * nside^2` pixels of equal area
//! arranged on rings of constant latitude. This crate converts between sky
//! positions and pixel indices in both the RING and NESTED orderings, finds
//! the pixels inside a disc, and draws random positions that follow a
//! per-pixel density.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`healpix`] | [`HealPix`] resolution: validation, ang/eq ↔ pixel transforms, RING ↔ NESTED conversion |
//! | [`batch`] | Slice forms of the transforms (`ang2pix_many`, ...), rayon-backed with `parallel` |
//! | [`disc`] | [`HealPix::query_disc`], [`HealPix::query_disc_eq`], [`HealPix::query_strip`] |
//! | [`density`] | [`DensityMap`] weighted sampling, [`SampleRegion`], [`SamplerConfig`] |
//! | [`map`] | [`Map`]: per-pixel values handed over by map loaders |
//! | [`coords`] | [`Position`], [`CoordSystem`], (ra, dec) ↔ (theta, phi), distances, uniform sky points |
//! | [`ring`], [`nest`] | Index arithmetic of the two orderings |
//! | [`error`] | [`Error`], [`ErrorKind`], [`Result`] |
//!
//! # Quick Start
//!
//! ```
//! use celestial_healpix::{HealPix, Position, Scheme};
//!
//! let hp = HealPix::new(Scheme::Nested, 64).unwrap();
//! let pix = hp.eq2pix(83.633, -5.375).unwrap();
//!
//! let disc = hp
//!     .query_disc(Position::Eq { ra: 83.633, dec: -5.375 }, 0.05, true)
//!     .unwrap();
//! assert!(disc.contains(&pix));
//! ```
//!
//! # Features
//!
//! - **`parallel`**: runs the slice transforms on rayon's thread pool.
//! - **`serde`**: `Serialize`/`Deserialize` for [`Scheme`], [`CoordSystem`],
//!   [`Map`], [`SampleRegion`] and [`SamplerConfig`].

pub mod batch;
pub mod constants;
pub mod coords;
pub mod density;
pub mod disc;
pub mod error;
pub mod healpix;
pub mod map;
pub mod math;
pub mod nest;
pub mod ring;
pub mod scheme;

pub use coords::{CoordSystem, Position};
pub use density::{DensityMap, SampleRegion, SamplerConfig};
pub use error::{Error, ErrorKind, Result};
pub use healpix::{npix2nside, npix_is_ok, nside2npix, nside2order, nside_is_ok, HealPix};
pub use map::Map;
pub use scheme::{Scheme, NEST, RING};
