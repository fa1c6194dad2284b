//! Error type for pixelization, disc queries and density sampling.
//!
//! Every fallible operation returns [`Result<T>`]. Errors are raised at the
//! point where invalid input is detected; nothing is clamped and no NaN is
//! propagated. Vectorized calls fail as a whole when any element is invalid.
//!
//! | Variant | [`ErrorKind`] |
//! |---------|---------------|
//! | [`InvalidNside`](Error::InvalidNside), [`UnknownScheme`](Error::UnknownScheme), [`UnknownSystem`](Error::UnknownSystem) | `Construction` |
//! | [`Domain`](Error::Domain) | `Domain` |
//! | [`PixelOutOfRange`](Error::PixelOutOfRange) | `Range` |
//! | [`InvalidValue`](Error::InvalidValue) | `Value` |
//! | [`EmptyRegion`](Error::EmptyRegion), [`RejectionLimit`](Error::RejectionLimit) | `EmptyRegion` |

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid scheme, coordinate system or nside.
    Construction,
    /// Angle or radius outside its valid range, or not finite.
    Domain,
    /// Pixel index outside `[0, npix)`.
    Range,
    /// Invalid sample count, array length or weights.
    Value,
    /// A sampling region that holds no usable density.
    EmptyRegion,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid nside {nside}: {reason}")]
    InvalidNside { nside: u64, reason: String },

    #[error("unknown scheme: {0:?} (expected \"ring\" or \"nest\")")]
    UnknownScheme(String),

    #[error("unknown coordinate system: {0:?} (expected \"eq\" or \"ang\")")]
    UnknownSystem(String),

    #[error("{quantity} = {value} out of domain: {reason}")]
    Domain {
        quantity: &'static str,
        value: f64,
        reason: String,
    },

    #[error("pixel {pixel} out of range [0, {npix})")]
    PixelOutOfRange { pixel: u64, npix: u64 },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("empty region: {0}")]
    EmptyRegion(String),

    #[error(
        "rejection limit reached after {attempts} attempts ({accepted} of {requested} points accepted)"
    )]
    RejectionLimit {
        attempts: u64,
        accepted: usize,
        requested: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_nside(nside: u64, reason: &str) -> Self {
        Self::InvalidNside {
            nside,
            reason: reason.to_string(),
        }
    }

    pub fn domain(quantity: &'static str, value: f64, reason: &str) -> Self {
        Self::Domain {
            quantity,
            value,
            reason: reason.to_string(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    pub fn empty_region(message: impl Into<String>) -> Self {
        Self::EmptyRegion(message.into())
    }

    /// Classifies the error into one of the five [`ErrorKind`]s.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNside { .. } | Self::UnknownScheme(_) | Self::UnknownSystem(_) => {
                ErrorKind::Construction
            }
            Self::Domain { .. } => ErrorKind::Domain,
            Self::PixelOutOfRange { .. } => ErrorKind::Range,
            Self::InvalidValue(_) => ErrorKind::Value,
            Self::EmptyRegion(_) | Self::RejectionLimit { .. } => ErrorKind::EmptyRegion,
        }
    }
}
