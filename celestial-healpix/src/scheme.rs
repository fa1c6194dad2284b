//! Pixel ordering schemes.
//!
//! Both schemes index the same `12 * nside^2` pixels. [`Scheme::Ring`] counts
//! pixels ring by ring from the north pole, each ring west to east starting
//! at longitude zero. [`Scheme::Nested`] counts pixels face by face, with the
//! pixels of a face laid out along a Z-order curve so that the four children
//! of a pixel at order `k` are consecutive at order `k + 1`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Integer code of the ring scheme, as stored in map headers.
pub const RING: i32 = 1;
/// Integer code of the nested scheme, as stored in map headers.
pub const NEST: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scheme {
    Ring,
    #[cfg_attr(feature = "serde", serde(rename = "nest", alias = "nested"))]
    Nested,
}

impl Scheme {
    /// Looks up a scheme by its integer code ([`RING`] or [`NEST`]).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            RING => Ok(Self::Ring),
            NEST => Ok(Self::Nested),
            other => Err(Error::UnknownScheme(other.to_string())),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Ring => RING,
            Self::Nested => NEST,
        }
    }

    /// Short lowercase name: `"ring"` or `"nest"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Nested => "nest",
        }
    }

    /// The `ORDERING` keyword value used by FITS map headers.
    pub fn ordering_keyword(self) -> &'static str {
        match self {
            Self::Ring => "RING",
            Self::Nested => "NESTED",
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ring" => Ok(Self::Ring),
            "nest" | "nested" => Ok(Self::Nested),
            _ => Err(Error::UnknownScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
