#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const FOUR_PI: f64 = 12.56637061435917295385057;

/// 2/pi: maps a longitude in [0, 2pi) onto the [0, 4) face-column coordinate.
#[allow(clippy::excessive_precision)]
pub const INV_HALF_PI: f64 = 0.6366197723675813430755351;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// |cos(theta)| at the boundary between the equatorial belt and the polar caps.
pub const TRANSITION_Z: f64 = 2.0 / 3.0;

/// Largest supported order. Indices at order 29 still fit in 64 bits.
pub const MAX_ORDER: u32 = 29;

pub const MAX_NSIDE: u64 = 1 << MAX_ORDER;

/// Below this colatitude distance from a pole, cap formulas use sin(theta)
/// instead of 1 - cos(theta).
pub const POLE_GUARD: f64 = 0.01;

/// Number of base faces.
pub const NFACES: u64 = 12;
