//! Extended-precision arithmetic underlying the decimal/binary conversion
//! core: the [`ExtendedReal`] ("double-double") primitive, the power-of-ten
//! table built on top of it, and the scoped floating-point environment both
//! depend on.

pub mod extended;
pub mod fenv;
pub mod powers;

pub use extended::ExtendedReal;
pub use fenv::{FpEnvBatchGuard, FpEnvScope};
pub use powers::{entry as power_of_ten, PowerOfTenEntry, MAX_EXP10, MIN_EXP10};
