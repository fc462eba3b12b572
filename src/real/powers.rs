//! Pre-computed table of powers of ten, used by both the parser and the
//! formatter to avoid repeated, imprecise `powi`/`powf` calls.
//!
//! Each entry represents `10^e` as a normalized [`ExtendedReal`] (`normal`)
//! together with a `scale` such that `10^e == f64::from(normal) * scale`.
//! Normalizing keeps `normal.high` inside `[W, 16*W)` so that multiplying it
//! by a digit up to 9 (or the radix 10 itself) never overflows `f64`'s
//! 53-bit integer range. Entries near the subnormal boundary are left
//! under-normalized on purpose — see [`build`] — which is exactly what lets
//! the single-rounding assembly in [`crate::convert::parse`] and
//! [`crate::convert::format`] produce correctly-rounded subnormals.

use std::sync::OnceLock;

use super::extended::ExtendedReal;
use super::fenv::FpEnvScope;

/// Smallest supported decimal exponent (binary64 subnormal floor).
pub const MIN_EXP10: i32 = -324;
/// Largest supported decimal exponent (binary64 overflow boundary).
pub const MAX_EXP10: i32 = 308;

const TABLE_LEN: usize = (MAX_EXP10 - MIN_EXP10 + 1) as usize;

/// One entry of the power-of-ten table: `10^e == normal.to_f64() * scale`.
#[derive(Clone, Copy, Debug)]
pub struct PowerOfTenEntry {
    pub normal: ExtendedReal,
    pub scale: f64,
}

/// Width to which `normal.high` is normalized: `2^(53-4) = 2^49`, leaving
/// four bits of headroom so a multiply by a digit in `0..=9` (or the
/// implicit radix-10 step) cannot overflow the 53-bit mantissa.
const WIDTH: f64 = 4_503_599_627_370_496.0 / 16.0; // 2^49

fn build() -> Vec<PowerOfTenEntry> {
    let _fenv = FpEnvScope::new();
    let mut normals = vec![ExtendedReal::ZERO; TABLE_LEN];
    let mut scales = vec![0.0f64; TABLE_LEN];

    let mut normal = ExtendedReal::new(WIDTH, 0.0);
    let mut scale = 1.0 / WIDTH;
    for e in 0..=MAX_EXP10 {
        if normal.high >= WIDTH {
            scale *= 16.0;
            normal = normal.div_small(16);
        }
        debug_assert!(scale.is_finite());
        let idx = (e - MIN_EXP10) as usize;
        normals[idx] = normal;
        scales[idx] = scale;
        normal = normal.mul_small(10);
    }

    normal = ExtendedReal::new(WIDTH, 0.0);
    scale = 1.0 / WIDTH;
    for e in (MIN_EXP10..0).rev() {
        // Stop normalizing once scaling down further would underflow to
        // zero: that is precisely the range where denormal powers of ten
        // must be left unnormalized to stay exactly representable.
        if normal.high < WIDTH && scale / 16.0 > 0.0 {
            scale /= 16.0;
            normal = normal.mul_small(16);
        }
        normal = normal.div_small(10);
        let idx = (e - MIN_EXP10) as usize;
        normals[idx] = normal;
        scales[idx] = scale;
    }

    normals
        .into_iter()
        .zip(scales)
        .map(|(normal, scale)| PowerOfTenEntry { normal, scale })
        .collect()
}

static TABLE: OnceLock<Vec<PowerOfTenEntry>> = OnceLock::new();

/// Returns the memoized power-of-ten table, building it on first use.
/// Safe to call concurrently from multiple threads: initialization is
/// idempotent and `OnceLock` publishes the result with the needed
/// release/acquire ordering.
pub fn table() -> &'static [PowerOfTenEntry] {
    TABLE.get_or_init(build)
}

/// Looks up the entry for decimal exponent `e`, which must lie in
/// `[MIN_EXP10, MAX_EXP10]`.
#[inline]
pub fn entry(e: i32) -> PowerOfTenEntry {
    debug_assert!((MIN_EXP10..=MAX_EXP10).contains(&e));
    table()[(e - MIN_EXP10) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_expected_length() {
        assert_eq!(table().len(), TABLE_LEN);
    }

    #[test]
    fn entry_zero_is_one() {
        let e = entry(0);
        assert_eq!(e.normal.to_f64() * e.scale, 1.0);
    }

    #[test]
    fn scale_never_reaches_infinity() {
        for e in MIN_EXP10..=MAX_EXP10 {
            assert!(entry(e).scale.is_finite());
        }
    }

    #[test]
    fn spot_check_known_powers() {
        for &e in &[1, 2, 10, -10, -300, 300] {
            let entry = entry(e);
            let reconstructed = entry.normal.to_f64() * entry.scale;
            let expected = 10f64.powi(e);
            if expected.is_normal() {
                let relerr = ((reconstructed - expected) / expected).abs();
                assert!(relerr < 1e-9, "e={e} reconstructed={reconstructed} expected={expected}");
            }
        }
    }
}
