//! Binary float → shortest round-tripping decimal text (C5).
//!
//! Mirrors the original `realToString<T>`: estimate the decimal exponent
//! from the binary exponent via `frexp`, decide fixed vs. scientific
//! layout, then generate digits one at a time by incremental addition
//! against a target, stopping as soon as the digits generated so far
//! round-trip back to the input under the same single-rounding rule the
//! parser uses.

use crate::real::power_of_ten;

use super::traits::{frexp, Accumulator, FloatFormat};

const NEGATIVE_E_NOTATION_START: i32 = -6;
const POSITIVE_E_NOTATION_START: i32 = 10;

/// Hard cap on generated significant digits, far beyond what any binary32
/// or binary64 value needs (17 and 9 respectively) — a safety net against
/// a pathological accumulator that never reconstructs exactly.
const MAX_DIGITS: usize = 32;

const LOG10_2: f64 = 0.30102999566398119521;

/// Formats `value` as the shortest decimal string that parses back to
/// `value` bit-for-bit (spec §4.5). Always succeeds: every output is one
/// of `nan`, `inf`/`-inf`, `0.0`/`-0.0`, or a finite decimal.
pub fn format<F: FloatFormat>(value: F) -> String {
    if F::is_nan(value) {
        return "nan".to_string();
    }

    let negative = F::is_sign_negative(value) && !is_zero(value);
    // ±0 is rendered without a sign per spec §4.5 step 1; the parser is
    // what preserves the sign bit of zero, not the formatter.
    if is_zero(value) {
        return "0.0".to_string();
    }

    let abs_value = if F::is_sign_negative(value) { F::neg(value) } else { value };
    if abs_value.to_f64() >= F::infinity().to_f64() {
        return if F::is_sign_negative(value) {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let a = abs_value.to_f64();
    let (_, base2_exponent) = frexp(a);
    let mut exponent = (((LOG10_2 * (base2_exponent - 1) as f64).ceil() as i32) - 1).max(F::MIN_EXP10);

    if exponent < F::MAX_EXP10 {
        let next = power_of_ten(exponent + 1);
        let magnitude_next = F::from_f64_round(next.normal.to_f64() * next.scale);
        if abs_value >= magnitude_next {
            exponent += 1;
        }
    }

    let e_notation = exponent < NEGATIVE_E_NOTATION_START || exponent >= POSITIVE_E_NOTATION_START;

    let entry = power_of_ten(exponent);
    let factor = entry.scale;
    let mut magnitude = F::Accumulator::from_table_normal(entry.normal);
    let normalized = F::Accumulator::from_f64_value(a / factor);
    let mut accumulator = F::Accumulator::ZERO;

    let mut digits = Vec::with_capacity(MAX_DIGITS);
    loop {
        let mut next = accumulator.add(magnitude);
        let mut digit = 0u8;
        while next.less_than(normalized) && digit < 9 {
            accumulator = next;
            next = next.add(magnitude);
            digit += 1;
        }

        let mut reconstructed = F::from_f64_round(accumulator.assemble(factor));
        if reconstructed != abs_value {
            reconstructed = F::from_f64_round(accumulator.add(magnitude).assemble(factor));
        }

        let done = reconstructed == abs_value;
        if done && accumulator.add_half(magnitude).less_than(normalized) && abs_value != F::max_value() {
            digit += 1;
        }

        digits.push(b'0' + digit);
        magnitude = magnitude.div_ten();

        if done || digits.len() >= MAX_DIGITS {
            break;
        }
    }

    layout(exponent, e_notation, &digits, negative)
}

fn is_zero<F: FloatFormat>(value: F) -> bool {
    value.to_f64() == 0.0
}

fn layout(exponent: i32, e_notation: bool, digits: &[u8], negative: bool) -> String {
    let mut s = String::with_capacity(digits.len() + 8);
    if negative {
        s.push('-');
    }

    if e_notation {
        s.push(digits[0] as char);
        s.push('.');
        if digits.len() > 1 {
            s.extend(digits[1..].iter().map(|&d| d as char));
        } else {
            s.push('0');
        }
        s.push('e');
        s.push(if exponent < 0 { '-' } else { '+' });
        s.push_str(&exponent.abs().to_string());
    } else if exponent >= 0 {
        let int_digits = (exponent + 1) as usize;
        for i in 0..int_digits {
            s.push(*digits.get(i).unwrap_or(&b'0') as char);
        }
        s.push('.');
        if digits.len() > int_digits {
            s.extend(digits[int_digits..].iter().map(|&d| d as char));
        } else {
            s.push('0');
        }
    } else {
        s.push('0');
        s.push('.');
        for _ in 0..(-exponent - 1) {
            s.push('0');
        }
        s.extend(digits.iter().map(|&d| d as char));
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_nan_inf_zero() {
        assert_eq!(format::<f64>(f64::NAN), "nan");
        assert_eq!(format::<f64>(f64::INFINITY), "inf");
        assert_eq!(format::<f64>(f64::NEG_INFINITY), "-inf");
        assert_eq!(format::<f64>(0.0), "0.0");
        assert_eq!(format::<f64>(-0.0), "0.0");
    }

    #[test]
    fn formats_simple_values() {
        assert_eq!(format::<f64>(1.0), "1.0");
        assert_eq!(format::<f64>(100.0), "100.0");
        assert_eq!(format::<f64>(0.5), "0.5");
        assert_eq!(format::<f64>(-123.25), "-123.25");
    }

    #[test]
    fn uses_scientific_layout_at_boundaries() {
        assert!(format::<f64>(1e10).starts_with("1.0e+10"));
        assert!(format::<f64>(1e-7).starts_with("1.0e-7"));
        assert!(!format::<f64>(1e9).contains('e'));
        assert!(!format::<f64>(1e-6).contains('e'));
    }

    #[test]
    fn smallest_subnormal_formats_as_5e_324() {
        let x = f64::from_bits(1);
        assert_eq!(format(x), "5.0e-324");
    }

    #[test]
    fn smallest_normal_formats_correctly() {
        let x = f64::from_bits(0x0010000000000000);
        assert_eq!(format(x), "2.2250738585072014e-308");
    }

    #[test]
    fn largest_finite_formats_correctly() {
        let x = f64::from_bits(0x7FEFFFFFFFFFFFFF);
        assert_eq!(format(x), "1.7976931348623157e+308");
    }

    #[test]
    fn f32_smallest_subnormal_formats_as_1e_45() {
        let x = f32::from_bits(1);
        assert_eq!(format(x), "1.0e-45");
    }

    #[test]
    fn round_trips_through_parse() {
        use super::super::parse::parse;
        for bits in [0x1u64, 0x10, 0x3ff0000000000000, 0x4059000000000000, 0x7fefffffffffffff] {
            let x = f64::from_bits(bits);
            let s = format(x);
            let (v, _): (f64, usize) = parse(s.as_bytes()).unwrap();
            assert_eq!(v.to_bits(), x.to_bits(), "round-trip failed for {s}");
        }
    }
}
