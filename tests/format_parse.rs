// Bit-exact round-trip and canonical-layout scenarios from the design's
// testable-properties list.

use numbstrict::convert::{format, parse};

fn roundtrip_f64(bits: u64) {
    let x = f64::from_bits(bits);
    let s = format(x);
    let (v, consumed): (f64, usize) = parse(s.as_bytes()).expect("format() output must reparse");
    assert_eq!(consumed, s.len(), "whole string should be consumed for {s}");
    assert_eq!(v.to_bits(), x.to_bits(), "round-trip failed for bits {bits:#x} -> {s}");
}

fn roundtrip_f32(bits: u32) {
    let x = f32::from_bits(bits);
    let s = format(x);
    let (v, consumed): (f32, usize) = parse(s.as_bytes()).expect("format() output must reparse");
    assert_eq!(consumed, s.len());
    assert_eq!(v.to_bits(), x.to_bits(), "round-trip failed for bits {bits:#x} -> {s}");
}

#[test]
fn concrete_f64_scenarios_match_spec_exactly() {
    assert_eq!(format(f64::from_bits(0x0000000000000001)), "5.0e-324");
    let (v, _): (f64, usize) = parse(b"5.0e-324").unwrap();
    assert_eq!(v.to_bits(), 0x0000000000000001);

    assert_eq!(format(f64::from_bits(0x0010000000000000)), "2.2250738585072014e-308");
    assert_eq!(format(f64::from_bits(0x7FEFFFFFFFFFFFFF)), "1.7976931348623157e+308");

    let (v, _): (f64, usize) = parse(b"1.945478849582046e-308").unwrap();
    assert_eq!(format(v), "1.945478849582046e-308");
}

#[test]
fn concrete_f32_scenarios_match_spec_exactly() {
    assert_eq!(format(f32::from_bits(0x00000001)), "1.0e-45");
    let (v, _): (f32, usize) = parse(b"1.0e-45").unwrap();
    assert_eq!(v.to_bits(), 1);
}

#[test]
fn special_values_format_as_spec_requires() {
    assert_eq!(format(f64::INFINITY), "inf");
    assert_eq!(format(f64::NEG_INFINITY), "-inf");
    assert_eq!(format(f64::NAN), "nan");
    let (v, _): (f64, usize) = parse(b"nan").unwrap();
    assert!(v.is_nan());
}

#[test]
fn negative_zero_is_preserved_by_parse_but_not_by_format() {
    assert_eq!(format(-0.0f64), "0.0");
    let (v, _): (f64, usize) = parse(b"-0.0").unwrap();
    assert!(v.is_sign_negative());
    assert_eq!(v, 0.0);
}

#[test]
fn round_trips_hold_across_many_representative_bit_patterns() {
    for bits in [
        0x0000000000000000u64,
        0x0000000000000001,
        0x000FFFFFFFFFFFFF, // largest subnormal
        0x0010000000000000, // smallest normal
        0x3FF0000000000000, // 1.0
        0x4000000000000000, // 2.0
        0x4059000000000000, // 100.0
        0x3FB999999999999A, // 0.1
        0x7FEFFFFFFFFFFFFF, // largest finite
        0xBFF0000000000000, // -1.0
    ] {
        roundtrip_f64(bits);
    }

    for bits in [0x00000000u32, 0x00000001, 0x007FFFFF, 0x00800000, 0x3F800000, 0x7F7FFFFF] {
        roundtrip_f32(bits);
    }
}

#[test]
fn layout_boundary_is_fixed_point_inclusive_of_e_minus_6_and_e_9() {
    assert_eq!(format(1e-6f64), "0.000001");
    assert_eq!(format(1e-7f64), "1.0e-7");
    assert_eq!(format(1e9f64), "1000000000.0");
    assert_eq!(format(1e10f64), "1.0e+10");
}

#[test]
fn shortest_digit_truncation_never_round_trips() {
    for bits in [0x3FF0000000000001u64, 0x400921FB54442D18, 0x4059000000000000] {
        let x = f64::from_bits(bits);
        let s = format(x);
        // Dropping the last significant digit before the decimal point
        // or exponent must break the round-trip (property 2).
        let digits_only: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits_only.len() > 1 {
            let mut truncated = s.clone();
            // Remove the last digit character wherever it sits.
            if let Some(pos) = truncated.rfind(|c: char| c.is_ascii_digit()) {
                truncated.remove(pos);
            }
            let reparsed: Option<(f64, usize)> = parse(truncated.as_bytes());
            if let Some((v, consumed)) = reparsed {
                if consumed == truncated.len() {
                    assert_ne!(v.to_bits(), x.to_bits(), "truncation of {s} to {truncated} should not round-trip");
                }
            }
        }
    }
}
