//! Document composer (C10): re-serializes a parsed `Mapping`/`Sequence`
//! of [`Element`]s back into document text.
//!
//! Each child's own source span is reused verbatim (re-indented to the
//! new nesting level) rather than re-derived from an abstract value —
//! this is what makes `compose(parse(text))` byte-for-byte stable
//! (spec §8 property 7): nothing is reformatted beyond whitespace.

use super::element::{Element, Mapping, Sequence};
use super::parser;
use crate::convert;

/// Drops up to as many leading tabs as the *last* line of `code` starts
/// with, then re-adds `tab_count` tabs after every line break. Mirrors
/// the original `reindent`: the rewritten text keeps its own internal
/// relative indentation but is re-anchored to the caller's nesting depth.
fn reindent(code: &[u8], tab_count: usize) -> Vec<u8> {
    let mut last_line_start = code.len();
    while last_line_start > 0 && code[last_line_start - 1] != b'\n' {
        last_line_start -= 1;
    }
    let mut drop_count = 0usize;
    let mut q = last_line_start;
    while q < code.len() && code[q] == b'\t' {
        drop_count += 1;
        q += 1;
    }

    let mut out = Vec::with_capacity(code.len());
    let mut p = 0usize;
    while p < code.len() {
        let mut dropped = 0usize;
        while p < code.len() && code[p] == b'\t' && dropped < drop_count {
            p += 1;
            dropped += 1;
        }
        let line_start = p;
        while p < code.len() && code[p] != b'\n' {
            p += 1;
        }
        if p < code.len() {
            p += 1;
        }
        out.extend_from_slice(&code[line_start..p]);
        if p < code.len() {
            out.resize(out.len() + tab_count, b'\t');
        }
    }
    out
}

fn element_code(elem: &Element) -> Vec<u8> {
    elem.bytes().map(|b| b.to_vec()).unwrap_or_default()
}

/// Composes a `{ a, b, c }`/one-per-line sequence. `bracket = false`
/// suppresses the outer braces (used for a whole document with no
/// wrapper).
pub fn compose_sequence(seq: &Sequence, multi_line: bool, bracket: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if bracket {
        out.extend_from_slice(if multi_line { b"{\n" } else { b"{ " });
    }
    let len = seq.len();
    for (i, elem) in seq.iter().enumerate() {
        if multi_line && bracket {
            out.push(b'\t');
        }
        let code = element_code(elem);
        let tabs = if multi_line && bracket { 1 } else { 0 };
        out.extend_from_slice(&reindent(&code, tabs));
        let last = i + 1 == len;
        let trailing_blank = parser::is_empty(elem).unwrap_or(false);
        if !last || trailing_blank {
            out.push(b',');
        }
        if !last || multi_line || bracket {
            out.push(if multi_line { b'\n' } else { b' ' });
        }
    }
    if bracket {
        out.push(b'}');
    }
    out
}

/// Composes a `{ key: value, key: value }`/one-per-line mapping. Empty
/// mappings render as `{ : }` (or `{\n\t:\n}` multi-line) to disambiguate
/// from an empty sequence.
pub fn compose_mapping(map: &Mapping, multi_line: bool, bracket: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if bracket {
        out.extend_from_slice(if multi_line { b"{\n\t" } else { b"{ " });
    }
    for (i, (key, elem)) in map.iter().enumerate() {
        if !elem.exists() {
            continue;
        }
        if i != 0 {
            if multi_line {
                out.extend_from_slice(if bracket { b"\n\t" } else { b"\n" });
            } else {
                out.extend_from_slice(b", ");
            }
        }
        if convert::key_needs_quoting(key) {
            out.extend_from_slice(convert::quote(key, false, b'"').as_bytes());
        } else {
            out.extend_from_slice(key);
        }
        out.extend_from_slice(b": ");
        let code = element_code(elem);
        let tabs = if multi_line && bracket { 1 } else { 0 };
        out.extend_from_slice(&reindent(&code, tabs));
    }
    if map.is_empty() {
        out.push(b':');
    }
    if multi_line {
        out.extend_from_slice(if bracket { b"\n}" } else { b"\n" });
    } else if bracket {
        out.extend_from_slice(b" }");
    }
    out
}
