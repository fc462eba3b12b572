/*!
`numbstrict` performs bit-exact, correctly rounded conversion between
IEEE-754 binary floating-point values (`f32`/`f64`) and a canonical decimal
text form, together with a small human-oriented configuration text format
("document") built on top of those conversions.

The crate is organized around two tightly coupled subsystems:

- [`convert`] — the floating-point ↔ decimal conversion core. It produces
  the shortest decimal string that round-trips to the exact input float,
  decides fixed vs. scientific presentation by a fixed rule, and parses any
  well-formed decimal text back to the nearest representable float with
  correct ties-to-even rounding, including the entire subnormal range,
  negative zero, and ±infinity/NaN. It also handles bounded integer and
  boolean text, and quoted-string escaping.
- [`document`] — the parser/composer for a compact, human-friendly
  structured text format (nested mappings, ordered sequences,
  quoted/unquoted strings, numbers, booleans, comments) whose numeric
  leaves delegate to [`convert`].

The extended-precision ("double-double") arithmetic and the power-of-ten
table that both `convert::parse` and `convert::format` build on live in
[`real`].

This crate performs no file I/O: it consumes byte sequences (already-read
text) and produces byte sequences, leaving the driving program to own any
file access.
*/

pub mod convert;
pub mod document;
pub mod real;

pub use document::{
    compose_mapping, compose_sequence, DocumentError, Element, Mapping, ParseError, Sequence, Variant,
};
