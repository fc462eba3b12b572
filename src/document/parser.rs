//! Document grammar (C9): turns an [`Element`]'s byte span into a
//! `Mapping`, `Sequence`, leaf value, or classified [`Variant`].
//!
//! Every `try_parse_*` function here requires the element's *entire*
//! span to be consumed (mirroring the original's `Parser::parse`, which
//! calls `throwError()` unless the whole source was matched) — trailing
//! garbage after an otherwise-valid value is a parse error, not a
//! partial match.

use super::element::{Element, Mapping, Sequence};
use super::error::{DocumentError, ParseError};
use super::lexer::Cursor;
use super::variant::Variant;
use crate::convert;

fn cursor_for<'a>(elem: &'a Element) -> Result<Cursor<'a>, DocumentError> {
    let source = elem.source().ok_or(DocumentError::UndefinedElement)?;
    let range = elem.range().expect("defined Element has a range");
    Ok(Cursor::bounded(&source.text, range.start, range.end))
}

fn fail(elem: &Element, cursor: &Cursor) -> DocumentError {
    DocumentError::Parse(elem.parse_error_at(cursor.pos))
}

fn require_eof(elem: &Element, cursor: &mut Cursor) -> Result<(), DocumentError> {
    let _ = cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    if cursor.eof() {
        Ok(())
    } else {
        Err(fail(elem, cursor))
    }
}

/// Scans one `value` production's span, without interpreting it: a
/// `{...}` block, a quoted string (quotes included), a run of unquoted
/// text (multiple whitespace/comment-joined runs merged into one span),
/// or — when none of those apply — an empty span at the current
/// position (e.g. a key with no value before a `,` or `}`).
fn value_element(elem: &Element, cursor: &mut Cursor) -> Result<Element, DocumentError> {
    if cursor.eof() {
        return Ok(elem.child(cursor.pos..cursor.pos));
    }
    match cursor.peek().unwrap() {
        b'{' => {
            let (s, e) = cursor.scan_block_span().map_err(|off| elem.parse_error_at(off))?;
            Ok(elem.child(s..e))
        }
        b'"' | b'\'' => {
            let (s, e) = cursor.scan_quoted_span().map_err(|off| elem.parse_error_at(off))?;
            Ok(elem.child(s..e))
        }
        c if is_text_start(c) => {
            let start = cursor.pos;
            let mut end = cursor.pos;
            loop {
                if let Some((_, run_end)) = cursor.scan_text_run() {
                    end = run_end;
                }
                if !cursor.skip_horizontal_white_and_comments().map_err(|off| elem.parse_error_at(off))? {
                    break;
                }
            }
            Ok(elem.child(start..end))
        }
        _ => Ok(elem.child(cursor.pos..cursor.pos)),
    }
}

fn is_text_start(b: u8) -> bool {
    convert::is_text_byte(b)
}

/// Mirrors `Parser::nextElement`: consumes exactly one separator
/// (newline and/or comma, at least one of the two) before the next item,
/// or confirms the list has ended (`}`/EOF).
fn next_element(elem: &Element, cursor: &mut Cursor) -> Result<bool, DocumentError> {
    let optional_comma = matches!(cursor.peek(), Some(b'\r') | Some(b'\n'));
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    if cursor.eof() || cursor.peek() == Some(b'}') {
        return Ok(true);
    }
    if cursor.peek() == Some(b',') {
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        return Ok(true);
    }
    Ok(optional_comma)
}

fn parse_key(elem: &Element, cursor: &mut Cursor) -> Result<Option<Vec<u8>>, DocumentError> {
    if let Some((s, e)) = cursor.parse_identifier() {
        return Ok(Some(cursor.bytes[s..e].to_vec()));
    }
    if matches!(cursor.peek(), Some(b'"') | Some(b'\'')) {
        let quote = cursor.peek().unwrap();
        let remaining = &cursor.bytes[cursor.pos..cursor.end];
        match convert::unquote(remaining, quote) {
            Some((decoded, consumed)) => {
                cursor.pos += consumed;
                return Ok(Some(decoded));
            }
            None => return Err(fail(elem, cursor)),
        }
    }
    Ok(None)
}

/// Mirrors `Parser::keyValuePair`: `key inlineWs ':' ws value?`.
/// Returns `Ok(None)` when the cursor isn't on a key at all (so the
/// caller can decide this isn't a key-value list), `Err` for a
/// malformed pair once a key has been committed to.
fn key_value_pair(
    elem: &Element,
    cursor: &mut Cursor,
) -> Result<Option<(Vec<u8>, Element)>, DocumentError> {
    let start = cursor.pos;
    let key = match parse_key(elem, cursor)? {
        Some(k) => k,
        None => return Ok(None),
    };
    cursor.skip_horizontal_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    if cursor.peek() != Some(b':') {
        cursor.pos = start;
        return Ok(None);
    }
    cursor.pos += 1;
    cursor.skip_horizontal_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let value = value_element(elem, cursor)?;
    cursor.skip_horizontal_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    Ok(Some((key, value)))
}

/// Mirrors `Parser::keyValueElements`, including the `{ : }` empty-mapping
/// marker and duplicate-key rejection.
fn key_value_elements(elem: &Element, cursor: &mut Cursor) -> Result<Mapping, DocumentError> {
    let mut map = Mapping::new();
    if cursor.peek() == Some(b':') {
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        return Ok(map);
    }
    while !cursor.eof() && cursor.peek() != Some(b'}') {
        let dup_at = cursor.pos;
        let (key, value) = key_value_pair(elem, cursor)?.ok_or_else(|| fail(elem, cursor))?;
        if map.contains_key(&key) {
            return Err(DocumentError::Parse(elem.parse_error_at(dup_at)));
        }
        map.insert(key, value);
        if !next_element(elem, cursor)? {
            return Err(fail(elem, cursor));
        }
    }
    Ok(map)
}

/// Mirrors `Parser::valueListElements`.
fn value_list_elements(elem: &Element, cursor: &mut Cursor) -> Result<Sequence, DocumentError> {
    let mut seq = Sequence::new();
    while !cursor.eof() && cursor.peek() != Some(b'}') {
        let v = value_element(elem, cursor)?;
        cursor.skip_horizontal_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        seq.push(v);
        if !next_element(elem, cursor)? {
            return Err(fail(elem, cursor));
        }
    }
    Ok(seq)
}

/// Mirrors `Parser::tryToParseStruct`: optional outer `{ }`, then
/// key-value elements, requiring the whole span be consumed.
pub(crate) fn try_parse_mapping(elem: &Element) -> Result<Mapping, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let map = if cursor.peek() == Some(b'{') {
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        let map = key_value_elements(elem, &mut cursor)?;
        if cursor.peek() != Some(b'}') {
            return Err(fail(elem, &cursor));
        }
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        map
    } else {
        key_value_elements(elem, &mut cursor)?
    };
    require_eof(elem, &mut cursor)?;
    Ok(map)
}

/// Mirrors `Parser::tryToParse(Array&)`.
pub(crate) fn try_parse_sequence(elem: &Element) -> Result<Sequence, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let seq = if cursor.peek() == Some(b'{') {
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        let seq = value_list_elements(elem, &mut cursor)?;
        if cursor.peek() != Some(b'}') {
            return Err(fail(elem, &cursor));
        }
        cursor.pos += 1;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        seq
    } else {
        value_list_elements(elem, &mut cursor)?
    };
    require_eof(elem, &mut cursor)?;
    Ok(seq)
}

/// Mirrors `Parser::stringOrText`: a quoted string is unescaped; bare
/// text is the whitespace-joined concatenation of its runs.
pub(crate) fn try_parse_text(elem: &Element) -> Result<Vec<u8>, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let text = if matches!(cursor.peek(), Some(b'"') | Some(b'\'')) {
        let quote = cursor.peek().unwrap();
        let remaining = &cursor.bytes[cursor.pos..cursor.end];
        let (decoded, consumed) = convert::unquote(remaining, quote).ok_or_else(|| fail(elem, &cursor))?;
        cursor.pos += consumed;
        cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
        decoded
    } else {
        let mut out = Vec::new();
        loop {
            if let Some((s, e)) = cursor.scan_text_run() {
                if !out.is_empty() {
                    out.push(b' ');
                }
                out.extend_from_slice(&cursor.bytes[s..e]);
            }
            if !cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))? {
                break;
            }
        }
        out
    };
    require_eof(elem, &mut cursor)?;
    Ok(text)
}

pub(crate) fn try_parse_bool(elem: &Element) -> Result<bool, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let remaining = &cursor.bytes[cursor.pos..cursor.end];
    let (value, consumed) = convert::parse_bool(remaining).ok_or_else(|| fail(elem, &cursor))?;
    cursor.pos += consumed;
    require_eof(elem, &mut cursor)?;
    Ok(value)
}

pub(crate) fn try_parse_real_f64(elem: &Element) -> Result<f64, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let remaining = &cursor.bytes[cursor.pos..cursor.end];
    let (value, consumed) = convert::parse::<f64>(remaining).ok_or_else(|| fail(elem, &cursor))?;
    cursor.pos += consumed;
    require_eof(elem, &mut cursor)?;
    Ok(value)
}

pub(crate) fn try_parse_real_f32(elem: &Element) -> Result<f32, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    let remaining = &cursor.bytes[cursor.pos..cursor.end];
    let (value, consumed) = convert::parse::<f32>(remaining).ok_or_else(|| fail(elem, &cursor))?;
    cursor.pos += consumed;
    require_eof(elem, &mut cursor)?;
    Ok(value)
}

macro_rules! try_parse_signed {
    ($name:ident, $ty:ty, $parser:path) => {
        pub(crate) fn $name(elem: &Element) -> Result<$ty, DocumentError> {
            let mut cursor = cursor_for(elem)?;
            cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
            let remaining = &cursor.bytes[cursor.pos..cursor.end];
            let (value, consumed) = $parser(remaining).ok_or_else(|| fail(elem, &cursor))?;
            cursor.pos += consumed;
            require_eof(elem, &mut cursor)?;
            Ok(value)
        }
    };
}

try_parse_signed!(try_parse_i8, i8, convert::parse_i8);
try_parse_signed!(try_parse_i16, i16, convert::parse_i16);
try_parse_signed!(try_parse_i32, i32, convert::parse_i32);
try_parse_signed!(try_parse_i64, i64, convert::parse_i64);
try_parse_signed!(try_parse_u8, u8, convert::parse_u8);
try_parse_signed!(try_parse_u16, u16, convert::parse_u16);
try_parse_signed!(try_parse_u32, u32, convert::parse_u32);
try_parse_signed!(try_parse_u64, u64, convert::parse_u64);

/// Mirrors `Parser::tryToParse(Variant&)`: classify by peeking the first
/// non-whitespace byte, trying alternatives in a fixed order and falling
/// through to `Text` when nothing more specific fits the whole span.
pub(crate) fn try_parse_variant(elem: &Element) -> Result<Variant, DocumentError> {
    let cursor = cursor_for(elem)?;
    let mut probe = cursor;
    probe.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    if !probe.eof() {
        match probe.peek().unwrap() {
            b't' | b'f' => {
                if let Ok(b) = try_parse_bool(elem) {
                    return Ok(Variant::Boolean(b));
                }
            }
            b'i' | b'n' | b'+' | b'-' | b'0'..=b'9' => {
                if let Ok(i) = try_parse_i64(elem) {
                    return Ok(Variant::Integer(i));
                }
                if let Ok(u) = try_parse_u64(elem) {
                    return Ok(Variant::UnsignedInteger(u));
                }
                if let Ok(r) = try_parse_real_f64(elem) {
                    return Ok(Variant::Real(r));
                }
            }
            b'{' => {
                if let Ok(seq) = try_parse_sequence(elem) {
                    return Ok(Variant::Sequence(seq));
                }
                return Ok(Variant::Mapping(try_parse_mapping(elem)?));
            }
            _ => {}
        }
    }
    Ok(Variant::Text(try_parse_text(elem)?))
}

/// Mirrors `Parser::isEmpty`: true if the span is nothing but whitespace
/// and comments.
pub(crate) fn is_empty(elem: &Element) -> Result<bool, DocumentError> {
    let mut cursor = cursor_for(elem)?;
    cursor.skip_white_and_comments().map_err(|off| elem.parse_error_at(off))?;
    Ok(cursor.eof())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem(text: &str) -> Element {
        Element::new(text.as_bytes().to_vec(), "")
    }

    #[test]
    fn bare_key_value_list_without_braces() {
        let e = elem("x: 1\ny: 2\nz: 3");
        let map = try_parse_mapping(&e).unwrap();
        assert_eq!(map.keys().map(|k| k.as_slice()).collect::<Vec<_>>(), vec![b"x" as &[u8], b"y", b"z"]);
        assert_eq!(try_parse_i64(&map[b"y".as_slice()]).unwrap(), 2);
    }

    #[test]
    fn bracketed_sequence() {
        let e = elem("{ 1, 2, 3 }");
        let seq = try_parse_sequence(&e).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(try_parse_i64(&seq[2]).unwrap(), 3);
    }

    #[test]
    fn empty_mapping_marker_vs_empty_sequence() {
        let m = elem("{ : }");
        assert!(try_parse_mapping(&m).unwrap().is_empty());
        let s = elem("{ }");
        assert!(try_parse_sequence(&s).unwrap().is_empty());
    }

    #[test]
    fn duplicate_key_fails_at_second_occurrence() {
        let e = elem("a:3,a:4");
        let err = try_parse_mapping(&e).unwrap_err();
        match err {
            DocumentError::Parse(p) => assert_eq!(p.offset, 4),
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn missing_separator_fails_at_second_key() {
        let e = elem("a:3 a:4");
        let err = try_parse_mapping(&e).unwrap_err();
        match err {
            DocumentError::Parse(p) => assert_eq!(p.offset, 5),
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn trailing_comma_forbidden_in_mapping_but_allowed_in_sequence() {
        let e = elem("{ a:3, }");
        assert!(try_parse_mapping(&e).is_err());
        let s = elem("{ 1, 2, }");
        assert!(try_parse_sequence(&s).is_ok());
    }

    #[test]
    fn nested_struct_as_value() {
        let e = elem("{ a: { b: 1 } }");
        let outer = try_parse_mapping(&e).unwrap();
        let inner = try_parse_mapping(&outer[b"a".as_slice()]).unwrap();
        assert_eq!(try_parse_i64(&inner[b"b".as_slice()]).unwrap(), 1);
    }

    #[test]
    fn classifier_prefers_sequence_over_mapping_for_braces() {
        let e = elem("{ 1, 2 }");
        assert!(matches!(try_parse_variant(&e).unwrap(), Variant::Sequence(_)));
        let m = elem("{ a: 1 }");
        assert!(matches!(try_parse_variant(&m).unwrap(), Variant::Mapping(_)));
    }

    #[test]
    fn classifier_falls_back_to_text() {
        let e = elem("hello world");
        assert!(matches!(try_parse_variant(&e).unwrap(), Variant::Text(_)));
    }
}
