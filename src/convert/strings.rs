//! Quoted-string escaping and unescaping (C7).
//!
//! The document format is not UTF-8: strings are byte strings, and a raw
//! byte with the high bit set passes straight through (`genericUnquoteString`
//! in the original treats it as ISO-8859-1). Escapes recognized inside a
//! quoted string are `\\ \" \' \n \r \t \xHH \uHHHH \UHHHHHHHH`; since this
//! crate only needs an 8-bit string representation, `\u`/`\U` values at or
//! above `0x100` are rejected (the original's 16/32-bit output modes, used
//! for UTF-16/UTF-32 backends, have no counterpart here).

fn from_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Unescapes the body of a quoted string. `bytes` must start just past the
/// opening quote character; `quote_char` is that character (`"` or `'`).
/// Returns the unescaped bytes and the offset of the byte just past the
/// closing quote, or `None` on a malformed escape or an unterminated
/// string.
pub fn unquote(bytes: &[u8], quote_char: u8) -> Option<(Vec<u8>, usize)> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut p = 0usize;

    while p < bytes.len() && bytes[p] != quote_char {
        let c = bytes[p];
        if c == b'\\' {
            p += 1;
            if p == bytes.len() {
                return None;
            }
            match bytes[p] {
                b'\\' | b'\'' | b'"' => {
                    out.push(bytes[p]);
                    p += 1;
                }
                b'n' => {
                    out.push(b'\n');
                    p += 1;
                }
                b'r' => {
                    out.push(b'\r');
                    p += 1;
                }
                b't' => {
                    out.push(b'\t');
                    p += 1;
                }
                kind @ (b'x' | b'u' | b'U') => {
                    let n = match kind {
                        b'x' => 2,
                        b'u' => 4,
                        _ => 8,
                    };
                    p += 1;
                    if p + n > bytes.len() {
                        return None;
                    }
                    let mut value: u32 = 0;
                    for &digit in &bytes[p..p + n] {
                        value = (value << 4) | from_hex_digit(digit)? as u32;
                    }
                    p += n;
                    if value >= 0x100 {
                        return None;
                    }
                    out.push(value as u8);
                }
                _ => return None,
            }
        } else if !(0x20..0x7f).contains(&c) {
            // Bytes with the high bit set pass through untouched; control
            // characters below 0x20 (outside the escape set above) do not.
            if c >= 0x80 {
                out.push(c);
                p += 1;
            } else {
                return None;
            }
        } else {
            out.push(c);
            p += 1;
        }
    }

    if p == bytes.len() {
        return None; // Unterminated string.
    }
    Some((out, p + 1)) // +1 to consume the closing quote.
}

/// True for bytes allowed in unquoted text (spec §4.7): printable ASCII
/// excluding the structural characters `{ } " ' : , = ;`.
pub fn is_text_byte(c: u8) -> bool {
    match c {
        b' ' | b'\t' | b',' | b'{' | b'}' | b'"' | b'\'' | b'=' | b';' | b':' | b'\r' | b'\n' => false,
        _ => (0x20..0x7f).contains(&c),
    }
}

/// True if every byte of `s` is a valid unquoted-text byte and no `//` or
/// `/*` comment opener appears inside it — i.e. `s` can be emitted as
/// unquoted text without ambiguity.
pub fn is_all_text_bytes(s: &[u8]) -> bool {
    for (i, &b) in s.iter().enumerate() {
        if !is_text_byte(b) {
            return false;
        }
        if b == b'/' && i + 1 < s.len() && (s[i + 1] == b'/' || s[i + 1] == b'*') {
            return false;
        }
    }
    true
}

/// Quotes `bytes` for output, escaping as needed. If `prefer_unquoted` and
/// `bytes` consists entirely of valid unquoted-text bytes with no comment
/// opener, returns it unquoted instead.
pub fn quote(bytes: &[u8], prefer_unquoted: bool, quote_char: u8) -> String {
    if prefer_unquoted && is_all_text_bytes(bytes) {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    let mut out = String::with_capacity(bytes.len() + 2);
    out.push(quote_char as char);
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != quote_char && b != b'\\' {
            out.push(b as char);
            continue;
        }
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            _ if b == quote_char => {
                out.push('\\');
                out.push(quote_char as char);
            }
            _ => {
                out.push_str(&format!("\\x{:02x}", b));
            }
        }
    }
    out.push(quote_char as char);
    out
}

/// A bare identifier key can be composed unquoted without a leading
/// quote character at all (stricter than general unquoted text — spec
/// §6: `[A-Za-z_][A-Za-z0-9_]*`).
pub fn key_needs_quoting(key: &[u8]) -> bool {
    let Some(&first) = key.first() else { return true };
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return true;
    }
    !key[1..].iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquotes_basic_escapes() {
        // Source text (after the opening quote): ab\n\t\\\'\x41"
        let input: &[u8] = b"ab\\n\\t\\\\\\'\\x41\"";
        let (s, consumed) = unquote(input, b'"').unwrap();
        assert_eq!(s, b"ab\n\t\\'A");
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn unquote_rejects_unterminated() {
        assert!(unquote(b"abc", b'"').is_none());
    }

    #[test]
    fn unquote_rejects_wide_escape_on_8bit() {
        assert!(unquote(b"\\u0141\"", b'"').is_none());
    }

    #[test]
    fn high_bit_bytes_pass_through() {
        let (s, _) = unquote(&[0xC3, 0xA9, b'"'], b'"').unwrap();
        assert_eq!(s, vec![0xC3, 0xA9]);
    }

    #[test]
    fn quotes_special_characters() {
        assert_eq!(quote(b"a\nb", false, b'"'), "\"a\\nb\"");
    }

    #[test]
    fn prefers_unquoted_when_plain() {
        assert_eq!(quote(b"hello", true, b'"'), "hello");
        assert_eq!(quote(b"has space", true, b'"'), "has space");
    }

    #[test]
    fn key_quoting_rules() {
        assert!(!key_needs_quoting(b"foo_bar1"));
        assert!(key_needs_quoting(b"1foo"));
        assert!(key_needs_quoting(b"foo-bar"));
        assert!(key_needs_quoting(b""));
    }
}
