//! [`Variant`]: the classified, owned form of a value pulled out of a
//! document (spec §4.11), mirroring the original's `Parser::tryToParse(Variant&)`
//! dispatch.

use super::element::{Mapping, Sequence};

/// A value classified into exactly one of the document's seven kinds.
///
/// Unlike the original's C union (which carries an explicit `INVALID`
/// tag as its default state), there is no invalid variant here: callers
/// get a `Variant` only once classification has already succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Mapping(Mapping),
    Sequence(Sequence),
    Text(Vec<u8>),
    Real(f64),
    UnsignedInteger(u64),
    Integer(i64),
    Boolean(bool),
}

impl Variant {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Variant::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Variant::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Variant::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Variant::Real(r) => Some(*r),
            Variant::UnsignedInteger(u) => Some(*u as f64),
            Variant::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_unsigned_integer(&self) -> Option<u64> {
        match self {
            Variant::UnsignedInteger(u) => Some(*u),
            Variant::Integer(i) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Variant::Integer(i) => Some(*i),
            Variant::UnsignedInteger(u) if *u <= i64::MAX as u64 => Some(*u as i64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Variant::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_widens_to_real() {
        assert_eq!(Variant::Integer(-3).as_real(), Some(-3.0));
        assert_eq!(Variant::UnsignedInteger(7).as_real(), Some(7.0));
    }

    #[test]
    fn cross_sign_integer_accessors() {
        assert_eq!(Variant::UnsignedInteger(5).as_integer(), Some(5));
        assert_eq!(Variant::Integer(5).as_unsigned_integer(), Some(5));
        assert_eq!(Variant::Integer(-1).as_unsigned_integer(), None);
    }

    #[test]
    fn text_and_boolean_accessors_reject_other_kinds() {
        let v = Variant::Boolean(true);
        assert_eq!(v.as_boolean(), Some(true));
        assert_eq!(v.as_text(), None);
    }
}
