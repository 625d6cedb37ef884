use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use bitvec::{order::Msb0, slice::BitSlice, vec::BitVec, view::BitView};
use chrono::{DateTime, Utc};
use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use num::BigInt;

use crate::{tag::*, *};

/// Rejected construction of a grammar value.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarError {
    pub details: String,
}

impl GrammarError {
    pub fn new(details: &str) -> Self {
        GrammarError {
            details: details.into(),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "Invalid ASN1 value: {}", self.details)
    }
}

/// Representation of an ASN1 BIT STRING value.
///
/// The bits are stored most significant bit first, the last
/// `unused_bits` bits of the final byte are padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    data: Vec<u8>,
    unused_bits: u8,
}

impl BitString {
    pub fn new(data: Vec<u8>, unused_bits: u8) -> Result<Self, GrammarError> {
        if unused_bits > 7 {
            return Err(GrammarError {
                details: format!("{unused_bits} unused bits exceed the final byte"),
            });
        }
        if data.is_empty() && unused_bits != 0 {
            return Err(GrammarError::new(
                "an empty bit string cannot declare unused bits",
            ));
        }
        Ok(BitString { data, unused_bits })
    }

    /// Packs a slice of bits, padding the final byte with zeros.
    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        let mut packed: BitVec<u8, Msb0> = bits.to_bitvec();
        packed.set_uninitialized(false);
        BitString {
            unused_bits: ((8 - bits.len() % 8) % 8) as u8,
            data: packed.into_vec(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused_bits as usize
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.data.view_bits::<Msb0>()[..self.bit_len()]
    }
}

/// Representation of an ASN1 OBJECT IDENTIFIER as its sequence of arcs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier(Vec<u64>);

impl ObjectIdentifier {
    pub fn new(arcs: Vec<u64>) -> Result<Self, GrammarError> {
        match arcs.as_slice() {
            [] | [_] => Err(GrammarError::new(
                "an object identifier needs at least two arcs",
            )),
            [first, _, ..] if *first > 2 => Err(GrammarError {
                details: format!("first arc {first} must be 0, 1 or 2"),
            }),
            [first, second, ..] if *first < 2 && *second >= 40 => Err(GrammarError {
                details: format!("second arc {second} must be below 40 under arc {first}"),
            }),
            _ => Ok(ObjectIdentifier(arcs)),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.0
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let dotted = self
            .0
            .iter()
            .map(|arc| arc.to_string())
            .collect::<Vec<String>>()
            .join(".");
        f.write_str(&dotted)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| {
                arc.trim().parse::<u64>().map_err(|_| GrammarError {
                    details: format!("'{arc}' is not a numeric arc"),
                })
            })
            .collect::<Result<Vec<u64>, GrammarError>>()?;
        ObjectIdentifier::new(arcs)
    }
}

impl TryFrom<&[u64]> for ObjectIdentifier {
    type Error = GrammarError;

    fn try_from(value: &[u64]) -> Result<Self, Self::Error> {
        ObjectIdentifier::new(value.to_vec())
    }
}

/// The types of ASN1 character strings supported by the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterStringType {
    NumericString,
    PrintableString,
    T61String,
    VideotexString,
    IA5String,
    UTF8String,
    BMPString,
}

impl CharacterStringType {
    pub fn from_tag(r#type: u32) -> Option<Self> {
        match r#type {
            NUMERIC_STRING => Some(Self::NumericString),
            PRINTABLE_STRING => Some(Self::PrintableString),
            T61_STRING => Some(Self::T61String),
            VIDEOTEX_STRING => Some(Self::VideotexString),
            IA5_STRING => Some(Self::IA5String),
            UTF8_STRING => Some(Self::UTF8String),
            BMP_STRING => Some(Self::BMPString),
            _ => None,
        }
    }

    pub fn tag(&self) -> u32 {
        match self {
            Self::NumericString => NUMERIC_STRING,
            Self::PrintableString => PRINTABLE_STRING,
            Self::T61String => T61_STRING,
            Self::VideotexString => VIDEOTEX_STRING,
            Self::IA5String => IA5_STRING,
            Self::UTF8String => UTF8_STRING,
            Self::BMPString => BMP_STRING,
        }
    }

    /// Whether every character is carried in a single ISO-8859-1 octet.
    pub fn is_single_byte(&self) -> bool {
        !matches!(self, Self::UTF8String | Self::BMPString)
    }
}

/// A character string value together with the string type it is encoded as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterString {
    pub kind: CharacterStringType,
    pub value: String,
}

impl CharacterString {
    pub fn new(kind: CharacterStringType, value: &str) -> Self {
        CharacterString {
            kind,
            value: value.into(),
        }
    }
}

/// A constructed element of a non-universal class.
///
/// With exactly one item, this is an EXPLICIT tag wrapper.
/// Without items, it is the zero-length placeholder of an absent
/// optional field.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub class: TagClass,
    pub number: u32,
    pub items: Vec<Asn1Value>,
}

/// A primitive element of a non-universal class whose content
/// has not been resolved to a universal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implicit {
    pub class: TagClass,
    pub number: u32,
    pub content: Vec<u8>,
}

/// The possible values of a BER/DER data element.
#[derive(Debug, Clone, PartialEq)]
pub enum Asn1Value {
    Null,
    Boolean(bool),
    Integer(BigInt),
    OctetString(Vec<u8>),
    ObjectIdentifier(ObjectIdentifier),
    BitString(BitString),
    String(CharacterString),
    UtcTime(DateTime<Utc>),
    GeneralizedTime(DateTime<Utc>),
    Sequence(Vec<Asn1Value>),
    Set(Vec<Asn1Value>),
    Tagged(Tagged),
    Implicit(Implicit),
}

impl Asn1Value {
    /// Wraps `inner` in a context-specific EXPLICIT tag.
    pub fn explicit(number: u32, inner: Asn1Value) -> Self {
        Asn1Value::Tagged(Tagged {
            class: TagClass::ContextSpecific,
            number,
            items: vec![inner],
        })
    }

    /// Placeholder for an omitted context-specific EXPLICIT field.
    pub fn explicit_absent(number: u32) -> Self {
        Asn1Value::Tagged(Tagged {
            class: TagClass::ContextSpecific,
            number,
            items: vec![],
        })
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Asn1Value::Integer(value.into())
    }

    pub fn string(kind: CharacterStringType, value: &str) -> Self {
        Asn1Value::String(CharacterString::new(kind, value))
    }

    /// The identifier this value is encoded with.
    pub fn tag(&self) -> Tag {
        match self {
            Asn1Value::Null => Tag::universal(NULL),
            Asn1Value::Boolean(_) => Tag::universal(BOOLEAN),
            Asn1Value::Integer(_) => Tag::universal(INTEGER),
            Asn1Value::OctetString(_) => Tag::universal(OCTET_STRING),
            Asn1Value::ObjectIdentifier(_) => Tag::universal(OBJECT_IDENTIFIER),
            Asn1Value::BitString(_) => Tag::universal(BIT_STRING),
            Asn1Value::String(s) => Tag::universal(s.kind.tag()),
            Asn1Value::UtcTime(_) => Tag::universal(UTC_TIME),
            Asn1Value::GeneralizedTime(_) => Tag::universal(GENERALIZED_TIME),
            Asn1Value::Sequence(_) => Tag::universal(SEQUENCE),
            Asn1Value::Set(_) => Tag::universal(SET),
            Asn1Value::Tagged(t) => Tag {
                class: t.class,
                constructed: true,
                number: t.number,
            },
            Asn1Value::Implicit(i) => Tag {
                class: i.class,
                constructed: false,
                number: i.number,
            },
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Asn1Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Asn1Value::OctetString(b) => Some(b),
            Asn1Value::Implicit(i) => Some(&i.content),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Asn1Value::String(s) => Some(&s.value),
            _ => None,
        }
    }

    /// Members of a SEQUENCE, SET or non-universal constructed element.
    pub fn items(&self) -> Option<&[Asn1Value]> {
        match self {
            Asn1Value::Sequence(items) | Asn1Value::Set(items) => Some(items),
            Asn1Value::Tagged(t) => Some(&t.items),
            _ => None,
        }
    }

    /// Removes one EXPLICIT wrapper, if present.
    pub fn unwrap_explicit(self) -> Self {
        match self {
            Asn1Value::Tagged(mut t) if t.items.len() == 1 => t.items.remove(0),
            other => other,
        }
    }
}

impl From<bool> for Asn1Value {
    fn from(value: bool) -> Self {
        Asn1Value::Boolean(value)
    }
}

impl From<ObjectIdentifier> for Asn1Value {
    fn from(value: ObjectIdentifier) -> Self {
        Asn1Value::ObjectIdentifier(value)
    }
}

impl From<BitString> for Asn1Value {
    fn from(value: BitString) -> Self {
        Asn1Value::BitString(value)
    }
}

impl From<Vec<u8>> for Asn1Value {
    fn from(value: Vec<u8>) -> Self {
        Asn1Value::OctetString(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::bits;

    #[test]
    fn packs_bit_string() {
        let bit_string = BitString::from_bits(bits![u8, Msb0; 1,0,1,1,0,1,0,1,1,0,1,1,0]);
        assert_eq!(bit_string.data(), &[0b1011_0101, 0b1011_0000]);
        assert_eq!(bit_string.unused_bits(), 3);
        assert_eq!(bit_string.bit_len(), 13);
        assert_eq!(
            bit_string.bits(),
            bits![u8, Msb0; 1,0,1,1,0,1,0,1,1,0,1,1,0]
        );
    }

    #[test]
    fn rejects_invalid_bit_string() {
        assert!(BitString::new(vec![0xFF], 8).is_err());
        assert!(BitString::new(vec![], 1).is_err());
        assert_eq!(BitString::new(vec![], 0).unwrap().bit_len(), 0);
    }

    #[test]
    fn parses_object_identifier() {
        let oid: ObjectIdentifier = "1.2.840.113549".parse().unwrap();
        assert_eq!(oid.arcs(), &[1, 2, 840, 113549]);
        assert_eq!(oid.to_string(), "1.2.840.113549");
        assert!("3.1".parse::<ObjectIdentifier>().is_err());
        assert!("1.40".parse::<ObjectIdentifier>().is_err());
        assert!("2.999.1".parse::<ObjectIdentifier>().is_ok());
        assert!("1".parse::<ObjectIdentifier>().is_err());
        assert!("1.2.x".parse::<ObjectIdentifier>().is_err());
    }

    #[test]
    fn reports_value_tags() {
        assert_eq!(Asn1Value::Null.tag().leading_octet(), 0x05);
        assert_eq!(Asn1Value::Sequence(vec![]).tag().leading_octet(), 0x30);
        assert_eq!(
            Asn1Value::string(CharacterStringType::BMPString, "a")
                .tag()
                .leading_octet(),
            0x1E
        );
        assert_eq!(
            Asn1Value::explicit(1, Asn1Value::Null).tag().leading_octet(),
            0xA1
        );
    }

    #[test]
    fn unwraps_explicit_values() {
        assert_eq!(
            Asn1Value::explicit(0, Asn1Value::integer(5)).unwrap_explicit(),
            Asn1Value::integer(5)
        );
        assert_eq!(
            Asn1Value::explicit_absent(0).unwrap_explicit(),
            Asn1Value::explicit_absent(0)
        );
    }
}
