use alloc::{format, string::String, vec, vec::Vec};
use asnber_grammar::*;
use chrono::{DateTime, Utc};
use num::BigInt;

use crate::{error::EncodingError, Encoder};

use super::{
    header::{write_base128, write_identifier, write_length},
    time::{format_generalized_time, format_utc_time},
    Ber,
};

const PRINTABLE_PUNCTUATION: &str = " '()+,-./:=?";

impl Encoder for Ber {
    fn encode_boolean(value: bool, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(BOOLEAN),
            &[boolean_content(value)],
            output,
        ))
    }

    fn encode_integer(value: &BigInt, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(INTEGER),
            &value.to_signed_bytes_be(),
            output,
        ))
    }

    fn encode_null(output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(&Tag::universal(NULL), &[], output))
    }

    fn encode_octet_string(value: &[u8], output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(&Tag::universal(OCTET_STRING), value, output))
    }

    fn encode_object_identifier(
        value: &ObjectIdentifier,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(OBJECT_IDENTIFIER),
            &object_identifier_content(value)?,
            output,
        ))
    }

    fn encode_bit_string(value: &BitString, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(BIT_STRING),
            &bit_string_content(value),
            output,
        ))
    }

    fn encode_character_string(
        value: &CharacterString,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(value.kind.tag()),
            &character_string_content(value)?,
            output,
        ))
    }

    fn encode_utc_time(value: &DateTime<Utc>, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(UTC_TIME),
            format_utc_time(value)?.as_bytes(),
            output,
        ))
    }

    fn encode_generalized_time(
        value: &DateTime<Utc>,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(GENERALIZED_TIME),
            format_generalized_time(value)?.as_bytes(),
            output,
        ))
    }

    fn encode_sequence(items: &[Asn1Value], output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(
            &Tag::universal(SEQUENCE),
            &concatenated(items)?,
            output,
        ))
    }

    fn encode_set(items: &[Asn1Value], output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        Ok(write_element(&Tag::universal(SET), &sorted(items)?, output))
    }

    fn encode_tagged(value: &Tagged, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        let tag = Tag {
            class: value.class,
            constructed: true,
            number: value.number,
        };
        Ok(write_element(&tag, &concatenated(&value.items)?, output))
    }

    fn encode_implicit(value: &Implicit, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        let tag = Tag {
            class: value.class,
            constructed: false,
            number: value.number,
        };
        Ok(write_element(&tag, &value.content, output))
    }
}

impl Ber {
    /// Encodes a parse tree, honoring the tagging of every node.
    ///
    /// Universal nodes encode their value. IMPLICIT non-universal nodes carry
    /// their original tag on the content of the type they were read as.
    /// EXPLICIT nodes wrap the universal encoding of their value.
    /// Absent nodes become an empty constructed element.
    pub fn encode_node(node: &Node) -> Result<Vec<u8>, EncodingError> {
        encode_node(node, Vec::new())
    }
}

fn encode_node(node: &Node, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
    let tag = Tag {
        class: node.class,
        constructed: true,
        number: node.original_type,
    };
    match (&node.data, node.class, node.tag_kind) {
        (NodeData::Absent, _, _) => Ok(write_element(&tag, &[], output)),
        (NodeData::Value(value), TagClass::Universal, _) => Ber::encode_value(value, output),
        (NodeData::Value(value), _, TagKind::Explicit) => Ok(write_element(
            &tag,
            &Ber::encode_value(value, Vec::new())?,
            output,
        )),
        (NodeData::Value(value), _, TagKind::Implicit) => Ok(write_element(
            &Tag {
                constructed: value.tag().constructed,
                ..tag
            },
            &content_octets(value)?,
            output,
        )),
        (NodeData::Children(children), TagClass::Universal, _) => Ok(write_element(
            &Tag::universal(node.r#type),
            &children_content(node, children)?,
            output,
        )),
        (NodeData::Children(children), _, _) => Ok(write_element(
            &tag,
            &children_content(node, children)?,
            output,
        )),
    }
}

/// Members of a SET, or of an IMPLICIT tag standing for one, are sorted.
/// Any other constructed node keeps its wire order.
fn children_content(node: &Node, children: &[Node]) -> Result<Vec<u8>, EncodingError> {
    let is_set = node.r#type == SET
        && (node.class == TagClass::Universal || node.tag_kind == TagKind::Implicit);
    if is_set {
        let mut encodings = children
            .iter()
            .map(|child| encode_node(child, Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;
        encodings.sort();
        return Ok(encodings.concat());
    }
    children
        .iter()
        .try_fold(Vec::new(), |output, child| encode_node(child, output))
}

/// Content octets of `value`, without identifier and length.
pub fn content_octets(value: &Asn1Value) -> Result<Vec<u8>, EncodingError> {
    match value {
        Asn1Value::Null => Ok(vec![]),
        Asn1Value::Boolean(b) => Ok(vec![boolean_content(*b)]),
        Asn1Value::Integer(i) => Ok(i.to_signed_bytes_be()),
        Asn1Value::OctetString(o) => Ok(o.clone()),
        Asn1Value::ObjectIdentifier(oid) => object_identifier_content(oid),
        Asn1Value::BitString(b) => Ok(bit_string_content(b)),
        Asn1Value::String(s) => character_string_content(s),
        Asn1Value::UtcTime(t) => format_utc_time(t).map(String::into_bytes),
        Asn1Value::GeneralizedTime(t) => format_generalized_time(t).map(String::into_bytes),
        Asn1Value::Sequence(items) => concatenated(items),
        Asn1Value::Set(items) => sorted(items),
        Asn1Value::Tagged(t) => concatenated(&t.items),
        Asn1Value::Implicit(i) => Ok(i.content.clone()),
    }
}

fn write_element(tag: &Tag, content: &[u8], mut output: Vec<u8>) -> Vec<u8> {
    write_identifier(tag, &mut output);
    write_length(content.len(), &mut output);
    output.extend_from_slice(content);
    output
}

fn boolean_content(value: bool) -> u8 {
    if value {
        0xFF
    } else {
        0x00
    }
}

fn concatenated(items: &[Asn1Value]) -> Result<Vec<u8>, EncodingError> {
    items
        .iter()
        .try_fold(Vec::new(), |output, item| Ber::encode_value(item, output))
}

/// DER orders SET members by their complete encodings.
fn sorted(items: &[Asn1Value]) -> Result<Vec<u8>, EncodingError> {
    let mut encodings = items
        .iter()
        .map(|item| Ber::encode_value(item, Vec::new()))
        .collect::<Result<Vec<_>, _>>()?;
    encodings.sort();
    Ok(encodings.concat())
}

fn object_identifier_content(value: &ObjectIdentifier) -> Result<Vec<u8>, EncodingError> {
    let (first, second, rest) = match value.arcs() {
        [first, second, rest @ ..] => (*first, *second, rest),
        _ => {
            return Err(EncodingError::new(
                "an object identifier needs at least two arcs",
            ))
        }
    };
    let leading = first
        .checked_mul(40)
        .and_then(|f| f.checked_add(second))
        .ok_or_else(|| EncodingError {
            details: format!("arcs {first}.{second} exceed the first subidentifier"),
        })?;
    let mut content = Vec::new();
    write_base128(leading, &mut content);
    for arc in rest {
        write_base128(*arc, &mut content);
    }
    Ok(content)
}

/// DER requires the unused bits of the final byte to be zero.
fn bit_string_content(value: &BitString) -> Vec<u8> {
    let mut content = Vec::with_capacity(value.data().len() + 1);
    content.push(value.unused_bits());
    content.extend_from_slice(value.data());
    if let Some(last) = content.last_mut().filter(|_| !value.data().is_empty()) {
        *last &= 0xFF << value.unused_bits();
    }
    content
}

fn character_string_content(value: &CharacterString) -> Result<Vec<u8>, EncodingError> {
    let kind = value.kind;
    match kind {
        CharacterStringType::UTF8String => Ok(value.value.as_bytes().to_vec()),
        CharacterStringType::BMPString => value
            .value
            .chars()
            .try_fold(Vec::new(), |mut content, c| {
                let code = u16::try_from(u32::from(c)).map_err(|_| EncodingError {
                    details: format!("'{c}' lies outside the Basic Multilingual Plane"),
                })?;
                content.extend_from_slice(&code.to_be_bytes());
                Ok(content)
            }),
        _ => value
            .value
            .chars()
            .map(|c| {
                if permitted(kind, c) {
                    u8::try_from(u32::from(c)).map_err(|_| invalid_character(kind, c))
                } else {
                    Err(invalid_character(kind, c))
                }
            })
            .collect(),
    }
}

fn permitted(kind: CharacterStringType, c: char) -> bool {
    match kind {
        CharacterStringType::NumericString => c.is_ascii_digit() || c == ' ',
        CharacterStringType::PrintableString => {
            c.is_ascii_alphanumeric() || PRINTABLE_PUNCTUATION.contains(c)
        }
        CharacterStringType::IA5String => c.is_ascii(),
        _ => u32::from(c) <= 0xFF,
    }
}

fn invalid_character(kind: CharacterStringType, c: char) -> EncodingError {
    EncodingError {
        details: format!("{kind:?} cannot hold the character '{c}' (U+{:04X})", u32::from(c)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn encode(value: &Asn1Value) -> Vec<u8> {
        Ber::encode(value).unwrap()
    }

    #[test]
    fn encodes_booleans_and_null() {
        assert_eq!(encode(&Asn1Value::Boolean(true)), vec![0x01, 0x01, 0xFF]);
        assert_eq!(encode(&Asn1Value::Boolean(false)), vec![0x01, 0x01, 0x00]);
        assert_eq!(encode(&Asn1Value::Null), vec![0x05, 0x00]);
    }

    #[test]
    fn encodes_minimal_integers() {
        assert_eq!(encode(&Asn1Value::integer(0)), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode(&Asn1Value::integer(127)), vec![0x02, 0x01, 0x7F]);
        assert_eq!(encode(&Asn1Value::integer(128)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode(&Asn1Value::integer(-128)), vec![0x02, 0x01, 0x80]);
        assert_eq!(encode(&Asn1Value::integer(-129)), vec![0x02, 0x02, 0xFF, 0x7F]);
        assert_eq!(
            encode(&Asn1Value::integer(65537)),
            vec![0x02, 0x03, 0x01, 0x00, 0x01]
        );
    }

    #[test]
    fn encodes_object_identifiers() {
        let oid = |s: &str| Asn1Value::ObjectIdentifier(s.parse().unwrap());
        assert_eq!(
            encode(&oid("1.2.840.113549")),
            vec![0x06, 0x06, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]
        );
        assert_eq!(encode(&oid("2.5.4.3")), vec![0x06, 0x03, 0x55, 0x04, 0x03]);
        assert_eq!(encode(&oid("2.999")), vec![0x06, 0x02, 0x88, 0x37]);
    }

    #[test]
    fn encodes_bit_strings() {
        let bits = BitString::new(vec![0b1011_0101, 0b1011_0000], 3).unwrap();
        assert_eq!(
            encode(&Asn1Value::BitString(bits)),
            vec![0x03, 0x03, 0x03, 0xB5, 0xB0]
        );
        let padded = BitString::new(vec![0xFF], 4).unwrap();
        assert_eq!(
            encode(&Asn1Value::BitString(padded)),
            vec![0x03, 0x02, 0x04, 0xF0]
        );
        assert_eq!(
            encode(&Asn1Value::BitString(BitString::default())),
            vec![0x03, 0x01, 0x00]
        );
    }

    #[test]
    fn encodes_long_lengths() {
        let encoded = encode(&Asn1Value::OctetString(vec![0xAB; 200]));
        assert_eq!(&encoded[..3], &[0x04, 0x81, 0xC8]);
        assert_eq!(encoded.len(), 203);
        let encoded = encode(&Asn1Value::OctetString(vec![0x00; 0x1234]));
        assert_eq!(&encoded[..4], &[0x04, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn sorts_set_members() {
        let a = Asn1Value::Set(vec![
            Asn1Value::integer(2),
            Asn1Value::Boolean(true),
            Asn1Value::integer(1),
        ]);
        let b = Asn1Value::Set(vec![
            Asn1Value::integer(1),
            Asn1Value::integer(2),
            Asn1Value::Boolean(true),
        ]);
        assert_eq!(encode(&a), encode(&b));
        assert_eq!(
            encode(&a),
            vec![0x31, 0x09, 0x01, 0x01, 0xFF, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]
        );
    }

    #[test]
    fn sorts_set_members_by_encoding() {
        let set = Asn1Value::Set(vec![
            Asn1Value::OctetString(vec![0x01, 0x00]),
            Asn1Value::OctetString(vec![0x01]),
        ]);
        assert_eq!(
            encode(&set),
            vec![0x31, 0x07, 0x04, 0x01, 0x01, 0x04, 0x02, 0x01, 0x00]
        );
    }

    #[test]
    fn encodes_character_strings() {
        let string = |kind, s| encode(&Asn1Value::string(kind, s));
        assert_eq!(
            string(CharacterStringType::PrintableString, "Hi"),
            vec![0x13, 0x02, 0x48, 0x69]
        );
        assert_eq!(
            string(CharacterStringType::UTF8String, "é"),
            vec![0x0C, 0x02, 0xC3, 0xA9]
        );
        assert_eq!(
            string(CharacterStringType::BMPString, "Hé"),
            vec![0x1E, 0x04, 0x00, 0x48, 0x00, 0xE9]
        );
        assert_eq!(
            string(CharacterStringType::T61String, "é"),
            vec![0x14, 0x01, 0xE9]
        );
    }

    #[test]
    fn rejects_unrepresentable_characters() {
        let fails = |kind, s| Ber::encode(&Asn1Value::string(kind, s)).is_err();
        assert!(fails(CharacterStringType::PrintableString, "a@b"));
        assert!(fails(CharacterStringType::NumericString, "12a"));
        assert!(fails(CharacterStringType::IA5String, "é"));
        assert!(fails(CharacterStringType::T61String, "€"));
        assert!(fails(CharacterStringType::BMPString, "😀"));
        assert!(!fails(CharacterStringType::NumericString, "12 34"));
    }

    #[test]
    fn encodes_times() {
        let time = Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap();
        let mut expected = vec![0x17, 0x0D];
        expected.extend_from_slice(b"190304050607Z");
        assert_eq!(encode(&Asn1Value::UtcTime(time)), expected);
        let mut expected = vec![0x18, 0x0F];
        expected.extend_from_slice(b"20190304050607Z");
        assert_eq!(encode(&Asn1Value::GeneralizedTime(time)), expected);
        let late = Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap();
        assert!(Ber::encode(&Asn1Value::UtcTime(late)).is_err());
    }

    #[test]
    fn encodes_tagged_values() {
        assert_eq!(
            encode(&Asn1Value::explicit(0, Asn1Value::integer(5))),
            vec![0xA0, 0x03, 0x02, 0x01, 0x05]
        );
        assert_eq!(encode(&Asn1Value::explicit_absent(3)), vec![0xA3, 0x00]);
        assert_eq!(
            encode(&Asn1Value::Implicit(Implicit {
                class: TagClass::ContextSpecific,
                number: 1,
                content: vec![0xAA],
            })),
            vec![0x81, 0x01, 0xAA]
        );
    }

    #[test]
    fn keeps_member_order_of_non_universal_nodes() {
        let input = vec![0xB1, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x01];
        let node = Ber::decode_node(&input).unwrap();
        assert_eq!(Ber::encode_node(&node).unwrap(), input);
        let implicit_set = Node {
            class: TagClass::ContextSpecific,
            original_type: 1,
            r#type: SET,
            tag_kind: TagKind::Implicit,
            ..node
        };
        assert_eq!(
            Ber::encode_node(&implicit_set).unwrap(),
            vec![0xA1, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x05]
        );
    }

    #[test]
    fn encodes_nodes() {
        let tree = Node {
            data: NodeData::Children(vec![
                Node::tagged(0, TagKind::Explicit, Asn1Value::integer(2)),
                Node::tagged(1, TagKind::Implicit, Asn1Value::integer(5)),
                Node::tagged(
                    2,
                    TagKind::Implicit,
                    Asn1Value::Sequence(vec![Asn1Value::Null]),
                ),
                Node::absent(3),
            ]),
            ..Node::from_value(Asn1Value::Sequence(vec![]))
        };
        assert_eq!(
            Ber::encode_node(&tree).unwrap(),
            vec![
                0x30, 0x0E, 0xA0, 0x03, 0x02, 0x01, 0x02, 0x81, 0x01, 0x05, 0xA2, 0x02, 0x05,
                0x00, 0xA3, 0x00
            ]
        );
    }
}
