//! The `asnber-transcoder` library decodes and encodes the data elements
//! described in `asnber-grammar`.
//!
//! Decoding accepts BER, including indefinite lengths and constructed string
//! encodings, and produces a positioned `Node` tree or a plain `Asn1Value`.
//! Encoding always produces DER.
//! You can inject your own custom transcoder by implementing the `Decoder` and `Encoder` traits.
//!
//! ```rust
//! use asnber_grammar::{Asn1Value, ObjectIdentifier};
//! use asnber_transcoder::ber::Ber;
//!
//! let oid: ObjectIdentifier = "1.2.840.113549".parse().unwrap();
//! let encoded = Ber::encode(&Asn1Value::ObjectIdentifier(oid.clone())).unwrap();
//! assert_eq!(encoded, vec![0x06, 0x06, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]);
//! assert_eq!(Ber::decode(&encoded).unwrap(), Asn1Value::ObjectIdentifier(oid));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use alloc::{string::String, vec::Vec};
use asnber_grammar::{
    Asn1Value, BitString, CharacterString, CharacterStringType, Implicit, ObjectIdentifier,
    Tagged,
};
use chrono::{DateTime, Utc};
use error::{DecodingError, EncodingError};
use num::BigInt;

pub mod error;

#[cfg(feature = "ber")]
pub mod ber;

/// Decodes the content octets of a single primitive element.
///
/// Errors carry offsets relative to the start of `content`.
pub trait Decoder {
    fn decode_boolean(&self, content: &[u8]) -> Result<bool, DecodingError>;
    fn decode_integer(&self, content: &[u8]) -> Result<BigInt, DecodingError>;
    fn decode_null(&self, content: &[u8]) -> Result<(), DecodingError>;
    fn decode_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, DecodingError>;
    fn decode_object_identifier(&self, content: &[u8]) -> Result<ObjectIdentifier, DecodingError>;
    fn decode_bit_string(&self, content: &[u8]) -> Result<BitString, DecodingError>;
    fn decode_character_string(
        &self,
        kind: CharacterStringType,
        content: &[u8],
    ) -> Result<String, DecodingError>;
    fn decode_utc_time(&self, content: &[u8]) -> Result<DateTime<Utc>, DecodingError>;
    fn decode_generalized_time(&self, content: &[u8]) -> Result<DateTime<Utc>, DecodingError>;
}

/// Appends complete encodings (identifier, length and content) to `output`.
pub trait Encoder {
    fn encode_boolean(value: bool, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_integer(value: &BigInt, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_null(output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_octet_string(value: &[u8], output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_object_identifier(
        value: &ObjectIdentifier,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError>;
    fn encode_bit_string(value: &BitString, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_character_string(
        value: &CharacterString,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError>;
    fn encode_utc_time(value: &DateTime<Utc>, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_generalized_time(
        value: &DateTime<Utc>,
        output: Vec<u8>,
    ) -> Result<Vec<u8>, EncodingError>;
    fn encode_sequence(items: &[Asn1Value], output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_set(items: &[Asn1Value], output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_tagged(value: &Tagged, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;
    fn encode_implicit(value: &Implicit, output: Vec<u8>) -> Result<Vec<u8>, EncodingError>;

    fn encode_value(value: &Asn1Value, output: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        match value {
            Asn1Value::Null => Self::encode_null(output),
            Asn1Value::Boolean(b) => Self::encode_boolean(*b, output),
            Asn1Value::Integer(i) => Self::encode_integer(i, output),
            Asn1Value::OctetString(o) => Self::encode_octet_string(o, output),
            Asn1Value::ObjectIdentifier(oid) => Self::encode_object_identifier(oid, output),
            Asn1Value::BitString(b) => Self::encode_bit_string(b, output),
            Asn1Value::String(s) => Self::encode_character_string(s, output),
            Asn1Value::UtcTime(t) => Self::encode_utc_time(t, output),
            Asn1Value::GeneralizedTime(t) => Self::encode_generalized_time(t, output),
            Asn1Value::Sequence(items) => Self::encode_sequence(items, output),
            Asn1Value::Set(items) => Self::encode_set(items, output),
            Asn1Value::Tagged(t) => Self::encode_tagged(t, output),
            Asn1Value::Implicit(i) => Self::encode_implicit(i, output),
        }
    }
}
