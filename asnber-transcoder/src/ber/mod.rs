//! BER decoding and DER encoding.
use alloc::vec::Vec;
use asnber_grammar::{Asn1Value, Node};

use crate::{
    error::{DecodingError, EncodingError},
    Encoder,
};

mod decoder;
mod encoder;
pub mod header;
mod input;
mod mapper;
mod options;
pub mod time;

pub use decoder::{BerDecoder, Decoded};
pub use encoder::content_octets;
pub use header::Length;
pub use input::PositionedInput;
pub use mapper::{TagTable, TypeMapper};
pub use options::{DecoderOptions, DEFAULT_MAX_DEPTH};

/// One-shot entry points with default decoder settings.
///
/// Use a `BerDecoder` to register type mappers or change options.
pub struct Ber;

impl Ber {
    /// Decodes `input` as exactly one element.
    pub fn decode(input: &[u8]) -> Result<Asn1Value, DecodingError> {
        Ber::decode_node(input).map(Node::into_value)
    }

    pub fn decode_node(input: &[u8]) -> Result<Node, DecodingError> {
        BerDecoder::new().decode(input)
    }

    /// Encodes `value` in DER.
    pub fn encode(value: &Asn1Value) -> Result<Vec<u8>, EncodingError> {
        <Ber as Encoder>::encode_value(value, Vec::new())
    }
}
