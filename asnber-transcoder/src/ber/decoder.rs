use alloc::{
    boxed::Box,
    collections::BTreeMap,
    format,
    string::String,
    vec::Vec,
};
use asnber_grammar::*;
use chrono::{DateTime, Utc};
use nom::{
    combinator::all_consuming,
    multi::many0,
    sequence::pair,
};
use num::{bigint::Sign, BigInt};
use tracing::{debug, trace};

use crate::{
    error::{DecodingError, DecodingErrorType},
    Decoder,
};

use super::{
    header::{self, base128, identifier, Length},
    input::PositionedInput,
    mapper::TypeMapper,
    options::DecoderOptions,
    time,
};

/// Position of the element being read within the tree.
/// Passed down the recursion, never stored on the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DecodeContext {
    pub depth: usize,
    pub item: usize,
}

impl DecodeContext {
    fn nested(&self) -> Self {
        DecodeContext {
            depth: self.depth + 1,
            item: 0,
        }
    }

    fn at_item(&self, item: usize) -> Self {
        DecodeContext {
            depth: self.depth,
            item,
        }
    }
}

/// Result of a decoding pass over one top-level element.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub node: Node,
    /// The consumed bytes, if `DecoderOptions::collect_bytes` is set.
    pub collected: Option<Vec<u8>>,
}

/// Configurable BER decoder.
///
/// The decoder only holds configuration, so one instance can be shared
/// and reused for any number of decoding passes.
#[derive(Default)]
pub struct BerDecoder {
    mappers: BTreeMap<usize, Box<dyn TypeMapper + Send + Sync>>,
    options: DecoderOptions,
}

impl core::fmt::Debug for BerDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BerDecoder")
            .field("mapped_depths", &self.mappers.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl BerDecoder {
    pub fn new() -> Self {
        BerDecoder::default()
    }

    /// A decoder applying the DER checks of `DecoderOptions::strict_der`.
    pub fn der() -> Self {
        BerDecoder::new().with_options(DecoderOptions::der())
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers the mapper consulted for non-universal tags at `depth`.
    /// Registering again for the same depth replaces the previous mapper.
    pub fn with_mapper<M>(mut self, depth: usize, mapper: M) -> Self
    where
        M: TypeMapper + Send + Sync + 'static,
    {
        self.mappers.insert(depth, Box::new(mapper));
        self
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes the first element of `input`. Bytes after it are ignored.
    pub fn read_contents(&self, input: &[u8]) -> Result<Node, DecodingError> {
        self.read(input).map(|decoded| decoded.node)
    }

    /// Decodes the first element of `input`, collecting the consumed
    /// bytes if configured.
    pub fn read(&self, input: &[u8]) -> Result<Decoded, DecodingError> {
        let mut input = if self.options.collect_bytes {
            PositionedInput::collecting(input)
        } else {
            PositionedInput::new(input)
        };
        let node = self.read_top_level(&mut input)?;
        Ok(Decoded {
            node,
            collected: input.into_collected(),
        })
    }

    /// Decodes the first element of `input` and returns it together
    /// with the bytes it was read from.
    pub fn read_collecting(&self, input: &[u8]) -> Result<(Node, Vec<u8>), DecodingError> {
        let mut input = PositionedInput::collecting(input);
        let node = self.read_top_level(&mut input)?;
        Ok((node, input.into_collected().unwrap_or_default()))
    }

    /// Decodes `input` as exactly one element.
    pub fn decode(&self, input: &[u8]) -> Result<Node, DecodingError> {
        let mut input = PositionedInput::new(input);
        let node = self.read_top_level(&mut input)?;
        if !input.is_empty() {
            return Err(DecodingError::new(
                &format!("{} bytes follow the top-level element", input.remaining()),
                DecodingErrorType::TrailingData,
            )
            .at(input.position()));
        }
        Ok(node)
    }

    /// Decodes a concatenation of elements.
    pub fn read_all(&self, input: &[u8]) -> Result<Vec<Node>, DecodingError> {
        let mut input = PositionedInput::new(input);
        let mut nodes = Vec::new();
        while !input.is_empty() {
            let offset = input.position();
            let context = DecodeContext::default().at_item(nodes.len());
            match self.read_element(&mut input, context)? {
                Some(node) => nodes.push(node),
                None => return Err(unexpected_end_of_contents(offset)),
            }
        }
        Ok(nodes)
    }

    /// Reads all of `reader` and decodes it as exactly one element.
    #[cfg(feature = "std")]
    pub fn read_from<R: std::io::Read>(&self, mut reader: R) -> Result<Node, DecodingError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(|e| {
            DecodingError::new(&e.to_string(), DecodingErrorType::Truncated)
        })?;
        self.decode(&buffer)
    }

    fn read_top_level(&self, input: &mut PositionedInput) -> Result<Node, DecodingError> {
        let start = input.position();
        self.read_element(input, DecodeContext::default())?
            .ok_or_else(|| unexpected_end_of_contents(start))
    }

    /// Reads one element. `None` signals an end-of-contents marker.
    fn read_element(
        &self,
        input: &mut PositionedInput,
        context: DecodeContext,
    ) -> Result<Option<Node>, DecodingError> {
        if context.depth > self.options.max_depth {
            return Err(DecodingError::new(
                &format!("nesting exceeds {} levels", self.options.max_depth),
                DecodingErrorType::GenericParsingError,
            )
            .at(input.position()));
        }
        if input.is_empty() {
            return Err(DecodingError::new(
                "input ended where an element was expected",
                DecodingErrorType::Truncated,
            )
            .at(input.position()));
        }
        let start = input.position();
        let tag = input.parse(identifier, DecodingErrorType::MalformedTag)?;
        let length = self.read_length(input)?;
        trace!(
            offset = start,
            class = ?tag.class,
            number = tag.number,
            constructed = tag.constructed,
            depth = context.depth,
            item = context.item,
            "read identifier"
        );

        if tag.is_end_of_contents() {
            return match length {
                Length::Definite(0) => Ok(None),
                _ => Err(DecodingError::new(
                    "end-of-contents marker with non-zero length",
                    DecodingErrorType::MalformedLength,
                )
                .at(start + 1)),
            };
        }

        let mut node = Node {
            original_type: tag.number,
            r#type: tag.number,
            class: tag.class,
            primitive: !tag.constructed,
            tag_kind: TagKind::Implicit,
            start,
            end: start,
            data: NodeData::Absent,
        };

        if tag.is_universal() {
            node.data = self.read_data(input, &tag, tag.number, length, context)?;
        } else {
            match self.redirect(&tag, context) {
                Some(r#type) if tag.constructed && !is_constructed_type(r#type) => {
                    debug!(
                        offset = start,
                        tag = tag.number,
                        mapped = r#type,
                        "reading explicitly tagged element"
                    );
                    node.r#type = r#type;
                    node.tag_kind = TagKind::Explicit;
                    node.data = self.read_wrapped(input, length, |this, input| {
                        let inner_offset = input.position();
                        let inner_tag = input.parse(identifier, DecodingErrorType::MalformedTag)?;
                        if !inner_tag.is_universal() || inner_tag.number != r#type {
                            if this.options.strict_der {
                                return Err(DecodingError::new(
                                    &format!(
                                        "tag [{}] wraps tag {} instead of {}",
                                        tag.number,
                                        inner_tag.number,
                                        type_name(r#type)
                                    ),
                                    DecodingErrorType::MalformedTag,
                                )
                                .at(inner_offset));
                            }
                            debug!(
                                offset = inner_offset,
                                class = ?inner_tag.class,
                                number = inner_tag.number,
                                mapped = r#type,
                                "wrapped element carries a different tag than its mapped type"
                            );
                        }
                        let inner_length = this.read_length(input)?;
                        this.read_data(input, &inner_tag, r#type, inner_length, context.nested())
                    })?;
                }
                Some(r#type) => {
                    debug!(
                        offset = start,
                        tag = tag.number,
                        mapped = r#type,
                        "reading implicitly tagged element"
                    );
                    node.r#type = r#type;
                    node.data = self.read_data(input, &tag, r#type, length, context)?;
                }
                None if self.unwraps_context_zero(&tag) => {
                    debug!(offset = start, "unwrapping context-specific [0] element");
                    let wrapped = self.read_wrapped(input, length, |this, input| {
                        let inner_start = input.position();
                        this.read_element(input, context.nested())?
                            .ok_or_else(|| unexpected_end_of_contents(inner_start))
                    })?;
                    return Ok(Some(wrapped));
                }
                None if tag.constructed => {
                    node.tag_kind = TagKind::Explicit;
                    node.data =
                        NodeData::Children(self.read_children(input, length, false, context)?);
                }
                None => {
                    let content_offset = input.position();
                    let count = definite(length, content_offset)?;
                    let content = input.take(count)?;
                    node.data = NodeData::Value(Asn1Value::Implicit(Implicit {
                        class: tag.class,
                        number: tag.number,
                        content: content.to_vec(),
                    }));
                }
            }
        }
        node.end = input.position() - 1;
        Ok(Some(node))
    }

    fn read_length(&self, input: &mut PositionedInput) -> Result<Length, DecodingError> {
        let offset = input.position();
        let length = input.parse(header::length, DecodingErrorType::MalformedLength)?;
        if self.options.strict_der {
            match length {
                Length::Indefinite => {
                    return Err(DecodingError::new(
                        "indefinite lengths are not allowed in DER",
                        DecodingErrorType::IndefiniteLength,
                    )
                    .at(offset))
                }
                Length::Definite(l) if input.position() - offset != header::length_size(l) => {
                    return Err(DecodingError::new(
                        &format!("length {l} is not encoded in its minimal form"),
                        DecodingErrorType::NonMinimalLength,
                    )
                    .at(offset))
                }
                _ => (),
            }
        }
        Ok(length)
    }

    fn redirect(&self, tag: &Tag, context: DecodeContext) -> Option<u32> {
        self.mappers
            .get(&context.depth)
            .and_then(|mapper| mapper.map_type(tag.number, context.depth, context.item))
    }

    fn unwraps_context_zero(&self, tag: &Tag) -> bool {
        self.options.unwrap_context_zero
            && self.mappers.is_empty()
            && tag.leading_octet() == EXPLICIT_CONTEXT
    }

    /// Reads the content of an element as universal `r#type`.
    /// `tag` is the identifier found on the wire.
    fn read_data(
        &self,
        input: &mut PositionedInput,
        tag: &Tag,
        r#type: u32,
        length: Length,
        context: DecodeContext,
    ) -> Result<NodeData, DecodingError> {
        let content_offset = input.position();
        if is_constructed_type(r#type) {
            if !tag.constructed {
                return Err(DecodingError::new(
                    &format!("{} must use the constructed encoding", type_name(r#type)),
                    DecodingErrorType::MalformedTag,
                )
                .at(content_offset));
            }
            return Ok(NodeData::Children(self.read_children(
                input,
                length,
                r#type == SET,
                context,
            )?));
        }
        if tag.constructed {
            if self.options.strict_der {
                return Err(DecodingError::new(
                    &format!("DER forbids the constructed encoding of {}", type_name(r#type)),
                    DecodingErrorType::MalformedTag,
                )
                .at(content_offset));
            }
            let content = self.read_segments(input, length, r#type, context)?;
            return self
                .decode_primitive(r#type, &content)
                .map(NodeData::Value)
                .map_err(|e| e.shifted(content_offset));
        }
        let count = definite(length, content_offset)?;
        let content = input.take(count)?;
        self.decode_primitive(r#type, content)
            .map(NodeData::Value)
            .map_err(|e| e.shifted(content_offset))
    }

    /// Reads the members of a constructed element.
    /// Under DER, the members of a SET must be sorted by their encodings.
    fn read_children(
        &self,
        input: &mut PositionedInput,
        length: Length,
        set: bool,
        context: DecodeContext,
    ) -> Result<Vec<Node>, DecodingError> {
        let end = frame_end(input, length)?;
        let check_order = set && self.options.strict_der;
        let mut previous: Option<&[u8]> = None;
        let mut children = Vec::new();
        loop {
            if end.map_or(false, |end| input.position() >= end) {
                break;
            }
            let child_offset = input.position();
            match self.read_element(input, context.nested().at_item(children.len()))? {
                Some(child) => {
                    if check_order {
                        let encoding = input.consumed(child_offset);
                        if previous.map_or(false, |previous| previous > encoding) {
                            return Err(DecodingError::new(
                                "SET members are not sorted by their encodings",
                                DecodingErrorType::UnsortedSet,
                            )
                            .at(child_offset));
                        }
                        previous = Some(encoding);
                    }
                    children.push(child)
                }
                None if end.is_none() => return Ok(children),
                None => return Err(unexpected_end_of_contents(child_offset)),
            }
        }
        close_frame(input, end)?;
        Ok(children)
    }

    /// Concatenates the segments of a constructed string encoding.
    fn read_segments(
        &self,
        input: &mut PositionedInput,
        length: Length,
        r#type: u32,
        context: DecodeContext,
    ) -> Result<Vec<u8>, DecodingError> {
        let mut content = Vec::new();
        self.collect_segments(input, length, r#type, context.nested(), &mut content)?;
        Ok(content)
    }

    fn collect_segments(
        &self,
        input: &mut PositionedInput,
        length: Length,
        r#type: u32,
        context: DecodeContext,
        content: &mut Vec<u8>,
    ) -> Result<(), DecodingError> {
        if context.depth > self.options.max_depth {
            return Err(DecodingError::new(
                &format!("nesting exceeds {} levels", self.options.max_depth),
                DecodingErrorType::GenericParsingError,
            )
            .at(input.position()));
        }
        let end = frame_end(input, length)?;
        loop {
            if end.map_or(false, |end| input.position() >= end) {
                break;
            }
            let segment_offset = input.position();
            let segment = input.parse(identifier, DecodingErrorType::MalformedTag)?;
            let segment_length = self.read_length(input)?;
            if segment.is_end_of_contents() {
                if end.is_none() && segment_length == Length::Definite(0) {
                    return Ok(());
                }
                return Err(unexpected_end_of_contents(segment_offset));
            }
            if !segment.is_universal() || segment.number != r#type {
                return Err(DecodingError::new(
                    &format!(
                        "segment of a constructed {} is tagged {}",
                        type_name(r#type),
                        segment.number
                    ),
                    DecodingErrorType::MalformedTag,
                )
                .at(segment_offset));
            }
            if segment.constructed {
                self.collect_segments(input, segment_length, r#type, context.nested(), content)?;
                continue;
            }
            let count = definite(segment_length, input.position())?;
            let bytes = input.take(count)?;
            if r#type == BIT_STRING {
                append_bit_string_segment(content, bytes, segment_offset)?;
            } else {
                content.extend_from_slice(bytes);
            }
        }
        close_frame(input, end)
    }

    /// Reads the single element inside a constructed wrapper
    /// and checks that it fills the wrapper.
    fn read_wrapped<T, F>(
        &self,
        input: &mut PositionedInput,
        length: Length,
        read: F,
    ) -> Result<T, DecodingError>
    where
        F: FnOnce(&Self, &mut PositionedInput) -> Result<T, DecodingError>,
    {
        let end = frame_end(input, length)?;
        let wrapped = read(self, input)?;
        match end {
            Some(_) => close_frame(input, end)?,
            None => {
                let marker_offset = input.position();
                if !input.peek_end_of_contents() {
                    return Err(DecodingError::new(
                        "a tag wrapper holds more than one element",
                        DecodingErrorType::LengthMismatch,
                    )
                    .at(marker_offset));
                }
                input.take(2)?;
            }
        }
        Ok(wrapped)
    }

    fn decode_primitive(&self, r#type: u32, content: &[u8]) -> Result<Asn1Value, DecodingError> {
        match r#type {
            BOOLEAN => self.decode_boolean(content).map(Asn1Value::Boolean),
            INTEGER => self.decode_integer(content).map(Asn1Value::Integer),
            NULL => self.decode_null(content).map(|_| Asn1Value::Null),
            OCTET_STRING => self.decode_octet_string(content).map(Asn1Value::OctetString),
            OBJECT_IDENTIFIER => self
                .decode_object_identifier(content)
                .map(Asn1Value::ObjectIdentifier),
            BIT_STRING => self.decode_bit_string(content).map(Asn1Value::BitString),
            UTC_TIME => self.decode_utc_time(content).map(Asn1Value::UtcTime),
            GENERALIZED_TIME => self
                .decode_generalized_time(content)
                .map(Asn1Value::GeneralizedTime),
            other => match CharacterStringType::from_tag(other) {
                Some(kind) => self
                    .decode_character_string(kind, content)
                    .map(|value| Asn1Value::String(CharacterString { kind, value })),
                None => Err(DecodingError::new(
                    &format!("no decoder for type {other} ({})", type_name(other)),
                    DecodingErrorType::UnknownType(other),
                )),
            },
        }
    }
}

impl Decoder for BerDecoder {
    fn decode_boolean(&self, content: &[u8]) -> Result<bool, DecodingError> {
        match content {
            [0x00] => Ok(false),
            [0xFF] => Ok(true),
            [other] if !self.options.strict_der => Ok(*other != 0),
            [other] => Err(DecodingError::new(
                &format!("DER requires 0x00 or 0xFF as BOOLEAN, found {other:#04x}"),
                DecodingErrorType::MalformedBoolean,
            )),
            _ => Err(DecodingError::new(
                &format!("BOOLEAN needs exactly 1 content byte, found {}", content.len()),
                DecodingErrorType::MalformedBoolean,
            )),
        }
    }

    fn decode_integer(&self, content: &[u8]) -> Result<BigInt, DecodingError> {
        match content {
            [] => Err(DecodingError::new(
                "INTEGER without content",
                DecodingErrorType::MalformedInteger,
            )),
            [0x00, next, ..] | [0xFF, next, ..]
                if self.options.strict_der && (content[0] & 0x80) == (next & 0x80) =>
            {
                Err(DecodingError::new(
                    "INTEGER is not encoded in its minimal form",
                    DecodingErrorType::MalformedInteger,
                ))
            }
            _ if self.options.unsigned_integers => Ok(BigInt::from_bytes_be(Sign::Plus, content)),
            _ => Ok(BigInt::from_signed_bytes_be(content)),
        }
    }

    fn decode_null(&self, content: &[u8]) -> Result<(), DecodingError> {
        if content.is_empty() {
            Ok(())
        } else {
            Err(DecodingError::new(
                &format!("NULL must be empty, found {} content bytes", content.len()),
                DecodingErrorType::MalformedNull,
            ))
        }
    }

    fn decode_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, DecodingError> {
        Ok(content.to_vec())
    }

    fn decode_object_identifier(
        &self,
        content: &[u8],
    ) -> Result<ObjectIdentifier, DecodingError> {
        let (_, (first, rest)) = all_consuming(pair(base128, many0(base128)))(content)
            .map_err(|e| {
                DecodingError::from(e)
                    .with_kind(DecodingErrorType::MalformedObjectIdentifier)
            })?;
        let mut arcs = match first {
            f if f < 40 => alloc::vec![0, f],
            f if f < 80 => alloc::vec![1, f - 40],
            f => alloc::vec![2, f - 80],
        };
        arcs.extend(rest);
        ObjectIdentifier::new(arcs).map_err(|e| {
            DecodingError::new(&e.details, DecodingErrorType::MalformedObjectIdentifier)
        })
    }

    fn decode_bit_string(&self, content: &[u8]) -> Result<BitString, DecodingError> {
        let (unused_bits, data) = content.split_first().ok_or_else(|| {
            DecodingError::new(
                "BIT STRING without unused bits octet",
                DecodingErrorType::MalformedBitString,
            )
        })?;
        let bit_string = BitString::new(data.to_vec(), *unused_bits).map_err(|e| {
            DecodingError::new(&e.details, DecodingErrorType::MalformedBitString)
        })?;
        match bit_string.data().last() {
            Some(last) if self.options.strict_der && last & !(0xFF << *unused_bits) != 0 => {
                Err(DecodingError::new(
                    "DER requires the unused bits of a BIT STRING to be zero",
                    DecodingErrorType::MalformedBitString,
                )
                .at(content.len() - 1))
            }
            _ => Ok(bit_string),
        }
    }

    fn decode_character_string(
        &self,
        kind: CharacterStringType,
        content: &[u8],
    ) -> Result<String, DecodingError> {
        if kind.is_single_byte() {
            return Ok(latin1(content));
        }
        match kind {
            CharacterStringType::UTF8String => core::str::from_utf8(content)
                .map(String::from)
                .map_err(|e| {
                    DecodingError::new(
                        "UTF8String is not valid UTF-8",
                        DecodingErrorType::MalformedString,
                    )
                    .at(e.valid_up_to())
                }),
            _ => {
                if content.len() % 2 != 0 {
                    return Err(DecodingError::new(
                        &format!("BMPString of odd length {}", content.len()),
                        DecodingErrorType::MalformedString,
                    ));
                }
                char::decode_utf16(
                    content
                        .chunks_exact(2)
                        .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
                )
                .collect::<Result<String, _>>()
                .map_err(|e| {
                    DecodingError::new(
                        &format!("BMPString holds unpaired surrogate {:#06x}", e.unpaired_surrogate()),
                        DecodingErrorType::MalformedString,
                    )
                })
            }
        }
    }

    fn decode_utc_time(&self, content: &[u8]) -> Result<DateTime<Utc>, DecodingError> {
        time::utc_time(content).map(|(_, t)| t).map_err(|_| {
            DecodingError::new(
                &format!("'{}' is not a UTCTime", latin1(content)),
                DecodingErrorType::MalformedTime,
            )
        })
    }

    fn decode_generalized_time(&self, content: &[u8]) -> Result<DateTime<Utc>, DecodingError> {
        time::generalized_time(content)
            .map(|(_, t)| t)
            .map_err(|_| {
                DecodingError::new(
                    &format!("'{}' is not a GeneralizedTime", latin1(content)),
                    DecodingErrorType::MalformedTime,
                )
            })
    }
}

fn latin1(content: &[u8]) -> String {
    content.iter().map(|b| char::from(*b)).collect()
}

fn definite(length: Length, offset: usize) -> Result<usize, DecodingError> {
    match length {
        Length::Definite(l) => Ok(l),
        Length::Indefinite => Err(DecodingError::new(
            "primitive encodings need a definite length",
            DecodingErrorType::IndefiniteLength,
        )
        .at(offset)),
    }
}

/// Offset right after a definite length frame, `None` for indefinite lengths.
fn frame_end(input: &PositionedInput, length: Length) -> Result<Option<usize>, DecodingError> {
    match length {
        Length::Indefinite => Ok(None),
        Length::Definite(l) if l > input.remaining() => Err(DecodingError::new(
            &format!(
                "element declares {l} content bytes, but only {} remain",
                input.remaining()
            ),
            DecodingErrorType::Truncated,
        )
        .at(input.position())),
        Length::Definite(l) => Ok(Some(input.position() + l)),
    }
}

fn close_frame(input: &PositionedInput, end: Option<usize>) -> Result<(), DecodingError> {
    match end {
        Some(end) if input.position() != end => Err(DecodingError::new(
            &format!(
                "members end at byte {}, but the declared length ends at byte {end}",
                input.position()
            ),
            DecodingErrorType::LengthMismatch,
        )
        .at(input.position())),
        _ => Ok(()),
    }
}

fn unexpected_end_of_contents(offset: usize) -> DecodingError {
    DecodingError::new(
        "end-of-contents marker outside an indefinite length element",
        DecodingErrorType::UnexpectedEndOfContents,
    )
    .at(offset)
}

/// Every segment of a constructed BIT STRING starts with its own unused bits
/// octet; only the final segment may leave bits unused.
fn append_bit_string_segment(
    content: &mut Vec<u8>,
    segment: &[u8],
    offset: usize,
) -> Result<(), DecodingError> {
    let (unused_bits, data) = segment.split_first().ok_or_else(|| {
        DecodingError::new(
            "BIT STRING segment without unused bits octet",
            DecodingErrorType::MalformedBitString,
        )
        .at(offset)
    })?;
    match content.first().copied() {
        None => content.push(*unused_bits),
        Some(0) => content[0] = *unused_bits,
        Some(_) => {
            return Err(DecodingError::new(
                "only the final BIT STRING segment may have unused bits",
                DecodingErrorType::MalformedBitString,
            )
            .at(offset))
        }
    }
    content.extend_from_slice(data);
    Ok(())
}
