use alloc::{format, vec::Vec};
use nom::IResult;

use crate::error::{DecodingError, DecodingErrorType};

/// Forward-only view on the decoded bytes that tracks the offset
/// of everything it hands out.
///
/// When collecting, every consumed byte is also copied into
/// an internal buffer that the caller can claim after decoding.
#[derive(Debug)]
pub struct PositionedInput<'a> {
    source: &'a [u8],
    rest: &'a [u8],
    position: usize,
    collected: Option<Vec<u8>>,
}

impl<'a> PositionedInput<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        PositionedInput {
            source: input,
            rest: input,
            position: 0,
            collected: None,
        }
    }

    pub fn collecting(input: &'a [u8]) -> Self {
        PositionedInput {
            source: input,
            rest: input,
            position: 0,
            collected: Some(Vec::with_capacity(input.len())),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Bytes consumed from offset `from` up to the current position.
    pub fn consumed(&self, from: usize) -> &'a [u8] {
        self.source.get(from..self.position).unwrap_or_default()
    }

    /// Applies a nom parser to the remaining input.
    /// A failure is reported as `kind` at the current offset.
    pub fn parse<O, P>(&mut self, mut parser: P, kind: DecodingErrorType) -> Result<O, DecodingError>
    where
        P: FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    {
        match parser(self.rest) {
            Ok((rest, output)) => {
                self.advance_to(rest);
                Ok(output)
            }
            Err(e) => Err(DecodingError::from(e).with_kind(kind).at(self.position)),
        }
    }

    /// Consumes exactly `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8], DecodingError> {
        if count > self.rest.len() {
            return Err(DecodingError::new(
                &format!(
                    "element needs {count} bytes, but only {} remain",
                    self.rest.len()
                ),
                DecodingErrorType::Truncated,
            )
            .at(self.position));
        }
        let (taken, rest) = self.rest.split_at(count);
        self.advance_to(rest);
        Ok(taken)
    }

    /// Checks for an end-of-contents marker without consuming it.
    pub fn peek_end_of_contents(&self) -> bool {
        self.rest.starts_with(&[0x00, 0x00])
    }

    pub fn into_collected(self) -> Option<Vec<u8>> {
        self.collected
    }

    fn advance_to(&mut self, rest: &'a [u8]) {
        let consumed = self.rest.len() - rest.len();
        if let Some(collected) = self.collected.as_mut() {
            collected.extend_from_slice(&self.rest[..consumed]);
        }
        self.position += consumed;
        self.rest = rest;
    }
}
