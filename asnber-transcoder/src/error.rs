use alloc::{format, string::String};
use core::fmt::{Display, Formatter, Result};

use asnber_grammar::GrammarError;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodingError {
    pub details: String,
    pub kind: DecodingErrorType,
    /// Byte offset in the decoded input at which the failing read started.
    pub offset: usize,
}

impl DecodingError {
    pub fn new(details: &str, kind: DecodingErrorType) -> Self {
        DecodingError {
            details: details.into(),
            kind,
            offset: 0,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_kind(mut self, kind: DecodingErrorType) -> Self {
        self.kind = kind;
        self
    }

    /// Rebases an error raised on a content slice onto the offset
    /// of that slice in the decoded input.
    pub fn shifted(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingErrorType {
    Truncated,
    MalformedTag,
    MalformedLength,
    MalformedBoolean,
    MalformedNull,
    MalformedInteger,
    MalformedObjectIdentifier,
    MalformedBitString,
    MalformedString,
    MalformedTime,
    LengthMismatch,
    UnknownType(u32),
    UnexpectedEndOfContents,
    IndefiniteLength,
    NonMinimalLength,
    UnsortedSet,
    TrailingData,
    GenericParsingError,
}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {}

impl From<nom::Err<nom::error::Error<&[u8]>>> for DecodingError {
    fn from(value: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        DecodingError {
            details: format!("{:?}", value.map(|e| e.code)),
            kind: DecodingErrorType::GenericParsingError,
            offset: 0,
        }
    }
}

impl Display for DecodingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{:?} decoding BER encoding at byte {}: {}",
            self.kind, self.offset, self.details
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodingError {
    pub details: String,
}

impl EncodingError {
    pub fn new(details: &str) -> Self {
        EncodingError {
            details: details.into(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}

impl From<GrammarError> for EncodingError {
    fn from(value: GrammarError) -> Self {
        EncodingError {
            details: value.details,
        }
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "Error encoding DER: {}", self.details)
    }
}
