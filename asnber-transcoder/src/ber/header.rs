//! Parsers and writers for identifier and length octets.
use alloc::vec::Vec;
use asnber_grammar::{Tag, TagClass, CONSTRUCTED, HIGH_TAG_NUMBER};
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    number::complete::be_u8,
    Err, IResult,
};

const INDEFINITE: u8 = 0x80;
const RESERVED_LENGTH: u8 = 0xFF;

/// Length of an element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(usize),
    /// BER only: the content runs until an end-of-contents marker.
    Indefinite,
}

/// Reads a base 128 number whose octets carry a continuation flag
/// in the most significant bit.
pub fn base128(input: &[u8]) -> IResult<&[u8], u64> {
    let mut value: u64 = 0;
    let mut rest = input;
    loop {
        let (remaining, octet) = be_u8(rest)?;
        if value.leading_zeros() < 7 {
            return Err(Err::Failure(Error::new(input, ErrorKind::TooLarge)));
        }
        value = (value << 7) | u64::from(octet & 0x7F);
        rest = remaining;
        if octet & 0x80 == 0 {
            return Ok((rest, value));
        }
    }
}

/// Reads the identifier octets of an element.
pub fn identifier(input: &[u8]) -> IResult<&[u8], Tag> {
    let (rest, leading) = be_u8(input)?;
    let class = TagClass::from_identifier_octet(leading);
    let constructed = leading & CONSTRUCTED != 0;
    if leading & HIGH_TAG_NUMBER != HIGH_TAG_NUMBER {
        return Ok((
            rest,
            Tag {
                class,
                constructed,
                number: u32::from(leading & HIGH_TAG_NUMBER),
            },
        ));
    }
    let (rest, number) = base128(rest)?;
    let number =
        u32::try_from(number).map_err(|_| Err::Failure(Error::new(input, ErrorKind::TooLarge)))?;
    Ok((
        rest,
        Tag {
            class,
            constructed,
            number,
        },
    ))
}

/// Reads the length octets of an element.
pub fn length(input: &[u8]) -> IResult<&[u8], Length> {
    let (rest, leading) = be_u8(input)?;
    match leading {
        l if l < INDEFINITE => Ok((rest, Length::Definite(usize::from(l)))),
        INDEFINITE => Ok((rest, Length::Indefinite)),
        RESERVED_LENGTH => Err(Err::Failure(Error::new(input, ErrorKind::Verify))),
        l => {
            let (rest, octets) = take(usize::from(l & 0x7F))(rest)?;
            let value = octets
                .iter()
                .try_fold(0usize, |acc, octet| {
                    acc.checked_mul(256)?.checked_add(usize::from(*octet))
                })
                .ok_or(Err::Failure(Error::new(input, ErrorKind::TooLarge)))?;
            Ok((rest, Length::Definite(value)))
        }
    }
}

/// Number of octets the DER encoding of `length` occupies.
pub fn length_size(length: usize) -> usize {
    if length < usize::from(INDEFINITE) {
        1
    } else {
        1 + significant_bytes(length)
    }
}

fn significant_bytes(value: usize) -> usize {
    (usize::BITS as usize - value.leading_zeros() as usize + 7) / 8
}

pub fn write_base128(value: u64, output: &mut Vec<u8>) {
    let groups = ((u64::BITS - value.leading_zeros()).max(1) + 6) / 7;
    for group in (0..groups).rev() {
        let septet = ((value >> (7 * group)) & 0x7F) as u8;
        if group == 0 {
            output.push(septet);
        } else {
            output.push(septet | 0x80);
        }
    }
}

pub fn write_identifier(tag: &Tag, output: &mut Vec<u8>) {
    output.push(tag.leading_octet());
    if tag.number >= u32::from(HIGH_TAG_NUMBER) {
        write_base128(u64::from(tag.number), output);
    }
}

/// Writes a definite length in its minimal form.
pub fn write_length(length: usize, output: &mut Vec<u8>) {
    if length < usize::from(INDEFINITE) {
        output.push(length as u8);
        return;
    }
    let count = significant_bytes(length);
    output.push(INDEFINITE | count as u8);
    output.extend_from_slice(&length.to_be_bytes()[core::mem::size_of::<usize>() - count..]);
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn parses_low_tag_number() {
        assert_eq!(
            identifier(&[0x30, 0x00]),
            Ok((&[0x00][..], Tag::universal(16)))
        );
        assert_eq!(
            identifier(&[0xA3]),
            Ok((&[][..], Tag::context(3, true)))
        );
    }

    #[test]
    fn parses_high_tag_number() {
        assert_eq!(
            identifier(&[0x9F, 0x81, 0x00, 0x05]),
            Ok((&[0x05][..], Tag::context(128, false)))
        );
        assert_eq!(
            identifier(&[0x5F, 0x1F]),
            Ok((
                &[][..],
                Tag {
                    class: TagClass::Application,
                    constructed: false,
                    number: 31
                }
            ))
        );
    }

    #[test]
    fn fails_on_truncated_tag() {
        assert!(identifier(&[]).is_err());
        assert!(identifier(&[0x1F, 0x81]).is_err());
        assert!(identifier(&[0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]).is_err());
    }

    #[test]
    fn parses_lengths() {
        assert_eq!(length(&[0x05]), Ok((&[][..], Length::Definite(5))));
        assert_eq!(length(&[0x80]), Ok((&[][..], Length::Indefinite)));
        assert_eq!(length(&[0x81, 0xC8]), Ok((&[][..], Length::Definite(200))));
        assert_eq!(
            length(&[0x82, 0x01, 0x00, 0xAA]),
            Ok((&[0xAA][..], Length::Definite(256)))
        );
        assert_eq!(length(&[0x82, 0x00, 0x05]), Ok((&[][..], Length::Definite(5))));
    }

    #[test]
    fn fails_on_malformed_lengths() {
        assert!(length(&[]).is_err());
        assert!(length(&[0xFF]).is_err());
        assert!(length(&[0x82, 0x01]).is_err());
        assert!(length(&[0x89, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn writes_minimal_lengths() {
        let mut output = vec![];
        write_length(0x7F, &mut output);
        write_length(0x80, &mut output);
        write_length(0x1234, &mut output);
        assert_eq!(output, vec![0x7F, 0x81, 0x80, 0x82, 0x12, 0x34]);
        assert_eq!(length_size(0x7F), 1);
        assert_eq!(length_size(0x80), 2);
        assert_eq!(length_size(0x1234), 3);
    }

    #[test]
    fn writes_identifiers() {
        let mut output = vec![];
        write_identifier(&Tag::universal(16), &mut output);
        write_identifier(&Tag::context(128, false), &mut output);
        assert_eq!(output, vec![0x30, 0x9F, 0x81, 0x00]);
    }

    #[test]
    fn writes_base128() {
        let mut output = vec![];
        write_base128(0, &mut output);
        write_base128(840, &mut output);
        write_base128(113549, &mut output);
        assert_eq!(output, vec![0x00, 0x86, 0x48, 0x86, 0xF7, 0x0D]);
        assert_eq!(base128(&[0x86, 0xF7, 0x0D]), Ok((&[][..], 113549)));
    }
}
