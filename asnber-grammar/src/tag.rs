use crate::{CONSTRUCTED, HIGH_TAG_NUMBER};

/// Tag classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    /// Reads the class from the top two bits of an identifier octet.
    pub fn from_identifier_octet(octet: u8) -> Self {
        match octet >> 6 {
            0b00 => TagClass::Universal,
            0b01 => TagClass::Application,
            0b10 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// The class bits as they appear in an identifier octet.
    pub fn bits(&self) -> u8 {
        match self {
            TagClass::Universal => 0b0000_0000,
            TagClass::Application => 0b0100_0000,
            TagClass::ContextSpecific => 0b1000_0000,
            TagClass::Private => 0b1100_0000,
        }
    }
}

/// Tagging mode of a non-universal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Implicit,
    Explicit,
}

impl Default for TagKind {
    fn default() -> Self {
        TagKind::Implicit
    }
}

/// Representation of a decoded identifier:
/// class, primitive/constructed flag and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    pub fn universal(number: u32) -> Self {
        Tag {
            class: TagClass::Universal,
            constructed: crate::is_constructed_type(number),
            number,
        }
    }

    pub fn context(number: u32, constructed: bool) -> Self {
        Tag {
            class: TagClass::ContextSpecific,
            constructed,
            number,
        }
    }

    pub fn is_universal(&self) -> bool {
        self.class == TagClass::Universal
    }

    /// The end-of-contents marker that closes an indefinite length encoding.
    pub fn is_end_of_contents(&self) -> bool {
        self.is_universal() && !self.constructed && self.number == crate::END_OF_CONTENTS
    }

    /// First identifier octet. Tag numbers above 30 only carry the
    /// high-tag-number marker here, the number follows in base 128.
    pub fn leading_octet(&self) -> u8 {
        let constructed = if self.constructed { CONSTRUCTED } else { 0 };
        let number = if self.number < HIGH_TAG_NUMBER as u32 {
            self.number as u8
        } else {
            HIGH_TAG_NUMBER
        };
        self.class.bits() | constructed | number
    }
}
