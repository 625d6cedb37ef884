//! The `asnber-grammar` crate describes the single elements
//! of the BER/DER data model.
//! It includes constants for the universal tag numbers
//! and types to represent decoded ASN1 data elements,
//! both as plain values (`Asn1Value`) and as positioned
//! parse trees (`Node`) produced by the transcoder.
//!
#![no_std]
extern crate alloc;

pub mod node;
pub mod tag;
pub mod types;

pub use node::{Node, NodeData};
pub use tag::{Tag, TagClass, TagKind};
pub use types::*;

// Universal tag numbers
pub const END_OF_CONTENTS: u32 = 0;
pub const BOOLEAN: u32 = 1;
pub const INTEGER: u32 = 2;
pub const BIT_STRING: u32 = 3;
pub const OCTET_STRING: u32 = 4;
pub const NULL: u32 = 5;
pub const OBJECT_IDENTIFIER: u32 = 6;
pub const UTF8_STRING: u32 = 12;
pub const SEQUENCE: u32 = 16;
pub const SET: u32 = 17;
pub const NUMERIC_STRING: u32 = 18;
pub const PRINTABLE_STRING: u32 = 19;
pub const T61_STRING: u32 = 20;
pub const VIDEOTEX_STRING: u32 = 21;
pub const IA5_STRING: u32 = 22;
pub const UTC_TIME: u32 = 23;
pub const GENERALIZED_TIME: u32 = 24;
pub const BMP_STRING: u32 = 30;

// Identifier octet bits
pub const CONSTRUCTED: u8 = 0x20;
pub const EXPLICIT_CONTEXT: u8 = 0xA0;
pub const HIGH_TAG_NUMBER: u8 = 0x1F;

/// Returns true for the universal types whose encoding is always constructed.
pub fn is_constructed_type(r#type: u32) -> bool {
    r#type == SEQUENCE || r#type == SET
}

/// Human readable name of a universal tag number, used in diagnostics.
pub fn type_name(r#type: u32) -> &'static str {
    match r#type {
        END_OF_CONTENTS => "END OF CONTENTS",
        BOOLEAN => "BOOLEAN",
        INTEGER => "INTEGER",
        BIT_STRING => "BIT STRING",
        OCTET_STRING => "OCTET STRING",
        NULL => "NULL",
        OBJECT_IDENTIFIER => "OBJECT IDENTIFIER",
        UTF8_STRING => "UTF8String",
        SEQUENCE => "SEQUENCE",
        SET => "SET",
        NUMERIC_STRING => "NumericString",
        PRINTABLE_STRING => "PrintableString",
        T61_STRING => "T61String",
        VIDEOTEX_STRING => "VideotexString",
        IA5_STRING => "IA5String",
        UTC_TIME => "UTCTime",
        GENERALIZED_TIME => "GeneralizedTime",
        BMP_STRING => "BMPString",
        _ => "unknown",
    }
}
