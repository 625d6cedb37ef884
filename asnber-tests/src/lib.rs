//! Shared fixtures for the integration tests and benches.
use asnber_grammar::*;
use chrono::{DateTime, Utc};

/// Reads a string of hex digit pairs, ignoring whitespace.
pub fn hex(s: &str) -> Vec<u8> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(u8::is_ascii_hexdigit)
        .map(|d| match d {
            b'0'..=b'9' => d - b'0',
            b'a'..=b'f' => d - b'a' + 10,
            _ => d - b'A' + 10,
        })
        .collect();
    digits.chunks(2).map(|pair| pair[0] << 4 | pair.get(1).copied().unwrap_or(0)).collect()
}

fn oid(arcs: &[u64]) -> Asn1Value {
    match ObjectIdentifier::try_from(arcs) {
        Ok(oid) => Asn1Value::ObjectIdentifier(oid),
        Err(e) => panic!("fixture OID {arcs:?} is invalid: {e}"),
    }
}

fn algorithm(arcs: &[u64]) -> Asn1Value {
    Asn1Value::Sequence(vec![oid(arcs), Asn1Value::Null])
}

fn name(common_name: &str) -> Asn1Value {
    Asn1Value::Sequence(vec![Asn1Value::Set(vec![Asn1Value::Sequence(vec![
        oid(&[2, 5, 4, 3]),
        Asn1Value::string(CharacterStringType::PrintableString, common_name),
    ])])])
}

/// A value shaped like an X.509 certificate: nested sequences, sets,
/// explicit `[0]` and `[3]` wrappers, times, bit strings and OIDs.
pub fn certificate_like(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Asn1Value {
    let sha256_with_rsa = [1, 2, 840, 113549, 1, 1, 11];
    let public_key = BitString::new(
        (0..=255u8).cycle().take(270).collect(),
        0,
    )
    .unwrap_or_default();
    let tbs = Asn1Value::Sequence(vec![
        Asn1Value::explicit(0, Asn1Value::integer(2)),
        Asn1Value::integer(0x0123_4567_89AB_CDEFu64),
        algorithm(&sha256_with_rsa),
        name("Example CA"),
        Asn1Value::Sequence(vec![
            Asn1Value::UtcTime(not_before),
            Asn1Value::GeneralizedTime(not_after),
        ]),
        name("example.org"),
        Asn1Value::Sequence(vec![
            algorithm(&[1, 2, 840, 113549, 1, 1, 1]),
            Asn1Value::BitString(public_key),
        ]),
        Asn1Value::explicit(
            3,
            Asn1Value::Sequence(vec![Asn1Value::Sequence(vec![
                oid(&[2, 5, 29, 19]),
                Asn1Value::Boolean(true),
                Asn1Value::OctetString(vec![0x30, 0x03, 0x01, 0x01, 0xFF]),
            ])]),
        ),
    ]);
    let signature = BitString::new(vec![0x5A; 256], 0).unwrap_or_default();
    Asn1Value::Sequence(vec![
        tbs,
        algorithm(&sha256_with_rsa),
        Asn1Value::BitString(signature),
    ])
}

/// Resolves `version [0] EXPLICIT INTEGER`, the first member of the
/// tbs part of `certificate_like`. Register it at depth 2.
pub fn version_mapper(tag: u32, _depth: usize, item: usize) -> Option<u32> {
    (tag == 0 && item == 0).then_some(INTEGER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_hex() {
        assert_eq!(hex("06 06 2a 86 48 86 F7 0D"), vec![0x06, 0x06, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]);
        assert_eq!(hex(""), Vec::<u8>::new());
    }
}
