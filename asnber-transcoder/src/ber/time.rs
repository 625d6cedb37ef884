//! Text forms of UTCTime and GeneralizedTime.
use alloc::{format, string::String};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::{complete::one_of, is_digit},
    combinator::{all_consuming, map, map_opt, opt, value},
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::EncodingError;

const SECONDS_PER_MINUTE: i32 = 60;
const NANOS_DIGITS: usize = 9;

fn digits<'a>(count: usize) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], u32> {
    map(take_while_m_n(count, count, is_digit), |d: &[u8]| {
        d.iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    })
}

/// Offset east of UTC in seconds.
fn zone(input: &[u8]) -> IResult<&[u8], i32> {
    alt((
        value(0, tag("Z")),
        map(
            tuple((one_of("+-"), digits(2), digits(2))),
            |(sign, hours, minutes)| {
                let offset = (hours as i32 * 60 + minutes as i32) * SECONDS_PER_MINUTE;
                if sign == '-' {
                    -offset
                } else {
                    offset
                }
            },
        ),
    ))(input)
}

fn fraction(input: &[u8]) -> IResult<&[u8], u32> {
    map(
        preceded(one_of(".,"), take_while1(is_digit)),
        |d: &[u8]| {
            (0..NANOS_DIGITS).fold(0u32, |acc, i| {
                acc * 10 + d.get(i).map_or(0, |digit| u32::from(digit - b'0'))
            })
        },
    )(input)
}

#[allow(clippy::too_many_arguments)]
fn to_utc(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    offset: i32,
) -> Option<DateTime<Utc>> {
    let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(
        hour, minute, second, nanos,
    )?;
    FixedOffset::east_opt(offset)?
        .from_local_datetime(&local)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

/// `YYMMDDHHMM[SS]` followed by `Z` or a `+hhmm`/`-hhmm` offset.
/// Two digit years from 50 on belong to the 1900s.
pub fn utc_time(input: &[u8]) -> IResult<&[u8], DateTime<Utc>> {
    map_opt(
        all_consuming(tuple((
            digits(2),
            digits(2),
            digits(2),
            digits(2),
            digits(2),
            opt(digits(2)),
            zone,
        ))),
        |(yy, month, day, hour, minute, second, offset)| {
            let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
            to_utc(
                year as i32,
                month,
                day,
                hour,
                minute,
                second.unwrap_or(0),
                0,
                offset,
            )
        },
    )(input)
}

/// `YYYYMMDDHHMM[SS[.fff]]` with an optional zone, UTC if omitted.
pub fn generalized_time(input: &[u8]) -> IResult<&[u8], DateTime<Utc>> {
    map_opt(
        all_consuming(tuple((
            digits(4),
            digits(2),
            digits(2),
            digits(2),
            digits(2),
            opt(pair(digits(2), opt(fraction))),
            opt(zone),
        ))),
        |(year, month, day, hour, minute, seconds, offset)| {
            let (second, nanos) = seconds.map_or((0, 0), |(s, f)| (s, f.unwrap_or(0)));
            to_utc(
                year as i32,
                month,
                day,
                hour,
                minute,
                second,
                nanos,
                offset.unwrap_or(0),
            )
        },
    )(input)
}

pub fn format_utc_time(time: &DateTime<Utc>) -> Result<String, EncodingError> {
    if !(1950..=2049).contains(&time.year()) {
        return Err(EncodingError {
            details: format!("UTCTime cannot represent the year {}", time.year()),
        });
    }
    Ok(format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        time.year() % 100,
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    ))
}

pub fn format_generalized_time(time: &DateTime<Utc>) -> Result<String, EncodingError> {
    if !(0..=9999).contains(&time.year()) {
        return Err(EncodingError {
            details: format!("GeneralizedTime cannot represent the year {}", time.year()),
        });
    }
    let mut text = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    );
    // Leap seconds are carried in the nanoseconds by chrono.
    let nanos = time.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        text.push('.');
        text.push_str(fraction.trim_end_matches('0'));
    }
    text.push('Z');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_utc_time() {
        assert_eq!(
            utc_time(b"491231235959Z").unwrap().1,
            utc(2049, 12, 31, 23, 59, 59)
        );
        assert_eq!(
            utc_time(b"500101000000Z").unwrap().1,
            utc(1950, 1, 1, 0, 0, 0)
        );
        assert_eq!(utc_time(b"9912312359Z").unwrap().1, utc(1999, 12, 31, 23, 59, 0));
        assert_eq!(
            utc_time(b"200101120000+0130").unwrap().1,
            utc(2020, 1, 1, 10, 30, 0)
        );
        assert_eq!(
            utc_time(b"200101120000-0200").unwrap().1,
            utc(2020, 1, 1, 14, 0, 0)
        );
    }

    #[test]
    fn rejects_malformed_utc_time() {
        assert!(utc_time(b"200101120000").is_err());
        assert!(utc_time(b"201301120000Z").is_err());
        assert!(utc_time(b"2001011200Z0").is_err());
        assert!(utc_time(b"20010112000A").is_err());
    }

    #[test]
    fn parses_generalized_time() {
        assert_eq!(
            generalized_time(b"20240229120000Z").unwrap().1,
            utc(2024, 2, 29, 12, 0, 0)
        );
        assert_eq!(
            generalized_time(b"202402291200").unwrap().1,
            utc(2024, 2, 29, 12, 0, 0)
        );
        assert_eq!(
            generalized_time(b"20240229120000.25Z").unwrap().1,
            utc(2024, 2, 29, 12, 0, 0) + chrono::Duration::milliseconds(250)
        );
        assert!(generalized_time(b"20230229120000Z").is_err());
    }

    #[test]
    fn formats_times() {
        assert_eq!(
            format_utc_time(&utc(2019, 3, 4, 5, 6, 7)).unwrap(),
            "190304050607Z"
        );
        assert!(format_utc_time(&utc(2050, 1, 1, 0, 0, 0)).is_err());
        assert_eq!(
            format_generalized_time(&utc(2050, 1, 1, 0, 0, 0)).unwrap(),
            "20500101000000Z"
        );
        assert_eq!(
            format_generalized_time(
                &(utc(2050, 1, 1, 0, 0, 0) + chrono::Duration::milliseconds(120))
            )
            .unwrap(),
            "20500101000000.12Z"
        );
    }
}
