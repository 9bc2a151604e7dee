//! # Unquoted Literal Grammar
//!
//! Classifies a bare token the way NEON does for unquoted scalars:
//!
//! 1. `true`/`yes`/`on` and `false`/`no`/`off` (lower, Title, UPPER) → boolean
//! 2. `null` (same casings) or an empty token → null
//! 3. decimal integers and floats (`42`, `-1.5`, `.5`, `1e3`), plus `0x`, `0o`
//!    and `0b` prefixed integers → number
//! 4. `YYYY-MM-DD` optionally followed by a time and a zone → date/time object
//! 5. anything else → string, verbatim
//!
//! The same grammar is used by the decoder for every unquoted token and by
//! the rule parser for the literal at the end of a value rule.

use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;

use crate::value::{DateTime, Object, Scalar, Value};

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("decimal pattern is valid")
});

static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:(?:[Tt]| +)(\d{1,2}):(\d{2}):(\d{2})(?:\.(\d*))? *(Z|[-+]\d{1,2}(?::?\d{2})?)?)?$",
    )
    .expect("datetime pattern is valid")
});

/// Decode a single unquoted token.
pub fn parse_literal(raw: &str) -> Value {
    match raw {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return Value::Scalar(Scalar::Bool(true));
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return Value::Scalar(Scalar::Bool(false));
        }
        "" | "null" | "Null" | "NULL" => return Value::Scalar(Scalar::Null),
        _ => {}
    }

    if let Some(number) = parse_number(raw) {
        return Value::Scalar(number);
    }

    if let Some(dt) = parse_datetime(raw) {
        return Value::Object(Object::DateTime(dt));
    }

    Value::string(raw)
}

/// Numeric literal, or `None` if the token is not one.
fn parse_number(raw: &str) -> Option<Scalar> {
    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find(|(prefix, _)| raw.starts_with(prefix));
    if let Some((prefix, radix)) = radix {
        let digits = &raw[prefix.len()..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return i64::from_str_radix(digits, radix).ok().map(Scalar::Int);
    }

    if !DECIMAL.is_match(raw) {
        return None;
    }

    let is_float = raw.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Scalar::Int(n));
        }
    }
    // Fractional, exponent, or an integer wider than i64.
    raw.parse::<f64>().ok().map(Scalar::Float)
}

/// Date or date-time literal, or `None` if the token is not a valid one.
fn parse_datetime(raw: &str) -> Option<DateTime> {
    let caps = DATETIME.captures(raw)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;

    let time = match caps.get(4) {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(_) => {
            let nanos = caps.get(7).map_or(0, |m| fraction_to_nanos(m.as_str()));
            NaiveTime::from_hms_nano_opt(num(4)?, num(5)?, num(6)?, nanos)?
        }
    };

    let offset = match caps.get(8) {
        None => None,
        Some(m) => Some(parse_offset(m.as_str())?),
    };

    Some(DateTime::new(date.and_time(time), offset))
}

fn fraction_to_nanos(digits: &str) -> u32 {
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

/// `Z`, `+H`, `+HH`, `+HHMM` or `+HH:MM`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let body: String = raw[1..].chars().filter(|c| *c != ':').collect();
    let (hours, minutes) = match body.len() {
        1 | 2 => (body.parse::<i32>().ok()?, 0),
        3 | 4 => {
            let split = body.len() - 2;
            (body[..split].parse::<i32>().ok()?, body[split..].parse::<i32>().ok()?)
        }
        _ => return None,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_literals() {
        for raw in ["true", "True", "TRUE", "yes", "Yes", "YES", "on", "On", "ON"] {
            assert_eq!(parse_literal(raw), Value::from(true), "{raw}");
        }
        for raw in ["false", "False", "FALSE", "no", "No", "NO", "off", "Off", "OFF"] {
            assert_eq!(parse_literal(raw), Value::from(false), "{raw}");
        }
    }

    #[test]
    fn mixed_case_booleans_stay_strings() {
        assert_eq!(parse_literal("yEs"), Value::string("yEs"));
        assert_eq!(parse_literal("tRUE"), Value::string("tRUE"));
    }

    #[test]
    fn null_literals() {
        assert_eq!(parse_literal("null"), Value::null());
        assert_eq!(parse_literal("NULL"), Value::null());
        assert_eq!(parse_literal(""), Value::null());
    }

    #[test]
    fn integers() {
        assert_eq!(parse_literal("42"), Value::from(42));
        assert_eq!(parse_literal("-7"), Value::from(-7));
        assert_eq!(parse_literal("+3"), Value::from(3));
        assert_eq!(parse_literal("0x1F"), Value::from(31));
        assert_eq!(parse_literal("0o17"), Value::from(15));
        assert_eq!(parse_literal("0b101"), Value::from(5));
    }

    #[test]
    fn floats() {
        assert_eq!(parse_literal("1.5"), Value::from(1.5));
        assert_eq!(parse_literal(".5"), Value::from(0.5));
        assert_eq!(parse_literal("1e3"), Value::from(1000.0));
        assert_eq!(parse_literal("2."), Value::from(2.0));
    }

    #[test]
    fn integer_overflow_becomes_float() {
        assert_eq!(
            parse_literal("99999999999999999999"),
            Value::from(99_999_999_999_999_999_999.0)
        );
    }

    #[test]
    fn near_numbers_are_strings() {
        assert_eq!(parse_literal("1.2.3"), Value::string("1.2.3"));
        assert_eq!(parse_literal("0xZZ"), Value::string("0xZZ"));
        assert_eq!(parse_literal("12abc"), Value::string("12abc"));
    }

    #[test]
    fn date_only() {
        let Value::Object(Object::DateTime(dt)) = parse_literal("2024-02-29") else {
            panic!("expected datetime");
        };
        assert_eq!(dt.to_string(), "2024-02-29 00:00:00");
        assert!(dt.offset().is_none());
    }

    #[test]
    fn datetime_with_zone() {
        let Value::Object(Object::DateTime(dt)) = parse_literal("2024-01-15 12:30:00 +01:00")
        else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset(), FixedOffset::east_opt(3600));
        assert_eq!(dt.to_string(), "2024-01-15 12:30:00 +01:00");
    }

    #[test]
    fn datetime_with_t_separator_and_z() {
        let Value::Object(Object::DateTime(dt)) = parse_literal("2024-01-15T12:30:00.5Z") else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset(), FixedOffset::east_opt(0));
        assert_eq!(dt.naive().and_utc().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn invalid_calendar_date_is_string() {
        assert_eq!(parse_literal("2024-13-45"), Value::string("2024-13-45"));
    }

    #[test]
    fn plain_strings() {
        assert_eq!(parse_literal("foo"), Value::string("foo"));
        assert_eq!(parse_literal("foo bar"), Value::string("foo bar"));
        assert_eq!(parse_literal("http://x"), Value::string("http://x"));
    }
}
