//! Coercion and comparison primitives shared by the rule checks.
//!
//! Rules operate on a loosely typed value model; these helpers pin down the
//! exact coercions (string→int round-trip, string→number round-trip, number→
//! decimal string) so every check classifies non-conforming types as failures
//! instead of faulting.

use crate::types::Value;
use regex::Regex;
use std::sync::LazyLock;
use time::{Date, Month, OffsetDateTime};

static DATE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}-\d{1,2}-\d{1,2}$").unwrap());

/// Decimal string form of a number. Integral values render without a
/// fractional part (`222.0` → `"222"`).
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}

/// True for mathematical integers and for strings whose round-trip through
/// `i64` parsing reproduces the string exactly (`"465"` yes, `"0e5"` no,
/// `"+5"` no).
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_finite() && n.fract() == 0.0,
        Value::String(s) => s
            .parse::<i64>()
            .map(|n| n.to_string() == *s)
            .unwrap_or(false),
        _ => false,
    }
}

/// True for non-NaN numbers and for strings whose round-trip through `f64`
/// parsing reproduces the string exactly (`"25.5"` yes, `"0xFFF"` no).
pub fn is_number(value: &Value) -> bool {
    match value {
        Value::Number(n) => !n.is_nan(),
        Value::String(s) => s
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(|n| format_number(n) == *s)
            .unwrap_or(false),
        _ => false,
    }
}

/// Coerces scalars to their string form for string-shaped checks. Numbers use
/// decimal formatting, booleans become `"true"`/`"false"`. Null, dates,
/// arrays, and objects do not coerce.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Length for `length`/`maxlength`/`minlength`: character count for strings,
/// decimal-string length for numbers, element count for arrays. Other shapes
/// have no length and fail the bound.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Number(n) => Some(format_number(*n).chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Null, absent, or the empty string. This is what `required` and the
/// conditionally-required rules treat as missing.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Truthiness for `required_with`: null is false, zero and NaN are false,
/// the empty string is false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Date(_) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loose equality between a value and a raw rule parameter, for
/// `required_if`. Strings compare textually; numbers compare numerically
/// against the parsed parameter; booleans compare as 0/1.
pub fn loose_eq(value: &Value, param: &str) -> bool {
    match value {
        Value::String(s) => s == param,
        Value::Number(n) => param
            .trim()
            .parse::<f64>()
            .map(|p| p == *n)
            .unwrap_or(false),
        Value::Bool(b) => param
            .trim()
            .parse::<f64>()
            .map(|p| p == if *b { 1.0 } else { 0.0 })
            .unwrap_or(false),
        _ => false,
    }
}

/// Parses a `YYYY-M(M)-D(D)` string into a calendar date. The shape check and
/// the calendar check are both required: `"2017-13-01"` has the shape but is
/// not a date.
pub fn parse_date(s: &str) -> Option<Date> {
    if !DATE_SHAPE_RE.is_match(s) {
        return None;
    }
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// The calendar date carried by a value: a `Date` directly, or a string in
/// date shape.
pub fn date_value(value: &Value) -> Option<Date> {
    match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

/// ISO `YYYY-MM-DD` rendering for date bounds in messages.
pub fn fmt_date(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

/// Today's UTC date; the midnight-normalized `now` bound for `date` rules.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
