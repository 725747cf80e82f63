//! Built-in argument value types.
//!
//! An [`ArgumentType`] turns one raw token into a typed [`Value`] or a
//! [`ParseError`]. The built-ins (`STRING`, `NUMBER`, `INTEGER`,
//! `BOOLEAN`, `DATE`) are zero-sized constants; [`choice`] builds a
//! closed set of accepted strings. Implement [`ArgumentType`] yourself
//! for anything else (see the example binary's EMAIL type).

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;

/// A parser that can read a single argument value.
///
/// Implement this trait to provide parsers for custom argument types.
/// Implementations must be `Send + Sync` so built specifications can
/// be parsed concurrently.
pub trait ArgumentType: Send + Sync {
    /// Parse a single raw token. Never panics; every rejection is a
    /// [`ParseError`] with a human-readable message.
    fn parse(&self, raw: &str) -> Result<Value, ParseError>;

    /// Type name shown in help and error messages, uppercase by
    /// convention.
    fn type_name(&self) -> &str;
}

/// A typed, parsed argument value.
///
/// `None` is the explicit absent marker for optional arguments that
/// were not supplied; argument-type parsers never return it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Date(DateTime<Local>),
    None,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Local>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this is the absent marker.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Accepts any token unchanged.
#[derive(Debug, Clone, Copy)]
pub struct StringType;

impl ArgumentType for StringType {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        Ok(Value::Str(raw.to_string()))
    }

    fn type_name(&self) -> &str {
        "STRING"
    }
}

/// The identity type: returns the raw token as a string.
pub const STRING: StringType = StringType;

/// Accepts finite floating-point literals, including hex/octal/binary
/// radix literals. NaN and infinities are rejected.
#[derive(Debug, Clone, Copy)]
pub struct NumberType;

impl ArgumentType for NumberType {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return Err(ParseError::NotANumber(raw.to_string()));
        }
        // Radix literals carry no sign.
        for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if let Some(digits) = value.strip_prefix(prefix) {
                return u64::from_str_radix(digits, radix)
                    .map(|n| Value::Number(n as f64))
                    .map_err(|_| ParseError::NotANumber(raw.to_string()));
            }
        }
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(ParseError::NotANumber(raw.to_string())),
        }
    }

    fn type_name(&self) -> &str {
        "NUMBER"
    }
}

/// Parses the token as a finite number.
pub const NUMBER: NumberType = NumberType;

/// Accepts an optional sign followed by decimal digits only.
#[derive(Debug, Clone, Copy)]
pub struct IntegerType;

impl ArgumentType for IntegerType {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let value = raw.trim();
        let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::NotAnInteger(raw.to_string()));
        }
        // `-0` parses to plain 0 here.
        value
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseError::NotAnInteger(raw.to_string()))
    }

    fn type_name(&self) -> &str {
        "INTEGER"
    }
}

/// Parses the token as a signed integer.
pub const INTEGER: IntegerType = IntegerType;

const TRUTHY: [&str; 4] = ["yes", "true", "y", "1"];
const FALSEY: [&str; 4] = ["no", "false", "n", "0"];

/// Accepts case-insensitive `yes`/`no`, `true`/`false`, `y`/`n`,
/// `1`/`0`.
#[derive(Debug, Clone, Copy)]
pub struct BooleanType;

impl ArgumentType for BooleanType {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let value = raw.trim().to_lowercase();
        if TRUTHY.contains(&value.as_str()) {
            Ok(Value::Bool(true))
        } else if FALSEY.contains(&value.as_str()) {
            Ok(Value::Bool(false))
        } else {
            Err(ParseError::NotABoolean(raw.to_string()))
        }
    }

    fn type_name(&self) -> &str {
        "BOOLEAN"
    }
}

/// Parses the token as a boolean.
pub const BOOLEAN: BooleanType = BooleanType;

static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    // Input is lowercased before matching.
    Regex::new(r"^\d{4}-\d\d-\d\dt\d\d:\d\d:\d\d(\.\d+)?(([+-]\d\d:\d\d)|z)?$")
        .expect("static ISO-8601 pattern")
});

static LOCAL_DATE_FORMATS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let separators = ["-", r"\.", " ", "/"];
    let mut formats = Vec::with_capacity(8);
    for sep in separators {
        formats.push(
            Regex::new(&format!(
                r"^(?P<year>\d{{4}}){sep}(?P<month>\d\d?){sep}(?P<day>\d\d?)(\s+(?P<hours>\d\d?):(?P<minutes>\d\d)(:(?P<seconds>\d\d))?)?$"
            ))
            .expect("static local date pattern"),
        );
    }
    for sep in separators {
        formats.push(
            Regex::new(&format!(
                r"^(?P<hours>\d\d?):(?P<minutes>\d\d)(:(?P<seconds>\d\d))?\s+(?P<year>\d{{4}}){sep}(?P<month>\d\d?){sep}(?P<day>\d\d?)$"
            ))
            .expect("static local date pattern"),
        );
    }
    formats
});

fn capture_u32(caps: &regex::Captures<'_>, name: &str, default: u32) -> Option<u32> {
    match caps.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

/// Accepts `now`, `today`, strict ISO-8601 timestamps, and a set of
/// local date formats (`2021-7-9`, `2021/07/09 8:30`, `8:30 2021.7.9`,
/// ...). Local formats are range-validated; calendar-invalid dates
/// such as February 30th are rejected.
#[derive(Debug, Clone, Copy)]
pub struct DateType;

impl DateType {
    fn parse_iso(trimmed: &str) -> Option<DateTime<Local>> {
        let upper = trimmed.to_ascii_uppercase();
        if let Ok(dt) = DateTime::parse_from_rfc3339(&upper) {
            return Some(dt.with_timezone(&Local));
        }
        // No offset: interpret in the local time zone.
        NaiveDateTime::parse_from_str(&upper, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .and_then(|ndt| ndt.and_local_timezone(Local).earliest())
    }

    fn parse_local(trimmed: &str) -> Option<DateTime<Local>> {
        for format in LOCAL_DATE_FORMATS.iter() {
            let Some(caps) = format.captures(trimmed) else {
                continue;
            };
            let year: i32 = caps.name("year")?.as_str().parse().ok()?;
            let month = capture_u32(&caps, "month", 0)?;
            if !(1..=12).contains(&month) {
                continue;
            }
            let day = capture_u32(&caps, "day", 0)?;
            if !(1..=31).contains(&day) {
                continue;
            }
            let hours = capture_u32(&caps, "hours", 0)?;
            if hours > 23 {
                continue;
            }
            let minutes = capture_u32(&caps, "minutes", 0)?;
            if minutes > 59 {
                continue;
            }
            let seconds = capture_u32(&caps, "seconds", 0)?;
            if seconds > 59 {
                continue;
            }
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let Some(ndt) = date.and_hms_opt(hours, minutes, seconds) else {
                continue;
            };
            if let Some(dt) = ndt.and_local_timezone(Local).earliest() {
                return Some(dt);
            }
        }
        None
    }
}

impl ArgumentType for DateType {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let trimmed = raw.trim().to_lowercase();
        if trimmed == "now" {
            return Ok(Value::Date(Local::now()));
        }
        if trimmed == "today" {
            let now = Local::now();
            let midnight = now.with_time(NaiveTime::MIN).earliest().unwrap_or(now);
            return Ok(Value::Date(midnight));
        }
        if ISO_8601.is_match(&trimmed) {
            return Self::parse_iso(&trimmed)
                .map(Value::Date)
                .ok_or_else(|| ParseError::NotADate(raw.to_string()));
        }
        Self::parse_local(&trimmed)
            .map(Value::Date)
            .ok_or_else(|| ParseError::NotADate(raw.to_string()))
    }

    fn type_name(&self) -> &str {
        "DATE"
    }
}

/// Parses the token as a local date-time.
pub const DATE: DateType = DateType;

/// A closed set of accepted strings, matched case-insensitively.
///
/// Built by [`choice`]; always yields the canonical declared string.
#[derive(Debug, Clone)]
pub struct Choice {
    type_name: String,
    choices: Vec<String>,
    lookup: HashMap<String, String>,
}

/// Build an argument type accepting exactly the given strings.
///
/// Matching trims surrounding whitespace and ignores case, e.g.
/// `choice("CONFIRM", ["yes", "no"])` matches both `yes` and ` Yes `,
/// and parsing returns the declared `yes` either way.
pub fn choice<I, S>(type_name: &str, choices: I) -> Choice
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
    let lookup = choices
        .iter()
        .map(|c| (c.trim().to_lowercase(), c.clone()))
        .collect();
    Choice {
        type_name: type_name.to_uppercase(),
        choices,
        lookup,
    }
}

impl ArgumentType for Choice {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let key = raw.trim().to_lowercase();
        match self.lookup.get(&key) {
            Some(canonical) => Ok(Value::Str(canonical.clone())),
            None => Err(ParseError::NoSuchChoice {
                expected: self.choices.clone(),
                received: raw.to_string(),
            }),
        }
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
