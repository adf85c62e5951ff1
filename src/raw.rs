//! The raw SNMP query results of one poll cycle, keyed by OID.
//!
//! A transport layer hands these over either as `snmpget`/`snmpwalk -On` text output or as a
//! flat JSON object. Both end up in a [RawOidMap].

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::oid::normalize_oid;

/// A single value as returned by the query layer, before any decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Integer(i64),
    Text(String),
}

impl RawValue {
    /// Coerces the value into an integer. Text holding an integral number is accepted too.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            RawValue::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(i);
                }
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
                    _ => None,
                }
            }
        }
    }

    /// Returns the value as text, `None` for empty strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Text(s) if s.trim().is_empty() => None,
            RawValue::Text(s) => Some(s.trim().to_owned()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(i) => write!(f, "{}", i),
            RawValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Integer(i)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// Supported textual forms of a raw dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InputFormat {
    /// `snmpget -On` / `snmpwalk -On` output.
    Walk,
    /// `{ "<oid>": <string or integer>, ... }`
    Json,
}

/// OID to raw value mapping of one poll cycle. Any OID may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawOidMap {
    values: HashMap<String, RawValue>,
}

impl RawOidMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing an earlier one for the same OID.
    pub fn insert(&mut self, oid: &str, value: impl Into<RawValue>) -> Result<()> {
        let oid = normalize_oid(oid)?;
        self.values.insert(oid, value.into());
        Ok(())
    }

    pub fn get(&self, oid: &str) -> Option<&RawValue> {
        let oid = oid.trim();
        self.values.get(oid.strip_prefix('.').unwrap_or(oid))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parses the given text in the given format.
    pub fn parse(input: &str, format: InputFormat) -> Result<Self> {
        match format {
            InputFormat::Walk => Self::from_walk(input),
            InputFormat::Json => Self::from_json(input),
        }
    }

    /// Reads and parses a dump from a file, `-` meaning stdin.
    pub fn load(path: impl AsRef<Path>, format: InputFormat) -> Result<Self> {
        let path = path.as_ref();
        let content = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        } else {
            std::fs::read_to_string(path)
        }
        .map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&content, format)
    }

    /// Parses `snmpget -On` / `snmpwalk -On` output.
    ///
    /// Lines look like `.1.3.6.1.2.1.33.1.2.1.0 = INTEGER: 2`. Lines reporting a missing object
    /// are skipped, quoted strings may continue over several lines.
    pub fn from_walk(input: &str) -> Result<Self> {
        let mut map = RawOidMap::new();
        let mut open_string: Option<(String, String)> = None;

        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;

            if let Some((oid, mut buf)) = open_string.take() {
                buf.push('\n');
                buf.push_str(line);
                match buf.strip_suffix('"') {
                    Some(done) => map.insert(&oid, done.to_owned())?,
                    None => open_string = Some((oid, buf)),
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (oid, rest) = trimmed.split_once(" = ").ok_or_else(|| Error::Parse {
                line: line_no,
                message: format!("expected `<oid> = <value>`, got `{}`", trimmed),
            })?;
            let oid = normalize_oid(oid).map_err(|e| Error::Parse {
                line: line_no,
                message: e.to_string(),
            })?;

            match parse_walk_value(rest) {
                WalkValue::Value(value) => map.insert(&oid, value)?,
                WalkValue::OpenString(start) => open_string = Some((oid, start)),
                WalkValue::Missing => debug!(oid = %oid, "agent reports no such object"),
            }
        }

        if let Some((oid, _)) = open_string {
            return Err(Error::Parse {
                line: input.lines().count(),
                message: format!("unterminated string value for {}", oid),
            });
        }

        Ok(map)
    }

    /// Parses a flat JSON object of OID to string or integer. `null` entries are skipped,
    /// non integral numbers are kept as text.
    pub fn from_json(input: &str) -> Result<Self> {
        use serde::de::Error as _;

        let entries: HashMap<String, serde_json::Value> = serde_json::from_str(input)?;
        let mut map = RawOidMap::new();

        for (oid, value) in entries {
            let value = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => RawValue::Integer(i),
                    None => RawValue::Text(n.to_string()),
                },
                serde_json::Value::String(s) => RawValue::Text(s),
                other => {
                    return Err(serde_json::Error::custom(format!(
                        "value for {} must be a string or an integer, got {}",
                        oid, other
                    ))
                    .into())
                }
            };
            map.insert(&oid, value)?;
        }

        Ok(map)
    }
}

impl<S: AsRef<str>> FromIterator<(S, RawValue)> for RawOidMap {
    /// Collects pairs without validation, OIDs only lose a leading dot.
    fn from_iter<I: IntoIterator<Item = (S, RawValue)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(oid, value)| {
                let oid = oid.as_ref().trim();
                (oid.strip_prefix('.').unwrap_or(oid).to_owned(), value)
            })
            .collect();
        RawOidMap { values }
    }
}

enum WalkValue {
    Value(RawValue),
    OpenString(String),
    Missing,
}

fn parse_walk_value(rest: &str) -> WalkValue {
    let rest = rest.trim();

    if rest.starts_with("No Such Object")
        || rest.starts_with("No Such Instance")
        || rest.starts_with("No more variables")
    {
        return WalkValue::Missing;
    }

    let Some((kind, value)) = rest.split_once(':') else {
        return text_value(rest);
    };
    let value = value.trim();

    match kind {
        "INTEGER" | "Gauge32" | "Counter32" | "Counter64" | "Unsigned32" | "Integer32" => {
            match parse_snmp_integer(value) {
                Some(i) => WalkValue::Value(RawValue::Integer(i)),
                None => WalkValue::Value(RawValue::Text(value.to_owned())),
            }
        }
        "Timeticks" => {
            let ticks = value
                .strip_prefix('(')
                .and_then(|v| v.split_once(')'))
                .and_then(|(n, _)| n.parse::<i64>().ok());
            match ticks {
                Some(i) => WalkValue::Value(RawValue::Integer(i)),
                None => WalkValue::Value(RawValue::Text(value.to_owned())),
            }
        }
        "STRING" => text_value(value),
        _ if kind.contains(' ') => text_value(rest),
        _ => WalkValue::Value(RawValue::Text(value.to_owned())),
    }
}

/// Accepts `42`, `-99998`, the enum form `batteryNormal(2)` and a units suffix as printed
/// with the MIB loaded (`45 minutes`, `2184 0.1 Volt DC`).
fn parse_snmp_integer(value: &str) -> Option<i64> {
    let token = value.split_whitespace().next()?;
    if let Ok(i) = token.parse::<i64>() {
        return Some(i);
    }
    let (_, tail) = token.rsplit_once('(')?;
    tail.strip_suffix(')')?.parse::<i64>().ok()
}

fn text_value(value: &str) -> WalkValue {
    match value.strip_prefix('"') {
        Some(inner) => match inner.strip_suffix('"') {
            Some(done) => WalkValue::Value(RawValue::Text(done.to_owned())),
            None => WalkValue::OpenString(inner.to_owned()),
        },
        None => WalkValue::Value(RawValue::Text(value.to_owned())),
    }
}
