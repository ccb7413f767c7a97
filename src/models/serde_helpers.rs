//! Serde helpers for rational durations
//!
//! Durations are read from an integer (`2`), a float (`0.75`) or a
//! fraction string (`"1/3"`), and written back as an integer when whole
//! and as a fraction string otherwise.

use crate::models::event::Duration;
use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;

pub fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if duration.is_integer() {
        serializer.serialize_i64(duration.to_integer())
    } else {
        serializer.serialize_str(&format!("{}/{}", duration.numer(), duration.denom()))
    }
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}

/// Parse "3", "3/2" or "1.5"
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Some((numer, denom)) = s.split_once('/') {
        let numer = numer
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid duration numerator: '{}'", s))?;
        let denom = denom
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid duration denominator: '{}'", s))?;
        if denom == 0 {
            return Err(format!("Duration denominator is zero: '{}'", s));
        }
        return Ok(Duration::new(numer, denom));
    }
    if let Ok(whole) = s.parse::<i64>() {
        return Ok(Duration::from_integer(whole));
    }
    let value = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid duration: '{}'", s))?;
    duration_from_f64(value)
}

fn duration_from_f64(value: f64) -> Result<Duration, String> {
    Duration::approximate_float(value)
        .ok_or_else(|| format!("Duration can't be represented as a fraction: {}", value))
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer, a float or a fraction string like \"3/2\"")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
        Ok(Duration::from_integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
        i64::try_from(value)
            .map(Duration::from_integer)
            .map_err(|_| E::custom(format!("Duration too large: {}", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Duration, E> {
        duration_from_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
        parse_duration(value).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3"), Ok(Duration::from_integer(3)));
        assert_eq!(parse_duration("3/2"), Ok(Duration::new(3, 2)));
        assert_eq!(parse_duration(" 2 / 4 "), Ok(Duration::new(1, 2)));
        assert_eq!(parse_duration("0.75"), Ok(Duration::new(3, 4)));
        assert!(parse_duration("1/0").is_err());
        assert!(parse_duration("half").is_err());
    }
}
