//! Lenient timestamp parsing for server-formatted dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parses the timestamp formats the service emits.
///
/// Accepts RFC 3339, `%Y-%m-%dT%H:%M:%S` with or without fractional seconds,
/// and bare dates. Fractions longer than microseconds (the server writes
/// seven digits) are truncated. Returns `None` for empty or unrecognized text.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    let truncated = raw.get(..26).unwrap_or(raw);
    NaiveDateTime::parse_from_str(truncated, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(truncated, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(truncated, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(truncated, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_timestamp(deserializer)?.map(|dt| dt.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_digit_fraction() {
        let ts = parse_timestamp("2021-02-11T08:42:38.1234567").unwrap();
        assert_eq!(ts.to_string(), "2021-02-11 08:42:38.123456");
    }

    #[test]
    fn without_fraction() {
        let ts = parse_timestamp("2021-02-11T08:42:38").unwrap();
        assert_eq!(ts.to_string(), "2021-02-11 08:42:38");
    }

    #[test]
    fn bare_date() {
        let ts = parse_timestamp("2020-12-31").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }
}
