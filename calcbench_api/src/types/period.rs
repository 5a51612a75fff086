//! Fiscal/calendar period codes used throughout the API.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A reporting period within a year.
///
/// On the wire this is an integer code. Codes the client does not know about
/// decode to [`Period::Other`] instead of failing, so a new period kind on the
/// server never breaks deserialization.
///
/// Ordering follows display order: quarters and half-years first, annual
/// after them, then `Other` and `Failure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    /// Full year (code 0).
    Annual,
    /// First quarter (code 1).
    Q1,
    /// Second quarter (code 2).
    Q2,
    /// Third quarter (code 3).
    Q3,
    /// Fourth quarter (code 4).
    Q4,
    /// First half of the year (code 5).
    H1,
    /// First three quarters of the year (code 6).
    Q3Cumulative,
    /// Irregular period, e.g. an 18 month transition period (code 9).
    Other,
    /// The server failed to classify the period (code -1).
    Failure,
}

impl Period {
    /// The integer code sent to and received from the service.
    pub const fn code(self) -> i8 {
        match self {
            Period::Annual => 0,
            Period::Q1 => 1,
            Period::Q2 => 2,
            Period::Q3 => 3,
            Period::Q4 => 4,
            Period::H1 => 5,
            Period::Q3Cumulative => 6,
            Period::Other => 9,
            Period::Failure => -1,
        }
    }

    /// Maps a wire code to a period. Unknown codes become [`Period::Other`].
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Period::Annual,
            1 => Period::Q1,
            2 => Period::Q2,
            3 => Period::Q3,
            4 => Period::Q4,
            5 => Period::H1,
            6 => Period::Q3Cumulative,
            -1 => Period::Failure,
            _ => Period::Other,
        }
    }

    /// Parses a caller-supplied period: an integer code, or `Y`/`y` for annual.
    ///
    /// Returns `None` for text that is neither.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("y") {
            return Some(Period::Annual);
        }
        raw.parse::<i64>().ok().map(Period::from_code)
    }

    pub const fn is_annual(self) -> bool {
        matches!(self, Period::Annual)
    }

    /// True for the four calendar/fiscal quarters.
    pub const fn is_quarter(self) -> bool {
        matches!(self, Period::Q1 | Period::Q2 | Period::Q3 | Period::Q4)
    }

    const fn display_rank(self) -> u8 {
        match self {
            Period::Q1 => 0,
            Period::Q2 => 1,
            Period::Q3 => 2,
            Period::Q4 => 3,
            Period::H1 => 4,
            Period::Q3Cumulative => 5,
            Period::Annual => 6,
            Period::Other => 7,
            Period::Failure => 8,
        }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_rank().cmp(&other.display_rank())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::Annual => "Y",
                Period::Q1 => "Q1",
                Period::Q2 => "Q2",
                Period::Q3 => "Q3",
                Period::Q4 => "Q4",
                Period::H1 => "H1",
                Period::Q3Cumulative => "Q3CUM",
                Period::Other => "Other",
                Period::Failure => "Failure",
            }
        )
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PeriodVisitor)
    }
}

struct PeriodVisitor;

impl<'de> Visitor<'de> for PeriodVisitor {
    type Value = Period;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a period code")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Period, E> {
        Ok(Period::from_code(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Period, E> {
        Ok(i64::try_from(v).map_or(Period::Other, Period::from_code))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Period, E> {
        if v.fract() == 0.0 {
            Ok(Period::from_code(v as i64))
        } else {
            Ok(Period::Other)
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Period, E> {
        Ok(Period::parse(v).unwrap_or(Period::Other))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Period, E> {
        Ok(Period::Other)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Period, E> {
        Ok(Period::Other)
    }
}
