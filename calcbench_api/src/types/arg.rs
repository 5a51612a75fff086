//! Year and period arguments as callers supply them.
//!
//! Callers frequently pass years and periods as text ("2020", "4"). These
//! types keep such input intact until it is normalized, and serialize
//! whatever they hold so nothing is silently lost on the wire.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use super::Period;

/// A year given either as a number or as unparsed text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum YearArg {
    Number(i32),
    Text(String),
}

impl YearArg {
    /// Converts numeric-looking text to a number; other text is left as is.
    pub fn normalized(&self) -> Self {
        match self {
            YearArg::Text(t) => t
                .trim()
                .parse::<i32>()
                .map_or_else(|_| self.clone(), YearArg::Number),
            YearArg::Number(_) => self.clone(),
        }
    }

    pub fn as_number(&self) -> Option<i32> {
        match self {
            YearArg::Number(n) => Some(*n),
            YearArg::Text(_) => None,
        }
    }
}

impl From<i32> for YearArg {
    fn from(value: i32) -> Self {
        YearArg::Number(value)
    }
}

impl From<&str> for YearArg {
    fn from(value: &str) -> Self {
        YearArg::Text(value.to_string())
    }
}

impl fmt::Display for YearArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearArg::Number(n) => write!(f, "{}", n),
            YearArg::Text(t) => write!(f, "{}", t),
        }
    }
}

/// A period given either as a known [`Period`] or as unparsed text.
///
/// Integers decode to a `Period`; strings are kept as text until
/// [`PeriodArg::normalized`] runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PeriodArg {
    Period(Period),
    Text(String),
}

impl PeriodArg {
    /// Converts numeric-looking text to a [`Period`]; other text is left as is.
    pub fn normalized(&self) -> Self {
        match self {
            PeriodArg::Text(t) => t
                .trim()
                .parse::<i64>()
                .map_or_else(|_| self.clone(), |code| PeriodArg::Period(Period::from_code(code))),
            PeriodArg::Period(_) => self.clone(),
        }
    }

    /// The period this argument names, including the `Y` shorthand for annual.
    pub fn as_period(&self) -> Option<Period> {
        match self {
            PeriodArg::Period(p) => Some(*p),
            PeriodArg::Text(t) => Period::parse(t),
        }
    }

    pub fn is_annual(&self) -> bool {
        self.as_period().is_some_and(Period::is_annual)
    }
}

impl From<Period> for PeriodArg {
    fn from(value: Period) -> Self {
        PeriodArg::Period(value)
    }
}

impl From<&str> for PeriodArg {
    fn from(value: &str) -> Self {
        PeriodArg::Text(value.to_string())
    }
}

impl fmt::Display for PeriodArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodArg::Period(p) => write!(f, "{}", p.code()),
            PeriodArg::Text(t) => write!(f, "{}", t),
        }
    }
}

impl Serialize for PeriodArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodArg::Period(p) => p.serialize(serializer),
            PeriodArg::Text(t) => serializer.serialize_str(t),
        }
    }
}

impl<'de> Deserialize<'de> for PeriodArg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PeriodArgVisitor)
    }
}

struct PeriodArgVisitor;

impl<'de> Visitor<'de> for PeriodArgVisitor {
    type Value = PeriodArg;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a period code or period text")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PeriodArg, E> {
        Ok(PeriodArg::Period(Period::from_code(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PeriodArg, E> {
        Ok(PeriodArg::Period(
            i64::try_from(v).map_or(Period::Other, Period::from_code),
        ))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PeriodArg, E> {
        Ok(PeriodArg::Text(v.to_string()))
    }
}
