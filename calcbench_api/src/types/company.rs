//! Company identifiers accepted by the query endpoints, and company records
//! returned by the `companies` listing.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp::deserialize_date;
use super::Period;

/// A ticker, SEC CIK code, or the service's internal numeric company id.
///
/// Tickers and CIK strings are case-insensitive; [`CompanyIdentifier::normalized`]
/// produces the canonical uppercase form used on output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum CompanyIdentifier {
    Id(i64),
    Ticker(String),
}

impl CompanyIdentifier {
    /// Uppercases and trims ticker text; numeric ids are returned unchanged.
    pub fn normalized(&self) -> Self {
        match self {
            CompanyIdentifier::Id(id) => CompanyIdentifier::Id(*id),
            CompanyIdentifier::Ticker(t) => CompanyIdentifier::Ticker(t.trim().to_uppercase()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CompanyIdentifier::Ticker(t) if t.trim().is_empty())
    }
}

impl std::fmt::Display for CompanyIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyIdentifier::Id(id) => write!(f, "{}", id),
            CompanyIdentifier::Ticker(t) => write!(f, "{}", t),
        }
    }
}

impl From<&str> for CompanyIdentifier {
    fn from(value: &str) -> Self {
        CompanyIdentifier::Ticker(value.to_string())
    }
}

impl From<String> for CompanyIdentifier {
    fn from(value: String) -> Self {
        CompanyIdentifier::Ticker(value)
    }
}

impl From<i64> for CompanyIdentifier {
    fn from(value: i64) -> Self {
        CompanyIdentifier::Id(value)
    }
}

/// Index membership filter of the `companies` endpoint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarketIndex {
    #[serde(rename = "SP500")]
    Sp500,
    #[serde(rename = "DJIA")]
    Djia,
}

impl FromStr for MarketIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SP500" => Ok(MarketIndex::Sp500),
            "DJIA" => Ok(MarketIndex::Djia),
            _ => Err(format!("index must be either 'SP500' or 'DJIA', got '{}'", s)),
        }
    }
}

impl std::fmt::Display for MarketIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketIndex::Sp500 => write!(f, "SP500"),
            MarketIndex::Djia => write!(f, "DJIA"),
        }
    }
}

/// One company from the `companies` endpoint.
///
/// Filing dates are only populated when the most recent filing extras were
/// requested. Unmodelled fields are kept in [`CompanyRecord::extra`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CompanyRecord {
    pub ticker: String,

    pub entity_name: Option<String>,

    /// The service's internal company id.
    pub entity_id: Option<i64>,

    /// SEC CIK code.
    pub entity_code: Option<String>,

    pub sic_code: Option<i64>,

    pub naics_code: Option<i64>,

    #[serde(rename = "SICCategory")]
    pub sic_category: Option<String>,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub first_filing: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub most_recent_filing: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub most_recent_full_year_end: Option<NaiveDate>,

    pub most_recent_fiscal_year: Option<i32>,

    pub most_recent_filing_calendar_period: Option<Period>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn index_parses_case_insensitively() {
        assert_eq!("sp500".parse::<MarketIndex>(), Ok(MarketIndex::Sp500));
        assert_eq!(" DJIA".parse::<MarketIndex>(), Ok(MarketIndex::Djia));
        assert!("NASDAQ".parse::<MarketIndex>().is_err());
    }

    #[test]
    fn company_record_keeps_unknown_fields() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "ticker": "MSFT",
            "entity_name": "Microsoft Corp",
            "entity_id": 2468,
            "entity_code": "0000789019",
            "sic_code": 7372,
            "naics_code": 511210,
            "first_filing": "2009-04-23T00:00:00",
            "most_recent_filing_calendar_period": 1,
            "SICGroupMinorGroupTitle": "Prepackaged Software"
        }))
        .unwrap();
        assert_eq!(record.entity_id, Some(2468));
        assert_eq!(record.first_filing, NaiveDate::from_ymd_opt(2009, 4, 23));
        assert_eq!(record.most_recent_filing, None);
        assert_eq!(record.most_recent_filing_calendar_period, Some(Period::Q1));
        assert_eq!(
            record.extra.get("SICGroupMinorGroupTitle"),
            Some(&json!("Prepackaged Software"))
        );
    }
}
