use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp::{deserialize_date, deserialize_timestamp};
use super::{Period, TraceFact};

/// One standardized data point: a single metric value for one company and period.
///
/// Returned by the `mappedData` endpoint. Fields the client does not model
/// are kept in [`FactRecord::extra`] rather than dropped.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FactRecord {
    /// Ticker of the reporting company, in whatever case the server used.
    pub ticker: String,

    /// Standardized metric name, e.g. `Revenue`.
    pub metric: String,

    /// Numeric or textual value. Text values are coerced during normalization.
    #[serde(default)]
    pub value: Value,

    pub calendar_year: Option<i32>,

    pub calendar_period: Option<Period>,

    pub fiscal_year: Option<i32>,

    pub fiscal_period: Option<Period>,

    /// 0 for the first reported value, then 1, 2, ... for each restatement.
    pub revision_number: Option<i64>,

    /// True when the value was parsed from a press release or non-XBRL 8-K.
    pub preliminary: Option<bool>,

    #[serde(rename = "XBRL")]
    pub xbrl: Option<bool>,

    /// When the value was published. Only present on point-in-time queries.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_reported: Option<NaiveDateTime>,

    /// Facts used to compute the value, when `includeTrace` was requested.
    pub trace_facts: Option<Vec<TraceFact>>,

    #[serde(rename = "CIK")]
    pub cik: Option<String>,

    pub calcbench_entity_id: Option<i64>,

    /// 10-K, 10-Q, 8-K, PRESSRELEASE, etc.
    pub filing_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub period_start: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_date")]
    pub period_end: Option<NaiveDate>,

    pub filing_accession_number: Option<String>,

    pub filing_id: Option<i64>,

    pub trace_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
