use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Period;
use crate::Cursor;

/// One page of results from the `footnoteSearch` endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisclosurePage {
    #[serde(default)]
    pub footnotes: Vec<DisclosureResult>,

    /// False on the last page.
    #[serde(default)]
    pub more_results: bool,

    /// Echoed back as `startOffset` to request the following page.
    #[serde(default)]
    pub next_group_start_offset: Option<Cursor>,
}

/// An individual disclosure (footnote or other document section).
///
/// Several fields are not populated in single-company mode, hence the
/// `Option`s.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DisclosureResult {
    pub fact_id: Option<i64>,

    pub entity_name: Option<String>,

    pub ticker: Option<String>,

    #[serde(rename = "CIK")]
    pub cik: Option<String>,

    pub accession_id: Option<i64>,

    pub sec_filing_id: Option<i64>,

    pub fiscal_year: Option<i32>,

    pub fiscal_period: Option<Period>,

    pub calendar_year: Option<i32>,

    pub calendar_period: Option<Period>,

    pub disclosure_type_name: Option<String>,

    pub document_type: Option<String>,

    pub filing_date: Option<String>,

    #[serde(rename = "SEC_URL")]
    pub sec_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
