//! Wire payload sections shared by the query endpoints.
//!
//! Most endpoints take a JSON object with three parts: which companies,
//! which periods, and endpoint-specific page parameters. Field names here
//! are the server's and must not change.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{CompanyIdentifier, MarketIndex, PeriodArg, PeriodType, YearArg};

/// Opaque pagination cursor handed out by the server.
///
/// The client never inspects it; it is only echoed back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Cursor(pub Value);

impl Cursor {
    /// A JSON `null` cursor means there is nothing further to fetch.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Top-level request body: `{companiesParameters, periodParameters, pageParameters}`.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiQueryParams<P> {
    pub companies_parameters: CompaniesParameters,
    pub period_parameters: PeriodParameters,
    pub page_parameters: P,
}

/// The company section. Exactly one shape is sent per request.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CompaniesParameters {
    /// An explicit list of companies, or the whole universe.
    Companies {
        #[serde(rename = "companyIdentifiers")]
        company_identifiers: Vec<CompanyIdentifier>,
        #[serde(rename = "entireUniverse")]
        entire_universe: bool,
    },
    /// Scoped to a single SEC accession.
    Accession {
        #[serde(rename = "accessionID")]
        accession_id: i64,
    },
    /// Scoped to a single filing.
    Filing {
        #[serde(rename = "filingID")]
        filing_id: i64,
    },
}

impl CompaniesParameters {
    pub fn identifiers(company_identifiers: Vec<CompanyIdentifier>) -> Self {
        CompaniesParameters::Companies {
            company_identifiers,
            entire_universe: false,
        }
    }

    pub fn entire_universe() -> Self {
        CompaniesParameters::Companies {
            company_identifiers: Vec::new(),
            entire_universe: true,
        }
    }
}

/// The period section. Unset fields are omitted from the payload.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<YearArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<YearArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_period: Option<PeriodArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_fiscal_period: Option<bool>,
    /// Only include data from filings on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_date: Option<NaiveDate>,
    /// Disclosure search only: documents filed or amended since this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_from: Option<NaiveDate>,
    /// Only data points published inside this window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Every revision published in the window, not just the latest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_modifications: Option<bool>,
    #[serde(rename = "accessionID", skip_serializing_if = "Option::is_none")]
    pub accession_id: Option<i64>,
    #[serde(rename = "filingID", skip_serializing_if = "Option::is_none")]
    pub filing_id: Option<i64>,
}

/// Publish-time window of the period section. Either end may be open.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
}

/// Page parameters for the standardized (`mappedData`) endpoint.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedParameters {
    pub metrics: Vec<String>,
    pub include_trace: bool,
    pub point_in_time: bool,
    pub include_preliminary: bool,
    pub all_footnotes: bool,
    pub all_face: bool,
    #[serde(rename = "includeXBRL")]
    pub include_xbrl: bool,
    #[serde(rename = "allNonGAAP")]
    pub all_non_gaap: bool,
    pub all_metrics: bool,
    /// Only values tagged in XBRL, no press release or hand-collected data.
    #[serde(rename = "XBRLOnly")]
    pub xbrl_only: bool,
    #[serde(rename = "pointInTimeV2")]
    pub point_in_time_v2: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Cursor>,
}

/// Page parameters for the disclosure search (`footnoteSearch`) endpoint.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureParameters {
    /// Full-text query in Lucene syntax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote_type: Option<String>,
    /// Level 2 or 3 XBRL block tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosure_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disclosure_names: Vec<String>,
    /// Results per page.
    pub limit: u32,
    pub sub_divide: bool,
    pub all_footnotes: bool,
    #[serde(rename = "AllTextBlocks")]
    pub all_text_blocks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Cursor>,
}

impl Default for DisclosureParameters {
    fn default() -> Self {
        Self {
            full_text_query: None,
            footnote_type: None,
            footnote_tag: None,
            disclosure_name: None,
            disclosure_names: Vec::new(),
            limit: 100,
            sub_divide: false,
            all_footnotes: false,
            all_text_blocks: false,
            start_offset: None,
        }
    }
}

/// Request body for the `companies` listing endpoint.
///
/// Exactly one filter is set; the server reads the first one it finds.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct CompaniesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<MarketIndex>,
    #[serde(rename = "SICCodes", skip_serializing_if = "Option::is_none")]
    pub sic_codes: Option<Vec<i64>>,
    #[serde(rename = "NAICSCodes", skip_serializing_if = "Option::is_none")]
    pub naics_codes: Option<Vec<i64>>,
    #[serde(rename = "companyIdentifiers", skip_serializing_if = "Option::is_none")]
    pub company_identifiers: Option<Vec<CompanyIdentifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe: Option<bool>,
    /// Adds most recent filing dates and periods to each record.
    #[serde(rename = "includeMostRecentFilingExtras")]
    pub include_most_recent_filing_extras: bool,
}
