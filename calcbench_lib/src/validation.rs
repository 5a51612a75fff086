//! Argument validation for query endpoints.
//!
//! Callers hand over a loosely typed argument bag (possibly decoded from
//! JSON). Validation rejects conflicting selectors before any payload is
//! built and returns a [`ValidatedQuery`] in which exactly one company mode
//! and exactly one period mode are active.

use calcbench_api::types::{CompanyIdentifier, MarketIndex, PeriodArg, PeriodType, YearArg};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::period::PivotFrequency;

/// Largest number of identifiers sent in one disclosure search request.
pub const DISCLOSURE_BATCH_SIZE: usize = 30;

/// Default results per disclosure search page.
pub const DEFAULT_DISCLOSURE_LIMIT: u32 = 100;

/// A list argument as it may arrive from JSON: a real sequence, or a
/// scalar that the caller meant as a one-element list.
///
/// Scalars are kept so validation can reject them with a clear message
/// rather than silently sending a bare string.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ListArg<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<Vec<T>> for ListArg<T> {
    fn from(values: Vec<T>) -> Self {
        ListArg::Many(values)
    }
}

/// Rejections from [`validate_standardized`] and [`validate_disclosure_search`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(
        "exactly one of company_identifiers, entire_universe, accession_id, filing_id is required, got {}",
        if .0.is_empty() { "none".to_string() } else { .0.join(", ") }
    )]
    CompanySelection(Vec<&'static str>),

    #[error("{id} is specific to one filing and cannot be combined with {other}")]
    FilingScoped {
        id: &'static str,
        other: &'static str,
    },

    #[error("period is for a single period and cannot be combined with start_period/end_period")]
    PeriodWithRange,

    #[error("with start_year/end_year only an annual period works, got period {0}")]
    NonAnnualPeriodWithYearRange(String),

    #[error("year is for a single year and cannot be combined with start_year/end_year")]
    YearWithRange,

    #[error("all_history cannot be combined with {0}")]
    AllHistoryWithPeriod(&'static str),

    #[error("include_preliminary requires point_in_time")]
    PreliminaryWithoutPointInTime,

    #[error("point_in_time_v2 requires point_in_time")]
    PointInTimeV2WithoutPointInTime,

    #[error("all_modifications requires start_date/end_date or filing_id")]
    AllModificationsWithoutScope,

    #[error("metrics cannot be combined with {0}")]
    MetricsWithBulkSelection(&'static str),

    #[error(
        "one of metrics, all_face, all_footnotes, all_non_gaap, all_metrics, filing_id or accession_id is required"
    )]
    NoMetricSelection,

    #[error("{0} must be a list, not a single value")]
    ScalarList(&'static str),

    #[error("TTM period type with all_history requires exactly one metric, got {0}")]
    TtmMetricCount(usize),

    #[error(
        "a period qualifier is required: year, start_year/end_year, all_history, period_type, start_date/end_date, filing_id or accession_id"
    )]
    NoPeriodQualifier,

    #[error("company identifier at position {0} is empty")]
    EmptyIdentifier(usize),

    #[error(
        "one of full_text_search, document_type, block_tag_name, document_name, all_documents, disclosure_names or all_text_blocks is required"
    )]
    NoSearchParameter,

    #[error("year is required unless all_history, updated_from or accession_id is given")]
    DisclosureYearRequired,

    #[error(
        "exactly one of index, sic_codes, naics_codes, company_identifiers, entire_universe is required, got {}",
        if .0.is_empty() { "none".to_string() } else { .0.join(", ") }
    )]
    CompanyFilter(Vec<&'static str>),

    #[error("{0}")]
    UnknownIndex(String),
}

/// Caller arguments for the standardized data endpoint.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct StandardizedArgs {
    pub company_identifiers: Option<ListArg<CompanyIdentifier>>,
    pub entire_universe: bool,
    pub accession_id: Option<i64>,
    pub filing_id: Option<i64>,
    pub metrics: Option<ListArg<String>>,
    pub year: Option<YearArg>,
    pub period: Option<PeriodArg>,
    pub start_year: Option<YearArg>,
    pub end_year: Option<YearArg>,
    pub start_period: Option<PeriodArg>,
    pub end_period: Option<PeriodArg>,
    pub all_history: bool,
    pub period_type: Option<PeriodType>,
    pub use_fiscal_period: bool,
    pub point_in_time: bool,
    pub include_preliminary: bool,
    pub include_trace: bool,
    pub include_xbrl: bool,
    pub all_face: bool,
    pub all_footnotes: bool,
    pub all_non_gaap: bool,
    pub all_metrics: bool,
    pub update_date: Option<NaiveDate>,
    /// Publish-time window. Either end may be open.
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    /// Every revision published inside the window or filing.
    pub all_modifications: bool,
    pub xbrl_only: bool,
    pub point_in_time_v2: bool,
}

impl StandardizedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifiers<I, C>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CompanyIdentifier>,
    {
        self.company_identifiers = Some(ListArg::Many(
            identifiers.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn with_entire_universe(mut self) -> Self {
        self.entire_universe = true;
        self
    }

    pub fn with_accession_id(mut self, id: i64) -> Self {
        self.accession_id = Some(id);
        self
    }

    pub fn with_filing_id(mut self, id: i64) -> Self {
        self.filing_id = Some(id);
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Some(ListArg::Many(metrics.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_year(mut self, year: impl Into<YearArg>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<PeriodArg>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_start_year(mut self, year: impl Into<YearArg>) -> Self {
        self.start_year = Some(year.into());
        self
    }

    pub fn with_end_year(mut self, year: impl Into<YearArg>) -> Self {
        self.end_year = Some(year.into());
        self
    }

    pub fn with_start_period(mut self, period: impl Into<PeriodArg>) -> Self {
        self.start_period = Some(period.into());
        self
    }

    pub fn with_end_period(mut self, period: impl Into<PeriodArg>) -> Self {
        self.end_period = Some(period.into());
        self
    }

    pub fn with_all_history(mut self) -> Self {
        self.all_history = true;
        self
    }

    pub fn with_period_type(mut self, period_type: PeriodType) -> Self {
        self.period_type = Some(period_type);
        self
    }

    pub fn with_fiscal_periods(mut self) -> Self {
        self.use_fiscal_period = true;
        self
    }

    pub fn with_point_in_time(mut self) -> Self {
        self.point_in_time = true;
        self
    }

    pub fn with_preliminary(mut self) -> Self {
        self.include_preliminary = true;
        self
    }

    pub fn with_trace(mut self) -> Self {
        self.include_trace = true;
        self
    }

    pub fn with_all_face(mut self) -> Self {
        self.all_face = true;
        self
    }

    pub fn with_all_footnotes(mut self) -> Self {
        self.all_footnotes = true;
        self
    }

    pub fn with_all_non_gaap(mut self) -> Self {
        self.all_non_gaap = true;
        self
    }

    pub fn with_all_metrics(mut self) -> Self {
        self.all_metrics = true;
        self
    }

    pub fn with_update_date(mut self, date: NaiveDate) -> Self {
        self.update_date = Some(date);
        self
    }

    pub fn with_start_date(mut self, start: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end_date(mut self, end: NaiveDateTime) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_all_modifications(mut self) -> Self {
        self.all_modifications = true;
        self
    }

    pub fn with_xbrl_only(mut self) -> Self {
        self.xbrl_only = true;
        self
    }

    pub fn with_point_in_time_v2(mut self) -> Self {
        self.point_in_time_v2 = true;
        self
    }
}

/// Which companies a query covers. Exactly one mode.
#[derive(Clone, Debug, PartialEq)]
pub enum CompanySelector {
    Identifiers(Vec<CompanyIdentifier>),
    EntireUniverse,
    Accession(i64),
    Filing(i64),
}

impl CompanySelector {
    /// Requested entities as they will appear in a pivoted table.
    ///
    /// Facts come back keyed by ticker, so numeric company ids and CIK codes
    /// are left out. Their companies still show up under the ticker the
    /// service reports.
    pub fn entities(&self) -> Vec<String> {
        match self {
            CompanySelector::Identifiers(ids) => ids
                .iter()
                .filter_map(|id| match id.normalized() {
                    CompanyIdentifier::Ticker(t) if !is_cik_code(&t) => Some(t),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Which periods a query covers. Exactly one mode.
#[derive(Clone, Debug, PartialEq)]
pub enum PeriodSelector {
    /// One year, optionally narrowed to one period.
    Single {
        year: YearArg,
        period: Option<PeriodArg>,
    },
    /// A year and/or period range. Either end may be open.
    Range {
        start_year: Option<YearArg>,
        start_period: Option<PeriodArg>,
        end_year: Option<YearArg>,
        end_period: Option<PeriodArg>,
    },
    /// Everything the service has, optionally filtered by the query's period type.
    AllHistory,
    /// No year or period bounds. The period type or publish window decides
    /// what comes back; `allHistory` stays off.
    Unbounded,
    /// Determined by the filing or accession id.
    FixedByFiling,
}

impl PeriodSelector {
    /// `(start_year, start_period, end_year, end_period)` in the collapsed
    /// form the service expects: a single year is sent as `start = end`.
    pub fn bounds(
        &self,
    ) -> (
        Option<&YearArg>,
        Option<&PeriodArg>,
        Option<&YearArg>,
        Option<&PeriodArg>,
    ) {
        match self {
            PeriodSelector::Single { year, period } => {
                (Some(year), period.as_ref(), Some(year), period.as_ref())
            }
            PeriodSelector::Range {
                start_year,
                start_period,
                end_year,
                end_period,
            } => (
                start_year.as_ref(),
                start_period.as_ref(),
                end_year.as_ref(),
                end_period.as_ref(),
            ),
            PeriodSelector::AllHistory
            | PeriodSelector::Unbounded
            | PeriodSelector::FixedByFiling => (None, None, None, None),
        }
    }
}

/// Metric selection. Flags are alternatives to an explicit list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricSelection {
    pub metrics: Vec<String>,
    pub all_face: bool,
    pub all_footnotes: bool,
    pub all_non_gaap: bool,
    pub all_metrics: bool,
}

/// Standardized query arguments that passed every rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedQuery {
    pub companies: CompanySelector,
    pub periods: PeriodSelector,
    pub period_type: Option<PeriodType>,
    pub metrics: MetricSelection,
    pub use_fiscal_period: bool,
    pub point_in_time: bool,
    pub include_preliminary: bool,
    pub include_trace: bool,
    pub include_xbrl: bool,
    pub update_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub all_modifications: bool,
    pub xbrl_only: bool,
    pub point_in_time_v2: bool,
}

impl ValidatedQuery {
    /// Whether results of this query pivot into quarterly or annual rows.
    pub fn pivot_frequency(&self) -> PivotFrequency {
        let (_, start_period, _, end_period) = self.periods.bounds();
        PivotFrequency::resolve(start_period, end_period, self.period_type)
    }
}

fn list_values<T: Clone>(
    arg: &Option<ListArg<T>>,
    name: &'static str,
) -> Result<Vec<T>, ValidationError> {
    match arg {
        None => Ok(Vec::new()),
        Some(ListArg::Many(values)) => Ok(values.clone()),
        Some(ListArg::One(_)) => Err(ValidationError::ScalarList(name)),
    }
}

fn check_identifiers(identifiers: &[CompanyIdentifier]) -> Result<(), ValidationError> {
    match identifiers.iter().position(CompanyIdentifier::is_blank) {
        Some(pos) => Err(ValidationError::EmptyIdentifier(pos)),
        None => Ok(()),
    }
}

/// CIK codes are all digits, usually zero-padded to ten places.
fn is_cik_code(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

fn normalize_year(arg: &Option<YearArg>) -> Option<YearArg> {
    arg.as_ref().map(YearArg::normalized)
}

fn normalize_period(arg: &Option<PeriodArg>) -> Option<PeriodArg> {
    arg.as_ref().map(PeriodArg::normalized)
}

/// Checks standardized query arguments and resolves them into selectors.
///
/// Numeric-looking year and period text is normalized to numbers; other
/// text is forwarded untouched.
pub fn validate_standardized(args: &StandardizedArgs) -> Result<ValidatedQuery, ValidationError> {
    let metrics = list_values(&args.metrics, "metrics")?;
    let identifiers = list_values(&args.company_identifiers, "company_identifiers")?;
    check_identifiers(&identifiers)?;

    let mut company_modes = Vec::new();
    if !identifiers.is_empty() {
        company_modes.push("company_identifiers");
    }
    if args.entire_universe {
        company_modes.push("entire_universe");
    }
    if args.accession_id.is_some() {
        company_modes.push("accession_id");
    }
    if args.filing_id.is_some() {
        company_modes.push("filing_id");
    }
    if company_modes.len() != 1 {
        return Err(ValidationError::CompanySelection(company_modes));
    }

    let filing_scoped = match (args.accession_id, args.filing_id) {
        (Some(_), _) => Some("accession_id"),
        (_, Some(_)) => Some("filing_id"),
        _ => None,
    };
    if let Some(id) = filing_scoped {
        let qualifiers = [
            ("year", args.year.is_some()),
            ("period", args.period.is_some()),
            ("start_year", args.start_year.is_some()),
            ("end_year", args.end_year.is_some()),
            ("start_period", args.start_period.is_some()),
            ("end_period", args.end_period.is_some()),
            ("all_history", args.all_history),
            ("period_type", args.period_type.is_some()),
        ];
        if let Some((other, _)) = qualifiers.iter().find(|(_, set)| *set) {
            return Err(ValidationError::FilingScoped { id, other });
        }
    }

    if args.all_history {
        let explicit = [
            ("year", args.year.is_some()),
            ("period", args.period.is_some()),
            ("start_year", args.start_year.is_some()),
            ("end_year", args.end_year.is_some()),
            ("start_period", args.start_period.is_some()),
            ("end_period", args.end_period.is_some()),
        ];
        if let Some((name, _)) = explicit.iter().find(|(_, set)| *set) {
            return Err(ValidationError::AllHistoryWithPeriod(name));
        }
    }

    let has_year_range = args.start_year.is_some() || args.end_year.is_some();
    if args.year.is_some() && has_year_range {
        return Err(ValidationError::YearWithRange);
    }

    if let Some(period) = &args.period {
        if args.start_period.is_some() || args.end_period.is_some() {
            return Err(ValidationError::PeriodWithRange);
        }
        if has_year_range && !period.is_annual() {
            return Err(ValidationError::NonAnnualPeriodWithYearRange(period.to_string()));
        }
    }

    let has_date_range = args.start_date.is_some() || args.end_date.is_some();
    let has_qualifier = args.year.is_some()
        || has_year_range
        || args.all_history
        || args.period_type.is_some()
        || has_date_range
        || filing_scoped.is_some();
    if !has_qualifier {
        return Err(ValidationError::NoPeriodQualifier);
    }

    if args.include_preliminary && !args.point_in_time {
        return Err(ValidationError::PreliminaryWithoutPointInTime);
    }
    if args.point_in_time_v2 && !args.point_in_time {
        return Err(ValidationError::PointInTimeV2WithoutPointInTime);
    }
    if args.all_modifications && !has_date_range && args.filing_id.is_none() {
        return Err(ValidationError::AllModificationsWithoutScope);
    }

    if !metrics.is_empty() {
        if args.all_face {
            return Err(ValidationError::MetricsWithBulkSelection("all_face"));
        }
        if args.all_footnotes {
            return Err(ValidationError::MetricsWithBulkSelection("all_footnotes"));
        }
    }
    let selects_metrics = !metrics.is_empty()
        || args.all_face
        || args.all_footnotes
        || args.all_non_gaap
        || args.all_metrics
        || filing_scoped.is_some();
    if !selects_metrics {
        return Err(ValidationError::NoMetricSelection);
    }

    let companies = if let Some(id) = args.accession_id {
        CompanySelector::Accession(id)
    } else if let Some(id) = args.filing_id {
        CompanySelector::Filing(id)
    } else if args.entire_universe {
        CompanySelector::EntireUniverse
    } else {
        CompanySelector::Identifiers(identifiers)
    };

    let has_period_arg =
        args.period.is_some() || args.start_period.is_some() || args.end_period.is_some();
    let periods = if filing_scoped.is_some() {
        PeriodSelector::FixedByFiling
    } else if args.all_history {
        PeriodSelector::AllHistory
    } else if args.year.is_none() && !has_year_range && !has_period_arg {
        PeriodSelector::Unbounded
    } else if let Some(year) = &args.year {
        PeriodSelector::Single {
            year: year.normalized(),
            period: normalize_period(&args.period),
        }
    } else {
        let period = normalize_period(&args.period);
        PeriodSelector::Range {
            start_year: normalize_year(&args.start_year),
            start_period: normalize_period(&args.start_period).or_else(|| period.clone()),
            end_year: normalize_year(&args.end_year),
            end_period: normalize_period(&args.end_period).or(period),
        }
    };

    if args.period_type == Some(PeriodType::TrailingTwelveMonths)
        && args.all_history
        && metrics.len() != 1
    {
        return Err(ValidationError::TtmMetricCount(metrics.len()));
    }

    Ok(ValidatedQuery {
        companies,
        periods,
        period_type: args.period_type,
        metrics: MetricSelection {
            metrics,
            all_face: args.all_face,
            all_footnotes: args.all_footnotes,
            all_non_gaap: args.all_non_gaap,
            all_metrics: args.all_metrics,
        },
        use_fiscal_period: args.use_fiscal_period,
        point_in_time: args.point_in_time,
        include_preliminary: args.include_preliminary,
        include_trace: args.include_trace,
        include_xbrl: args.include_xbrl,
        update_date: args.update_date,
        start_date: args.start_date,
        end_date: args.end_date,
        all_modifications: args.all_modifications,
        xbrl_only: args.xbrl_only,
        point_in_time_v2: args.point_in_time_v2,
    })
}

/// Caller arguments for the disclosure (footnote) search endpoint.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisclosureArgs {
    pub company_identifiers: Option<ListArg<CompanyIdentifier>>,
    pub entire_universe: bool,
    pub accession_id: Option<i64>,
    /// Lucene-syntax full text query.
    pub full_text_search: Option<String>,
    pub document_type: Option<String>,
    pub block_tag_name: Option<String>,
    pub document_name: Option<String>,
    pub disclosure_names: Option<ListArg<String>>,
    pub all_documents: bool,
    pub all_text_blocks: bool,
    pub year: Option<YearArg>,
    pub period: PeriodArg,
    pub period_type: Option<PeriodType>,
    pub use_fiscal_period: bool,
    pub all_history: bool,
    pub updated_from: Option<NaiveDate>,
    pub limit: u32,
    pub sub_divide: bool,
}

impl Default for DisclosureArgs {
    fn default() -> Self {
        Self {
            company_identifiers: None,
            entire_universe: false,
            accession_id: None,
            full_text_search: None,
            document_type: None,
            block_tag_name: None,
            document_name: None,
            disclosure_names: None,
            all_documents: false,
            all_text_blocks: false,
            year: None,
            period: PeriodArg::Period(calcbench_api::types::Period::Annual),
            period_type: None,
            use_fiscal_period: false,
            all_history: false,
            updated_from: None,
            limit: DEFAULT_DISCLOSURE_LIMIT,
            sub_divide: false,
        }
    }
}

impl DisclosureArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifiers<I, C>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CompanyIdentifier>,
    {
        self.company_identifiers = Some(ListArg::Many(
            identifiers.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn with_entire_universe(mut self) -> Self {
        self.entire_universe = true;
        self
    }

    pub fn with_accession_id(mut self, id: i64) -> Self {
        self.accession_id = Some(id);
        self
    }

    pub fn with_full_text_search(mut self, query: impl Into<String>) -> Self {
        self.full_text_search = Some(query.into());
        self
    }

    pub fn with_disclosure_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disclosure_names = Some(ListArg::Many(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_year(mut self, year: impl Into<YearArg>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<PeriodArg>) -> Self {
        self.period = period.into();
        self
    }

    pub fn with_all_history(mut self) -> Self {
        self.all_history = true;
        self
    }

    pub fn with_updated_from(mut self, date: NaiveDate) -> Self {
        self.updated_from = Some(date);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Disclosure search arguments that passed every rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedDisclosureSearch {
    pub companies: CompanySelector,
    pub full_text_search: Option<String>,
    pub document_type: Option<String>,
    pub block_tag_name: Option<String>,
    pub document_name: Option<String>,
    pub disclosure_names: Vec<String>,
    pub all_documents: bool,
    pub all_text_blocks: bool,
    pub year: Option<YearArg>,
    pub period: Option<PeriodArg>,
    pub period_type: Option<PeriodType>,
    pub use_fiscal_period: bool,
    pub all_history: bool,
    pub updated_from: Option<NaiveDate>,
    pub limit: u32,
    pub sub_divide: bool,
}

/// Checks disclosure search arguments.
///
/// A year without an explicit period type searches annual documents when
/// the period is annual and quarterly ones otherwise.
pub fn validate_disclosure_search(
    args: &DisclosureArgs,
) -> Result<ValidatedDisclosureSearch, ValidationError> {
    let identifiers = list_values(&args.company_identifiers, "company_identifiers")?;
    check_identifiers(&identifiers)?;
    let disclosure_names = list_values(&args.disclosure_names, "disclosure_names")?;

    let has_search = args.full_text_search.is_some()
        || args.document_type.is_some()
        || args.block_tag_name.is_some()
        || args.document_name.is_some()
        || args.all_documents
        || args.all_text_blocks
        || !disclosure_names.is_empty();
    if !has_search {
        return Err(ValidationError::NoSearchParameter);
    }

    let mut company_modes = Vec::new();
    if !identifiers.is_empty() {
        company_modes.push("company_identifiers");
    }
    if args.entire_universe {
        company_modes.push("entire_universe");
    }
    if args.accession_id.is_some() {
        company_modes.push("accession_id");
    }
    if company_modes.len() != 1 {
        return Err(ValidationError::CompanySelection(company_modes));
    }

    let mut period_type = args.period_type;
    let open_ended = args.all_history || args.updated_from.is_some() || args.accession_id.is_some();
    if !open_ended {
        if args.year.is_none() {
            return Err(ValidationError::DisclosureYearRequired);
        }
        period_type = Some(if args.period.is_annual() {
            PeriodType::Annual
        } else {
            PeriodType::Quarterly
        });
    }
    // the server returns every disclosure when no period type is sent
    if args.all_history && period_type == Some(PeriodType::Quarterly) {
        period_type = None;
    }

    let companies = if let Some(id) = args.accession_id {
        CompanySelector::Accession(id)
    } else if args.entire_universe {
        CompanySelector::EntireUniverse
    } else {
        CompanySelector::Identifiers(identifiers)
    };

    Ok(ValidatedDisclosureSearch {
        companies,
        full_text_search: args.full_text_search.clone(),
        document_type: args.document_type.clone(),
        block_tag_name: args.block_tag_name.clone(),
        document_name: args.document_name.clone(),
        disclosure_names,
        all_documents: args.all_documents,
        all_text_blocks: args.all_text_blocks,
        year: normalize_year(&args.year),
        period: args.year.as_ref().map(|_| args.period.normalized()),
        period_type,
        use_fiscal_period: args.use_fiscal_period,
        all_history: args.all_history,
        updated_from: args.updated_from,
        limit: args.limit,
        sub_divide: args.sub_divide,
    })
}

/// Caller arguments for the company listing endpoint.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CompanyListArgs {
    /// `SP500` or `DJIA`.
    pub index: Option<String>,
    pub sic_codes: Vec<i64>,
    pub naics_codes: Vec<i64>,
    pub company_identifiers: Vec<CompanyIdentifier>,
    pub entire_universe: bool,
    pub include_most_recent_filing_extras: bool,
}

impl CompanyListArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_sic_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.sic_codes = codes.into_iter().collect();
        self
    }

    pub fn with_naics_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.naics_codes = codes.into_iter().collect();
        self
    }

    pub fn with_identifiers<I, C>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CompanyIdentifier>,
    {
        self.company_identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_entire_universe(mut self) -> Self {
        self.entire_universe = true;
        self
    }

    pub fn with_most_recent_filing_extras(mut self) -> Self {
        self.include_most_recent_filing_extras = true;
        self
    }
}

/// Which companies a listing covers. Exactly one filter.
#[derive(Clone, Debug, PartialEq)]
pub enum CompanyFilter {
    Index(MarketIndex),
    SicCodes(Vec<i64>),
    NaicsCodes(Vec<i64>),
    Identifiers(Vec<CompanyIdentifier>),
    EntireUniverse,
}

/// Company listing arguments that passed every rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedCompanyList {
    pub filter: CompanyFilter,
    pub include_most_recent_filing_extras: bool,
}

/// Checks company listing arguments: exactly one filter, and a known index.
pub fn validate_company_list(args: &CompanyListArgs) -> Result<ValidatedCompanyList, ValidationError> {
    check_identifiers(&args.company_identifiers)?;

    let mut filters = Vec::new();
    if args.index.is_some() {
        filters.push("index");
    }
    if !args.sic_codes.is_empty() {
        filters.push("sic_codes");
    }
    if !args.naics_codes.is_empty() {
        filters.push("naics_codes");
    }
    if !args.company_identifiers.is_empty() {
        filters.push("company_identifiers");
    }
    if args.entire_universe {
        filters.push("entire_universe");
    }
    if filters.len() != 1 {
        return Err(ValidationError::CompanyFilter(filters));
    }

    let filter = if let Some(index) = &args.index {
        CompanyFilter::Index(index.parse().map_err(ValidationError::UnknownIndex)?)
    } else if !args.sic_codes.is_empty() {
        CompanyFilter::SicCodes(args.sic_codes.clone())
    } else if !args.naics_codes.is_empty() {
        CompanyFilter::NaicsCodes(args.naics_codes.clone())
    } else if !args.company_identifiers.is_empty() {
        CompanyFilter::Identifiers(args.company_identifiers.clone())
    } else {
        CompanyFilter::EntireUniverse
    };

    Ok(ValidatedCompanyList {
        filter,
        include_most_recent_filing_extras: args.include_most_recent_filing_extras,
    })
}
