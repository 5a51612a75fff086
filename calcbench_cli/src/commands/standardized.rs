use anyhow::Result;
use calcbench_lib::types::{parse_timestamp, PeriodType};
use calcbench_lib::{CalcbenchClient, Orientation, StandardizedArgs as StandardizedQuery};
use chrono::NaiveDateTime;
use clap::Args;

use crate::output::{
    print_diagnostics, print_wide_csv, print_wide_json, print_wide_table, OutputFormat,
};

#[derive(Args)]
pub struct StandardizedArgs {
    /// Ticker, CIK or company id (repeatable)
    #[arg(long = "ticker", num_args = 1..)]
    pub tickers: Vec<String>,

    /// Query every company the service covers
    #[arg(long)]
    pub entire_universe: bool,

    /// Restrict to the facts of a single filing
    #[arg(long)]
    pub filing_id: Option<i64>,

    /// Restrict to the facts of a single accession
    #[arg(long)]
    pub accession_id: Option<i64>,

    /// Metric name, e.g. revenue (repeatable)
    #[arg(long = "metric", num_args = 1..)]
    pub metrics: Vec<String>,

    /// Single fiscal year
    #[arg(long)]
    pub year: Option<String>,

    /// Single period: 0 or Y for annual, 1-4 for quarters
    #[arg(long)]
    pub period: Option<String>,

    #[arg(long)]
    pub start_year: Option<String>,

    #[arg(long)]
    pub end_year: Option<String>,

    #[arg(long)]
    pub start_period: Option<String>,

    #[arg(long)]
    pub end_period: Option<String>,

    /// Every period the service has
    #[arg(long)]
    pub all_history: bool,

    /// annual, quarterly, combined or TTM
    #[arg(long, value_parser = parse_period_type)]
    pub period_type: Option<PeriodType>,

    /// Key rows by fiscal rather than calendar periods
    #[arg(long)]
    pub fiscal: bool,

    /// Keep every published revision, keyed by publish time
    #[arg(long)]
    pub point_in_time: bool,

    /// Include preliminary (press release) values; needs --point-in-time
    #[arg(long)]
    pub preliminary: bool,

    /// Revised point-in-time format; needs --point-in-time
    #[arg(long)]
    pub point_in_time_v2: bool,

    /// Only values published on or after this date (YYYY-MM-DD, optional time)
    #[arg(long, value_parser = parse_date_time)]
    pub start_date: Option<NaiveDateTime>,

    /// Only values published on or before this date
    #[arg(long, value_parser = parse_date_time)]
    pub end_date: Option<NaiveDateTime>,

    /// Every revision in the date window or filing, not just the latest
    #[arg(long)]
    pub all_modifications: bool,

    /// Only XBRL-tagged values
    #[arg(long)]
    pub xbrl_only: bool,

    /// Include the XBRL facts behind each value
    #[arg(long)]
    pub trace: bool,

    #[arg(long)]
    pub all_face: bool,

    #[arg(long)]
    pub all_footnotes: bool,

    /// Column levels: metric-entity or entity-metric
    #[arg(long, default_value = "metric-entity")]
    pub orientation: String,
}

fn parse_period_type(s: &str) -> Result<PeriodType, String> {
    s.parse()
}

fn parse_date_time(s: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(s).ok_or_else(|| format!("'{}' is not a date", s))
}

impl StandardizedArgs {
    /// Maps flags onto a library query. Conflicting flags are left for the
    /// library's validator to reject.
    pub fn to_query(&self) -> StandardizedQuery {
        let mut query = StandardizedQuery::new();

        if !self.tickers.is_empty() {
            query = query.with_identifiers(self.tickers.iter().map(String::as_str));
        }
        if self.entire_universe {
            query = query.with_entire_universe();
        }
        if let Some(id) = self.filing_id {
            query = query.with_filing_id(id);
        }
        if let Some(id) = self.accession_id {
            query = query.with_accession_id(id);
        }
        if !self.metrics.is_empty() {
            query = query.with_metrics(self.metrics.iter().map(String::as_str));
        }

        if let Some(year) = &self.year {
            query = query.with_year(year.as_str());
        }
        if let Some(period) = &self.period {
            query = query.with_period(period.as_str());
        }
        if let Some(year) = &self.start_year {
            query = query.with_start_year(year.as_str());
        }
        if let Some(year) = &self.end_year {
            query = query.with_end_year(year.as_str());
        }
        if let Some(period) = &self.start_period {
            query = query.with_start_period(period.as_str());
        }
        if let Some(period) = &self.end_period {
            query = query.with_end_period(period.as_str());
        }
        if self.all_history {
            query = query.with_all_history();
        }
        if let Some(period_type) = self.period_type {
            query = query.with_period_type(period_type);
        }

        if self.fiscal {
            query = query.with_fiscal_periods();
        }
        if self.point_in_time {
            query = query.with_point_in_time();
        }
        if self.preliminary {
            query = query.with_preliminary();
        }
        if self.point_in_time_v2 {
            query = query.with_point_in_time_v2();
        }
        if let Some(start) = self.start_date {
            query = query.with_start_date(start);
        }
        if let Some(end) = self.end_date {
            query = query.with_end_date(end);
        }
        if self.all_modifications {
            query = query.with_all_modifications();
        }
        if self.xbrl_only {
            query = query.with_xbrl_only();
        }
        if self.trace {
            query = query.with_trace();
        }
        if self.all_face {
            query = query.with_all_face();
        }
        if self.all_footnotes {
            query = query.with_all_footnotes();
        }

        query
    }

    pub fn orientation(&self) -> Orientation {
        match self.orientation.as_str() {
            "entity-metric" => Orientation::EntityMetric,
            _ => Orientation::MetricEntity,
        }
    }
}

pub async fn run(
    args: &StandardizedArgs,
    client: &CalcbenchClient,
    format: &OutputFormat,
) -> Result<()> {
    let outcome = client
        .standardized_table(&args.to_query(), args.orientation())
        .await?;

    print_diagnostics(&outcome.diagnostics);

    match format {
        OutputFormat::Table => print_wide_table(&outcome.table),
        OutputFormat::Json => print_wide_json(&outcome.table),
        OutputFormat::Csv => print_wide_csv(&outcome.table)?,
    }

    Ok(())
}
