use anyhow::Result;
use calcbench_lib::{CalcbenchClient, DisclosureArgs};
use chrono::NaiveDate;
use clap::Args;

use crate::output::{print_disclosures_csv, print_disclosures_table, print_json, OutputFormat};

#[derive(Args)]
pub struct DisclosuresArgs {
    /// Ticker, CIK or company id (repeatable)
    #[arg(long = "ticker", num_args = 1..)]
    pub tickers: Vec<String>,

    /// Search every company the service covers
    #[arg(long)]
    pub entire_universe: bool,

    /// Only documents from this accession
    #[arg(long)]
    pub accession_id: Option<i64>,

    /// Disclosure name, e.g. RiskFactors (repeatable)
    #[arg(long = "disclosure", num_args = 1..)]
    pub disclosures: Vec<String>,

    /// Full-text query
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    /// 0 or Y for annual, 1-4 for quarters
    #[arg(long)]
    pub period: Option<String>,

    #[arg(long)]
    pub all_history: bool,

    /// Only documents filed or amended since this date (YYYY-MM-DD)
    #[arg(long)]
    pub updated_from: Option<NaiveDate>,

    /// Results per page
    #[arg(long, default_value = "100")]
    pub limit: u32,
}

impl DisclosuresArgs {
    pub fn to_search(&self) -> DisclosureArgs {
        let mut search = DisclosureArgs::new().with_limit(self.limit);

        if !self.tickers.is_empty() {
            search = search.with_identifiers(self.tickers.iter().map(String::as_str));
        }
        if self.entire_universe {
            search = search.with_entire_universe();
        }
        if let Some(id) = self.accession_id {
            search = search.with_accession_id(id);
        }
        if !self.disclosures.is_empty() {
            search = search.with_disclosure_names(self.disclosures.iter().map(String::as_str));
        }
        if let Some(text) = &self.search {
            search = search.with_full_text_search(text.as_str());
        }
        if let Some(year) = &self.year {
            search = search.with_year(year.as_str());
        }
        if let Some(period) = &self.period {
            search = search.with_period(period.as_str());
        }
        if self.all_history {
            search = search.with_all_history();
        }
        if let Some(date) = self.updated_from {
            search = search.with_updated_from(date);
        }

        search
    }
}

pub async fn run(
    args: &DisclosuresArgs,
    client: &CalcbenchClient,
    format: &OutputFormat,
) -> Result<()> {
    let stream = client.disclosure_search(&args.to_search())?;
    eprintln!("Searching {} batch(es)...", stream.batch_count());

    let results = stream.collect_all().await?;
    eprintln!("{} disclosures found", results.len());

    match format {
        OutputFormat::Table => print_disclosures_table(&results),
        OutputFormat::Json => print_json(&results),
        OutputFormat::Csv => print_disclosures_csv(&results)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use calcbench_lib::types::PeriodType;
    use calcbench_lib::{validate_disclosure_search, ValidationError};
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DisclosuresArgs,
    }

    fn parse(argv: &[&str]) -> DisclosuresArgs {
        let mut full = vec!["calcbench"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_default_limit() {
        let args = parse(&["--ticker", "msft", "--disclosure", "RiskFactors", "--year", "2020"]);
        assert_eq!(args.limit, 100);
        let search = validate_disclosure_search(&args.to_search()).unwrap();
        assert_eq!(search.period_type, Some(PeriodType::Annual));
    }

    #[test]
    fn test_year_required_without_history() {
        let args = parse(&["--ticker", "msft", "--disclosure", "RiskFactors"]);
        assert!(matches!(
            validate_disclosure_search(&args.to_search()),
            Err(ValidationError::DisclosureYearRequired)
        ));
    }

    #[test]
    fn test_updated_from_parses_date() {
        let args = parse(&[
            "--entire-universe",
            "--search",
            "goodwill",
            "--updated-from",
            "2021-06-30",
        ]);
        assert_eq!(args.updated_from, NaiveDate::from_ymd_opt(2021, 6, 30));
        assert!(validate_disclosure_search(&args.to_search()).is_ok());
    }

    #[test]
    fn test_bad_date_rejected_by_parser() {
        let result = TestCli::try_parse_from(["calcbench", "--updated-from", "last week"]);
        assert!(result.is_err());
    }
}
