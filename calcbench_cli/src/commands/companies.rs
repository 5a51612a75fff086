use anyhow::Result;
use calcbench_lib::{CalcbenchClient, CompanyListArgs};
use clap::Args;

use crate::output::{print_companies_csv, print_companies_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CompaniesArgs {
    /// SP500 or DJIA
    #[arg(long)]
    pub index: Option<String>,

    /// SIC code, e.g. 7372 (repeatable)
    #[arg(long = "sic", num_args = 1..)]
    pub sic_codes: Vec<i64>,

    /// NAICS code (repeatable)
    #[arg(long = "naics", num_args = 1..)]
    pub naics_codes: Vec<i64>,

    /// Ticker, CIK or company id (repeatable)
    #[arg(long = "ticker", num_args = 1..)]
    pub tickers: Vec<String>,

    /// Every company the service covers
    #[arg(long)]
    pub entire_universe: bool,

    /// Include most recent filing dates and periods
    #[arg(long)]
    pub most_recent_filings: bool,

    /// Print only the tickers, one per line
    #[arg(long)]
    pub tickers_only: bool,
}

impl CompaniesArgs {
    pub fn to_list(&self) -> CompanyListArgs {
        let mut list = CompanyListArgs::new();

        if let Some(index) = &self.index {
            list = list.with_index(index.as_str());
        }
        if !self.sic_codes.is_empty() {
            list = list.with_sic_codes(self.sic_codes.iter().copied());
        }
        if !self.naics_codes.is_empty() {
            list = list.with_naics_codes(self.naics_codes.iter().copied());
        }
        if !self.tickers.is_empty() {
            list = list.with_identifiers(self.tickers.iter().map(String::as_str));
        }
        if self.entire_universe {
            list = list.with_entire_universe();
        }
        if self.most_recent_filings {
            list = list.with_most_recent_filing_extras();
        }

        list
    }
}

pub async fn run(args: &CompaniesArgs, client: &CalcbenchClient, format: &OutputFormat) -> Result<()> {
    if args.tickers_only {
        let tickers = client.tickers(&args.to_list()).await?;
        match format {
            OutputFormat::Json => print_json(&tickers),
            _ => tickers.iter().for_each(|t| println!("{}", t)),
        }
        return Ok(());
    }

    let companies = client.companies(&args.to_list()).await?;
    eprintln!("{} companies", companies.len());

    match format {
        OutputFormat::Table => print_companies_table(&companies),
        OutputFormat::Json => print_json(&companies),
        OutputFormat::Csv => print_companies_csv(&companies)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use calcbench_lib::types::MarketIndex;
    use calcbench_lib::{validate_company_list, CompanyFilter, ValidationError};
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CompaniesArgs,
    }

    fn parse(argv: &[&str]) -> CompaniesArgs {
        let mut full = vec!["calcbench"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_index_flag() {
        let list = validate_company_list(&parse(&["--index", "djia"]).to_list()).unwrap();
        assert_eq!(list.filter, CompanyFilter::Index(MarketIndex::Djia));
    }

    #[test]
    fn test_sic_codes_repeat() {
        let args = parse(&["--sic", "1200", "1300", "--most-recent-filings"]);
        let list = validate_company_list(&args.to_list()).unwrap();
        assert_eq!(list.filter, CompanyFilter::SicCodes(vec![1200, 1300]));
        assert!(list.include_most_recent_filing_extras);
    }

    #[test]
    fn test_universe_with_filter_rejected_by_library() {
        let args = parse(&["--entire-universe", "--ticker", "msft"]);
        assert!(matches!(
            validate_company_list(&args.to_list()),
            Err(ValidationError::CompanyFilter(_))
        ));
    }
}
