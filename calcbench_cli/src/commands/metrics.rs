use anyhow::Result;
use calcbench_lib::CalcbenchClient;
use clap::Args;

use crate::output::{print_json, print_metrics_csv, print_metrics_table, OutputFormat};

#[derive(Args)]
pub struct MetricsArgs {
    /// Only this category, e.g. "Income Statement"
    #[arg(long)]
    pub category: Option<String>,
}

pub async fn run(args: &MetricsArgs, client: &CalcbenchClient, format: &OutputFormat) -> Result<()> {
    let mut catalog = client.available_metrics().await?;
    if let Some(category) = &args.category {
        catalog.retain(|name, _| name.eq_ignore_ascii_case(category));
    }

    match format {
        OutputFormat::Table => print_metrics_table(&catalog),
        OutputFormat::Json => print_json(&catalog),
        OutputFormat::Csv => print_metrics_csv(&catalog)?,
    }

    Ok(())
}
