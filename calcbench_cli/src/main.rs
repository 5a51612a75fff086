mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use calcbench_lib::{credentials_from_env, CalcbenchClient, ClientConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "calcbench")]
#[command(about = "Query standardized financials and disclosures from Calcbench")]
struct Cli {
    /// Output format: table, json or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Standardized metrics pivoted by period
    Standardized(Box<commands::standardized::StandardizedArgs>),
    /// Search footnotes and other disclosures
    Disclosures(commands::disclosures::DisclosuresArgs),
    /// List companies by index, industry code or identifier
    Companies(commands::companies::CompaniesArgs),
    /// Show the standardized metrics dictionary
    Metrics(commands::metrics::MetricsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("calcbench=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    };

    let config = ClientConfig::from_env();
    let credentials = credentials_from_env()?;
    let client = CalcbenchClient::connect(&config, &credentials).await?;

    let result = match &cli.command {
        Commands::Standardized(args) => {
            commands::standardized::run(args.as_ref(), &client, &format).await
        }
        Commands::Disclosures(args) => commands::disclosures::run(args, &client, &format).await,
        Commands::Companies(args) => commands::companies::run(args, &client, &format).await,
        Commands::Metrics(args) => commands::metrics::run(args, &client, &format).await,
    };

    client.close();
    result
}
