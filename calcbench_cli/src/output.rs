use std::io::Write;

use anyhow::Result;
use calcbench_lib::types::{CompanyRecord, DisclosureResult, MetricCatalog};
use calcbench_lib::{Diagnostics, WideTable};
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct DisclosureRow {
    #[tabled(rename = "Ticker")]
    #[serde(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Entity")]
    #[serde(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Disclosure")]
    #[serde(rename = "Disclosure")]
    disclosure: String,
    #[tabled(rename = "Fiscal Year")]
    #[serde(rename = "Fiscal Year")]
    fiscal_year: String,
    #[tabled(rename = "Period")]
    #[serde(rename = "Period")]
    period: String,
    #[tabled(rename = "Filed")]
    #[serde(rename = "Filed")]
    filed: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Tabled, Serialize)]
struct CompanyRow {
    #[tabled(rename = "Ticker")]
    #[serde(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Entity")]
    #[serde(rename = "Entity")]
    entity: String,
    #[tabled(rename = "CIK")]
    #[serde(rename = "CIK")]
    cik: String,
    #[tabled(rename = "SIC")]
    #[serde(rename = "SIC")]
    sic: String,
    #[tabled(rename = "NAICS")]
    #[serde(rename = "NAICS")]
    naics: String,
    #[tabled(rename = "Last Filing")]
    #[serde(rename = "Last Filing")]
    most_recent_filing: String,
}

#[derive(Tabled, Serialize)]
struct MetricRow {
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
}

// -- Row builders --

fn build_company_rows(companies: &[CompanyRecord]) -> Vec<CompanyRow> {
    companies
        .iter()
        .map(|c| CompanyRow {
            ticker: c.ticker.clone(),
            entity: c.entity_name.clone().unwrap_or_default(),
            cik: c.entity_code.clone().unwrap_or_default(),
            sic: c.sic_code.map(|v| v.to_string()).unwrap_or_default(),
            naics: c.naics_code.map(|v| v.to_string()).unwrap_or_default(),
            most_recent_filing: c
                .most_recent_filing
                .map(|d| d.to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn build_metric_rows(catalog: &MetricCatalog) -> Vec<MetricRow> {
    catalog
        .iter()
        .flat_map(|(category, metrics)| {
            metrics.iter().map(move |m| MetricRow {
                category: category.clone(),
                metric: m.metric.clone().unwrap_or_default(),
                description: m.description.clone().unwrap_or_default(),
            })
        })
        .collect()
}

fn build_disclosure_rows(results: &[DisclosureResult]) -> Vec<DisclosureRow> {
    results
        .iter()
        .map(|r| DisclosureRow {
            ticker: r.ticker.clone().unwrap_or_default(),
            entity: r.entity_name.clone().unwrap_or_default(),
            disclosure: r.disclosure_type_name.clone().unwrap_or_default(),
            fiscal_year: r.fiscal_year.map(|y| y.to_string()).unwrap_or_default(),
            period: r.fiscal_period.map(|p| p.to_string()).unwrap_or_default(),
            filed: r.filing_date.clone().unwrap_or_default(),
            url: r.sec_url.clone().unwrap_or_default(),
        })
        .collect()
}

fn has_publish_times(table: &WideTable) -> bool {
    table.rows().iter().any(|r| r.date_reported.is_some())
}

/// Header and cell text for a wide table. The first column is the period;
/// point-in-time tables get a second `date_reported` column.
fn wide_records(table: &WideTable) -> Vec<Vec<String>> {
    let with_times = has_publish_times(table);

    let mut header = vec!["period".to_string()];
    if with_times {
        header.push("date_reported".to_string());
    }
    header.extend(table.columns().iter().map(|c| c.to_string()));

    let mut records = vec![header];
    for (i, key) in table.rows().iter().enumerate() {
        let mut record = vec![key.period.to_string()];
        if with_times {
            record.push(key.date_reported.map(|t| t.to_string()).unwrap_or_default());
        }
        if let Some(cells) = table.row(i) {
            record.extend(cells.iter().map(|c| c.to_string()));
        }
        records.push(record);
    }
    records
}

fn wide_json(table: &WideTable) -> Result<Value> {
    let with_times = has_publish_times(table);
    let mut rows = Vec::with_capacity(table.rows().len());
    for (i, key) in table.rows().iter().enumerate() {
        let mut obj = Map::new();
        obj.insert("period".to_string(), serde_json::to_value(key.period)?);
        if with_times {
            obj.insert(
                "date_reported".to_string(),
                serde_json::to_value(key.date_reported)?,
            );
        }
        if let Some(cells) = table.row(i) {
            for (column, cell) in table.columns().iter().zip(cells) {
                obj.insert(column.to_string(), serde_json::to_value(cell)?);
            }
        }
        rows.push(Value::Object(obj));
    }
    Ok(Value::Array(rows))
}

// -- Table output --

fn wide_table(table: &WideTable) -> Table {
    let mut builder = Builder::default();
    for record in wide_records(table) {
        builder.push_record(record);
    }
    builder.build()
}

pub fn print_wide_table(table: &WideTable) {
    if table.is_empty() {
        eprintln!("No rows");
        return;
    }
    println!("{}", wide_table(table));
}

pub fn print_disclosures_table(results: &[DisclosureResult]) {
    println!("{}", Table::new(build_disclosure_rows(results)));
}

pub fn print_companies_table(companies: &[CompanyRecord]) {
    println!("{}", Table::new(build_company_rows(companies)));
}

pub fn print_metrics_table(catalog: &MetricCatalog) {
    println!("{}", Table::new(build_metric_rows(catalog)));
}

// -- CSV output --

fn write_wide_csv<W: Write>(table: &WideTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in wide_records(table) {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_wide_csv(table: &WideTable) -> Result<()> {
    write_wide_csv(table, std::io::stdout())
}

pub fn print_disclosures_csv(results: &[DisclosureResult]) -> Result<()> {
    write_rows_csv(build_disclosure_rows(results), std::io::stdout())
}

pub fn print_companies_csv(companies: &[CompanyRecord]) -> Result<()> {
    write_rows_csv(build_company_rows(companies), std::io::stdout())
}

pub fn print_metrics_csv(catalog: &MetricCatalog) -> Result<()> {
    write_rows_csv(build_metric_rows(catalog), std::io::stdout())
}

fn write_rows_csv<R: Serialize, W: Write>(rows: Vec<R>, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_wide_json(table: &WideTable) {
    match wide_json(table) {
        Ok(value) => print_json(&value),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Diagnostics --

fn diagnostic_lines(diagnostics: &Diagnostics) -> Vec<String> {
    let mut lines = Vec::new();
    if diagnostics.no_data {
        lines.push("No data found".to_string());
    }
    if !diagnostics.missing_metrics.is_empty() {
        lines.push(format!(
            "Missing metrics: {}",
            diagnostics.missing_metrics.join(", ")
        ));
    }
    lines
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for line in diagnostic_lines(diagnostics) {
        eprintln!("{}", line);
    }
}
