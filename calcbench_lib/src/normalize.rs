//! Long-to-wide reshaping of standardized facts.
//!
//! [`normalize`] turns wire records into [`NormalizedFact`]s: canonical
//! entity, row key and a coerced cell value. [`pivot`] groups those by
//! (entity, metric, row) into a typed builder and finalizes it into a
//! [`WideTable`] whose columns always include every requested metric.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use calcbench_api::types::{parse_timestamp, FactRecord, Period, TraceFact};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::error::CalcbenchError;
use crate::period::{period_key, PeriodBasis, PeriodKey, PivotFrequency};
use crate::validation::ValidatedQuery;

/// A single table value after coercion.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Date(d) => write!(f, "{}", d),
            Cell::Text(t) => write!(f, "{}", t),
        }
    }
}

fn is_date_metric(metric: &str) -> bool {
    metric.to_ascii_lowercase().contains("date")
}

/// Coerces a wire value: numbers first, then numeric text. Text of metrics
/// whose name mentions a date is parsed as a date. Anything else is kept.
pub fn coerce_value(metric: &str, value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Cell::Number(n);
                }
            }
            if is_date_metric(metric) {
                if let Some(ts) = parse_timestamp(trimmed) {
                    return Cell::Date(ts.date());
                }
            }
            Cell::Text(s.clone())
        }
        other => Cell::Text(other.to_string()),
    }
}

/// Which level comes first in a column key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// `(metric, entity)` columns.
    #[default]
    MetricEntity,
    /// `(entity, metric)` columns.
    EntityMetric,
}

/// What to pivot and how.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PivotOptions {
    /// Requested metrics. Matched case-insensitively; columns use this spelling.
    pub metrics: Vec<String>,
    /// Requested entities. Always appear among the column entities.
    pub entities: Vec<String>,
    pub frequency: PivotFrequency,
    pub basis: PeriodBasis,
    pub orientation: Orientation,
    /// Key rows additionally by publish timestamp.
    pub point_in_time: bool,
}

impl PivotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options matching what a validated query asked for.
    pub fn from_query(query: &ValidatedQuery, orientation: Orientation) -> Self {
        Self {
            metrics: query.metrics.metrics.clone(),
            entities: query.companies.entities(),
            frequency: query.pivot_frequency(),
            basis: PeriodBasis::from_fiscal(query.use_fiscal_period),
            orientation,
            point_in_time: query.point_in_time,
        }
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_frequency(mut self, frequency: PivotFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_basis(mut self, basis: PeriodBasis) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_point_in_time(mut self, point_in_time: bool) -> Self {
        self.point_in_time = point_in_time;
        self
    }
}

/// A fact after normalization, before pivoting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedFact {
    /// Uppercased ticker.
    pub entity: String,
    /// Requested spelling when the metric was requested, otherwise as received.
    pub metric: String,
    pub period: PeriodKey,
    pub value: Cell,
    pub revision_number: Option<i64>,
    pub preliminary: Option<bool>,
    pub date_reported: Option<NaiveDateTime>,
    pub calendar_year: Option<i32>,
    pub calendar_period: Option<Period>,
    pub fiscal_year: Option<i32>,
    pub fiscal_period: Option<Period>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace_facts: Vec<TraceFact>,
}

/// Row key of a [`WideTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowKey {
    pub period: PeriodKey,
    /// Only set in point-in-time mode.
    pub date_reported: Option<NaiveDateTime>,
}

impl RowKey {
    pub fn new(period: PeriodKey) -> Self {
        Self {
            period,
            date_reported: None,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date_reported {
            Some(ts) => write!(f, "{} @ {}", self.period, ts),
            None => write!(f, "{}", self.period),
        }
    }
}

/// Two-level column key. Level order follows the table's [`Orientation`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnKey {
    pub first: String,
    pub second: String,
}

impl ColumnKey {
    pub fn new(orientation: Orientation, metric: &str, entity: &str) -> Self {
        let (first, second) = match orientation {
            Orientation::MetricEntity => (metric, entity),
            Orientation::EntityMetric => (entity, metric),
        };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}

/// One of the rows behind a duplicate-key failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicateRow {
    pub entity: String,
    pub metric: String,
    pub period: PeriodKey,
    pub date_reported: Option<NaiveDateTime>,
    pub revision_number: Option<i64>,
    pub value: Cell,
}

impl From<&NormalizedFact> for DuplicateRow {
    fn from(fact: &NormalizedFact) -> Self {
        Self {
            entity: fact.entity.clone(),
            metric: fact.metric.clone(),
            period: fact.period,
            date_reported: fact.date_reported,
            revision_number: fact.revision_number,
            value: fact.value.clone(),
        }
    }
}

impl fmt::Display for DuplicateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.entity, self.metric, self.period)?;
        if let Some(ts) = self.date_reported {
            write!(f, " @ {}", ts)?;
        }
        if let Some(rev) = self.revision_number {
            write!(f, " rev {}", rev)?;
        }
        write!(f, " = {:?}", self.value.to_string())
    }
}

/// Fixed-schema result of a pivot.
#[derive(Clone, Debug, PartialEq)]
pub struct WideTable {
    orientation: Orientation,
    columns: Vec<ColumnKey>,
    rows: Vec<RowKey>,
    /// Row-major, `rows.len()` by `columns.len()`.
    cells: Vec<Vec<Cell>>,
}

impl WideTable {
    pub fn empty(orientation: Orientation) -> Self {
        Self {
            orientation,
            columns: Vec::new(),
            rows: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowKey] {
        &self.rows
    }

    /// True when no row holds data. Columns may still be present.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    /// Key of the column holding `metric` for `entity`.
    pub fn column_key(&self, metric: &str, entity: &str) -> ColumnKey {
        ColumnKey::new(self.orientation, metric, entity)
    }

    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    pub fn value(&self, row: &RowKey, column: &ColumnKey) -> Option<&Cell> {
        let r = self.rows.iter().position(|k| k == row)?;
        let c = self.column_index(column)?;
        self.cells.get(r)?.get(c)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, key: &ColumnKey) -> Option<Vec<&Cell>> {
        let c = self.column_index(key)?;
        Some(self.cells.iter().filter_map(|row| row.get(c)).collect())
    }
}

/// Non-fatal findings of a pivot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Requested metrics with no facts, in requested spelling.
    pub missing_metrics: Vec<String>,
    /// The input held no records at all.
    pub no_data: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PivotOutcome {
    pub table: WideTable,
    pub diagnostics: Diagnostics,
}

/// Requested metrics deduplicated case-insensitively, keyed by lowercase name.
fn requested_metrics(options: &PivotOptions) -> (Vec<String>, HashMap<String, String>) {
    let mut order = Vec::new();
    let mut spelling = HashMap::new();
    for metric in &options.metrics {
        let lower = metric.to_lowercase();
        if !spelling.contains_key(&lower) {
            spelling.insert(lower, metric.clone());
            order.push(metric.clone());
        }
    }
    (order, spelling)
}

fn requested_entities(options: &PivotOptions) -> Vec<String> {
    let mut seen = HashSet::new();
    options
        .entities
        .iter()
        .map(|e| e.trim().to_uppercase())
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

/// Normalizes records and sorts them by entity, metric, calendar year,
/// calendar period (annual after quarters) and publish time.
pub fn normalize(records: &[FactRecord], options: &PivotOptions) -> Vec<NormalizedFact> {
    let (_, mut spelling) = requested_metrics(options);
    let mut facts: Vec<NormalizedFact> = records
        .iter()
        .map(|record| {
            let metric = spelling
                .entry(record.metric.to_lowercase())
                .or_insert_with(|| record.metric.clone())
                .clone();
            let (year, period) = options.basis.select(record);
            NormalizedFact {
                entity: record.ticker.trim().to_uppercase(),
                value: coerce_value(&metric, &record.value),
                metric,
                period: period_key(year, period, options.frequency),
                revision_number: record.revision_number,
                preliminary: record.preliminary,
                date_reported: record.date_reported,
                calendar_year: record.calendar_year,
                calendar_period: record.calendar_period,
                fiscal_year: record.fiscal_year,
                fiscal_period: record.fiscal_period,
                trace_facts: record.trace_facts.clone().unwrap_or_default(),
            }
        })
        .collect();
    facts.sort_by(|a, b| {
        (
            &a.entity,
            &a.metric,
            a.calendar_year,
            a.calendar_period,
            a.date_reported,
        )
            .cmp(&(
                &b.entity,
                &b.metric,
                b.calendar_year,
                b.calendar_period,
                b.date_reported,
            ))
    });
    facts
}

/// Picks the surviving fact of a key group, or reports every row of it.
///
/// Several facts for one key survive only as a restatement chain: every
/// fact carries a revision number and the highest one is unique.
fn resolve_group<'f>(group: &[&'f NormalizedFact]) -> Result<&'f NormalizedFact, Vec<DuplicateRow>> {
    if let [only] = group {
        return Ok(*only);
    }
    let revisions: Option<Vec<i64>> = group.iter().map(|f| f.revision_number).collect();
    if let Some(revisions) = revisions {
        if let Some(&max) = revisions.iter().max() {
            let mut latest = group.iter().filter(|f| f.revision_number == Some(max));
            if let (Some(winner), None) = (latest.next(), latest.next()) {
                return Ok(*winner);
            }
        }
    }
    Err(group.iter().map(|f| DuplicateRow::from(*f)).collect())
}

/// Pivots records into a wide table.
///
/// Empty input is not an error: the table has no rows, keeps a column for
/// every requested metric and entity, and [`Diagnostics::no_data`] is set.
/// Duplicate keys that no revision number disambiguates abort with
/// [`CalcbenchError::DuplicateKeys`].
pub fn pivot(records: &[FactRecord], options: &PivotOptions) -> Result<PivotOutcome, CalcbenchError> {
    let (requested, _) = requested_metrics(options);
    if records.is_empty() {
        tracing::warn!("no data found");
        let columns = column_pairs(&requested, &requested_entities(options), options.orientation);
        return Ok(PivotOutcome {
            table: WideTable {
                orientation: options.orientation,
                columns: column_keys(&columns, options.orientation),
                rows: Vec::new(),
                cells: Vec::new(),
            },
            diagnostics: Diagnostics {
                missing_metrics: requested,
                no_data: true,
            },
        });
    }

    let facts = normalize(records, options);

    let observed: HashSet<String> = facts.iter().map(|f| f.metric.to_lowercase()).collect();
    let missing_metrics: Vec<String> = requested
        .iter()
        .filter(|m| !observed.contains(&m.to_lowercase()))
        .cloned()
        .collect();
    for metric in &missing_metrics {
        tracing::warn!("missing metric {}", metric);
    }

    let mut groups: BTreeMap<(&str, &str, RowKey), Vec<&NormalizedFact>> = BTreeMap::new();
    for fact in &facts {
        let row = RowKey {
            period: fact.period,
            date_reported: if options.point_in_time {
                fact.date_reported
            } else {
                None
            },
        };
        groups
            .entry((fact.entity.as_str(), fact.metric.as_str(), row))
            .or_default()
            .push(fact);
    }

    let mut builder: BTreeMap<(String, String), BTreeMap<RowKey, Cell>> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for ((entity, metric, row), group) in &groups {
        match resolve_group(group) {
            Ok(fact) => {
                if group.len() > 1 {
                    tracing::debug!(
                        "{} {} {}: keeping revision {:?} of {}",
                        entity,
                        metric,
                        row,
                        fact.revision_number,
                        group.len()
                    );
                }
                builder
                    .entry((metric.to_string(), entity.to_string()))
                    .or_default()
                    .insert(*row, fact.value.clone());
            }
            Err(rows) => duplicates.extend(rows),
        }
    }
    if !duplicates.is_empty() {
        tracing::error!("{} rows share a pivot key", duplicates.len());
        return Err(CalcbenchError::DuplicateKeys(duplicates));
    }

    let metrics = ordered_levels(requested, facts.iter().map(|f| f.metric.as_str()));
    let entities = ordered_levels(
        requested_entities(options),
        facts.iter().map(|f| f.entity.as_str()),
    );

    let columns = column_pairs(&metrics, &entities, options.orientation);
    let rows: Vec<RowKey> = builder
        .values()
        .flat_map(|by_row| by_row.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    builder
                        .get(column)
                        .and_then(|by_row| by_row.get(row))
                        .cloned()
                        .unwrap_or(Cell::Null)
                })
                .collect()
        })
        .collect();

    Ok(PivotOutcome {
        table: WideTable {
            orientation: options.orientation,
            columns: column_keys(&columns, options.orientation),
            rows,
            cells,
        },
        diagnostics: Diagnostics {
            missing_metrics,
            no_data: false,
        },
    })
}

/// `(metric, entity)` pairs in column order.
fn column_pairs(
    metrics: &[String],
    entities: &[String],
    orientation: Orientation,
) -> Vec<(String, String)> {
    match orientation {
        Orientation::MetricEntity => metrics
            .iter()
            .flat_map(|m| entities.iter().map(move |e| (m.clone(), e.clone())))
            .collect(),
        Orientation::EntityMetric => entities
            .iter()
            .flat_map(|e| metrics.iter().map(move |m| (m.clone(), e.clone())))
            .collect(),
    }
}

fn column_keys(pairs: &[(String, String)], orientation: Orientation) -> Vec<ColumnKey> {
    pairs
        .iter()
        .map(|(m, e)| ColumnKey::new(orientation, m, e))
        .collect()
}

/// Requested values in requested order, then the remaining observed values
/// sorted.
fn ordered_levels<'f>(requested: Vec<String>, observed: impl Iterator<Item = &'f str>) -> Vec<String> {
    let known: HashSet<String> = requested.iter().cloned().collect();
    let extras: BTreeSet<&str> = observed.filter(|v| !known.contains(*v)).collect();
    requested
        .into_iter()
        .chain(extras.into_iter().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use calcbench_api::types::PeriodType;
    use serde_json::json;

    use super::*;

    fn fact(value: serde_json::Value) -> FactRecord {
        serde_json::from_value(value).unwrap()
    }

    fn revenue(ticker: &str, year: i32, period: i64, value: serde_json::Value) -> FactRecord {
        fact(json!({
            "ticker": ticker,
            "metric": "revenue",
            "value": value,
            "calendar_year": year,
            "calendar_period": period,
        }))
    }

    #[test]
    fn single_annual_fact() {
        let records = vec![revenue("acme", 2020, 0, json!("1000"))];
        let options = PivotOptions::new()
            .with_metrics(["revenue"])
            .with_entities(["ACME"]);
        let outcome = pivot(&records, &options).unwrap();
        let table = &outcome.table;

        assert_eq!(table.rows(), &[RowKey::new(PeriodKey::annual(2020))]);
        assert_eq!(table.columns(), &[table.column_key("revenue", "ACME")]);
        assert_eq!(
            table.value(&table.rows()[0], &table.column_key("revenue", "ACME")),
            Some(&Cell::Number(1000.0))
        );
        assert!(outcome.diagnostics.missing_metrics.is_empty());
        assert!(!outcome.diagnostics.no_data);
    }

    #[test]
    fn requested_but_absent_metric_is_backfilled() {
        let records = vec![
            revenue("acme", 2019, 0, json!(900)),
            revenue("acme", 2020, 0, json!(1000)),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue", "ebitda"])
            .with_entities(["acme"]);
        let outcome = pivot(&records, &options).unwrap();
        let table = &outcome.table;

        assert_eq!(
            table.columns(),
            &[
                table.column_key("revenue", "ACME"),
                table.column_key("ebitda", "ACME"),
            ]
        );
        let ebitda = table.column(&table.column_key("ebitda", "ACME")).unwrap();
        assert_eq!(ebitda.len(), 2);
        assert!(ebitda.iter().all(|c| c.is_null()));
        assert_eq!(outcome.diagnostics.missing_metrics, vec!["ebitda"]);
    }

    #[test]
    fn requested_entity_without_facts_gets_columns() {
        let records = vec![revenue("acme", 2020, 0, json!(1))];
        let options = PivotOptions::new()
            .with_metrics(["revenue"])
            .with_entities(["zzz", "acme"]);
        let table = pivot(&records, &options).unwrap().table;
        assert_eq!(
            table.columns(),
            &[
                table.column_key("revenue", "ZZZ"),
                table.column_key("revenue", "ACME"),
            ]
        );
    }

    #[test]
    fn metric_match_is_case_insensitive() {
        let records = vec![fact(json!({
            "ticker": "acme", "metric": "Revenue", "value": 5,
            "calendar_year": 2020, "calendar_period": 0
        }))];
        let options = PivotOptions::new().with_metrics(["REVENUE"]);
        let outcome = pivot(&records, &options).unwrap();
        assert!(outcome.diagnostics.missing_metrics.is_empty());
        assert_eq!(
            outcome.table.columns(),
            &[outcome.table.column_key("REVENUE", "ACME")]
        );
    }

    #[test]
    fn entity_metric_orientation() {
        let records = vec![
            revenue("b", 2020, 0, json!(1)),
            revenue("a", 2020, 0, json!(2)),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue", "assets"])
            .with_orientation(Orientation::EntityMetric);
        let table = pivot(&records, &options).unwrap().table;
        let names: Vec<String> = table.columns().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            vec!["A/revenue", "A/assets", "B/revenue", "B/assets"]
        );
    }

    #[test]
    fn quarterly_rows_sort_annual_after_quarters() {
        let records = vec![
            revenue("acme", 2020, 0, json!(10)),
            revenue("acme", 2020, 2, json!(3)),
            revenue("acme", 2020, 1, json!(2)),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue"])
            .with_frequency(PivotFrequency::Quarterly);
        let table = pivot(&records, &options).unwrap().table;
        let rows: Vec<String> = table.rows().iter().map(|r| r.to_string()).collect();
        assert_eq!(rows, vec!["2020Q1", "2020Q2", "2020"]);
    }

    #[test]
    fn combined_facts_pivot_without_collisions() {
        let records = vec![
            revenue("acme", 2020, 1, json!(2)),
            revenue("acme", 2020, 2, json!(3)),
            revenue("acme", 2020, 0, json!(10)),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue"])
            .with_frequency(PivotFrequency::resolve(None, None, Some(PeriodType::Combined)));
        assert_eq!(options.frequency, PivotFrequency::Annual);
        let table = pivot(&records, &options).unwrap().table;
        let rows: Vec<String> = table.rows().iter().map(|r| r.to_string()).collect();
        assert_eq!(rows, vec!["2020Q1", "2020Q2", "2020"]);
        assert_eq!(
            table.value(
                &RowKey::new(PeriodKey::annual(2020)),
                &table.column_key("revenue", "ACME")
            ),
            Some(&Cell::Number(10.0))
        );
    }

    #[test]
    fn descriptive_fact_lands_on_no_period_row() {
        let records = vec![
            revenue("acme", 2020, 1, json!(2)),
            fact(json!({"ticker": "acme", "metric": "EntityName", "value": "Acme Corp",
                        "calendar_year": null, "calendar_period": null})),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue", "EntityName"])
            .with_frequency(PivotFrequency::Quarterly);
        let table = pivot(&records, &options).unwrap().table;
        assert_eq!(table.rows()[0], RowKey::new(PeriodKey::NoPeriod));
        assert_eq!(
            table.value(&table.rows()[0], &table.column_key("EntityName", "ACME")),
            Some(&Cell::Text("Acme Corp".to_string()))
        );
    }

    #[test]
    fn fiscal_basis_keys_by_fiscal_fields() {
        let records = vec![fact(json!({
            "ticker": "msft", "metric": "revenue", "value": 1,
            "calendar_year": 2014, "calendar_period": 1,
            "fiscal_year": 2014, "fiscal_period": 3
        }))];
        let options = PivotOptions::new()
            .with_frequency(PivotFrequency::Quarterly)
            .with_basis(PeriodBasis::Fiscal);
        let outcome = pivot(&records, &options).unwrap();
        assert_eq!(
            outcome.table.rows(),
            &[RowKey::new(PeriodKey::quarter(2014, Period::Q3))]
        );
        let facts = normalize(&records, &options);
        assert_eq!(facts[0].calendar_period, Some(Period::Q1));
    }

    #[test]
    fn duplicates_without_revisions_are_rejected() {
        let records = vec![
            revenue("acme", 2020, 0, json!(1)),
            revenue("ACME", 2020, 0, json!(2)),
        ];
        let options = PivotOptions::new().with_metrics(["revenue"]);
        match pivot(&records, &options) {
            Err(CalcbenchError::DuplicateKeys(rows)) => {
                assert_eq!(rows.len(), 2);
                assert!(rows.iter().all(|r| r.entity == "ACME"));
                assert_eq!(rows[0].period, PeriodKey::annual(2020));
            }
            other => panic!("expected duplicate keys, got {:?}", other.map(|o| o.table)),
        }
    }

    #[test]
    fn highest_revision_wins() {
        let mut first = revenue("acme", 2020, 0, json!(1));
        first.revision_number = Some(0);
        let mut restated = revenue("acme", 2020, 0, json!(2));
        restated.revision_number = Some(1);
        let options = PivotOptions::new().with_metrics(["revenue"]);
        let table = pivot(&[restated, first], &options).unwrap().table;
        assert_eq!(table.row(0), Some(&[Cell::Number(2.0)][..]));
    }

    #[test]
    fn tied_revisions_are_rejected() {
        let mut a = revenue("acme", 2020, 0, json!(1));
        a.revision_number = Some(1);
        let mut b = revenue("acme", 2020, 0, json!(2));
        b.revision_number = Some(1);
        let options = PivotOptions::new().with_metrics(["revenue"]);
        assert!(matches!(
            pivot(&[a, b], &options),
            Err(CalcbenchError::DuplicateKeys(rows)) if rows.len() == 2
        ));
    }

    #[test]
    fn point_in_time_keeps_each_revision() {
        let records = vec![
            fact(json!({"ticker": "acme", "metric": "revenue", "value": 1,
                        "calendar_year": 2020, "calendar_period": 0,
                        "revision_number": 0, "date_reported": "2021-02-01T10:00:00"})),
            fact(json!({"ticker": "acme", "metric": "revenue", "value": 2,
                        "calendar_year": 2020, "calendar_period": 0,
                        "revision_number": 1, "date_reported": "2022-02-01T10:00:00"})),
        ];
        let options = PivotOptions::new()
            .with_metrics(["revenue"])
            .with_point_in_time(true);
        let table = pivot(&records, &options).unwrap().table;
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows()[0].date_reported < table.rows()[1].date_reported);
        assert_eq!(table.row(1), Some(&[Cell::Number(2.0)][..]));
    }

    #[test]
    fn pivot_is_idempotent() {
        let records = vec![
            revenue("b", 2020, 0, json!(1)),
            revenue("a", 2019, 0, json!("7")),
            fact(json!({"ticker": "a", "metric": "assets", "value": 3,
                        "calendar_year": 2020, "calendar_period": 0})),
        ];
        let options = PivotOptions::new().with_metrics(["revenue", "ebitda"]);
        assert_eq!(
            pivot(&records, &options).unwrap(),
            pivot(&records, &options).unwrap()
        );
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        let options = PivotOptions::new().with_metrics(["revenue"]);
        let outcome = pivot(&[], &options).unwrap();
        assert!(outcome.table.is_empty());
        assert!(outcome.diagnostics.no_data);
        assert_eq!(outcome.diagnostics.missing_metrics, vec!["revenue"]);
    }

    #[test]
    fn empty_input_keeps_requested_columns() {
        let options = PivotOptions::new()
            .with_metrics(["revenue", "ebitda"])
            .with_entities(["msft", "aapl"]);
        let table = pivot(&[], &options).unwrap().table;
        assert!(table.rows().is_empty());
        let names: Vec<String> = table.columns().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            vec!["revenue/MSFT", "revenue/AAPL", "ebitda/MSFT", "ebitda/AAPL"]
        );

        let flipped = pivot(&[], &options.with_orientation(Orientation::EntityMetric))
            .unwrap()
            .table;
        assert_eq!(flipped.columns()[1], flipped.column_key("ebitda", "MSFT"));
        assert_eq!(flipped.columns().len(), 4);
    }

    #[test]
    fn observed_extras_follow_requested_metrics() {
        let records = vec![
            fact(json!({"ticker": "a", "metric": "zeta", "value": 1,
                        "calendar_year": 2020, "calendar_period": 0})),
            fact(json!({"ticker": "a", "metric": "alpha", "value": 1,
                        "calendar_year": 2020, "calendar_period": 0})),
        ];
        let options = PivotOptions::new().with_metrics(["revenue"]);
        let table = pivot(&records, &options).unwrap().table;
        let first: Vec<&str> = table.columns().iter().map(|c| c.first.as_str()).collect();
        assert_eq!(first, vec!["revenue", "alpha", "zeta"]);
    }

    #[test]
    fn normalized_facts_are_sorted() {
        let records = vec![
            revenue("b", 2020, 1, json!(1)),
            revenue("a", 2020, 0, json!(1)),
            revenue("a", 2020, 4, json!(1)),
            revenue("a", 2019, 0, json!(1)),
        ];
        let facts = normalize(&records, &PivotOptions::new());
        let order: Vec<(String, Option<i32>, Option<Period>)> = facts
            .iter()
            .map(|f| (f.entity.clone(), f.calendar_year, f.calendar_period))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A".to_string(), Some(2019), Some(Period::Annual)),
                ("A".to_string(), Some(2020), Some(Period::Q4)),
                ("A".to_string(), Some(2020), Some(Period::Annual)),
                ("B".to_string(), Some(2020), Some(Period::Q1)),
            ]
        );
    }

    #[test]
    fn value_coercion() {
        assert_eq!(coerce_value("revenue", &json!("1,0")), Cell::Text("1,0".to_string()));
        assert_eq!(coerce_value("revenue", &json!(" 12.5 ")), Cell::Number(12.5));
        assert_eq!(coerce_value("revenue", &json!("NaN")), Cell::Text("NaN".to_string()));
        assert_eq!(coerce_value("revenue", &json!(true)), Cell::Bool(true));
        assert_eq!(coerce_value("revenue", &json!(null)), Cell::Null);
        assert_eq!(
            coerce_value("PeriodEndDate", &json!("2020-12-31T00:00:00")),
            Cell::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
        );
        assert_eq!(
            coerce_value("EntityName", &json!("2020-12-31")),
            Cell::Text("2020-12-31".to_string())
        );
    }

    #[test]
    fn cell_display() {
        assert_eq!(Cell::Number(1000.0).to_string(), "1000");
        assert_eq!(Cell::Number(0.25).to_string(), "0.25");
        assert_eq!(Cell::Null.to_string(), "");
    }
}
