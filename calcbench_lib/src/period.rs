//! Period resolution: which row key a fact lands on after pivoting.

use std::fmt;

use calcbench_api::types::{FactRecord, Period, PeriodArg, PeriodType};
use serde::{Serialize, Serializer};

/// Granularity of the rows of a pivoted table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PivotFrequency {
    #[default]
    Annual,
    Quarterly,
}

impl PivotFrequency {
    /// Quarterly when both range ends name a non-annual period, or when the
    /// period type is quarterly or TTM. Annual otherwise.
    pub fn resolve(
        start_period: Option<&PeriodArg>,
        end_period: Option<&PeriodArg>,
        period_type: Option<PeriodType>,
    ) -> Self {
        let quarterly_range = matches!(
            (start_period, end_period),
            (Some(start), Some(end)) if !start.is_annual() && !end.is_annual()
        );
        if quarterly_range || period_type.is_some_and(PeriodType::is_quarterly) {
            PivotFrequency::Quarterly
        } else {
            PivotFrequency::Annual
        }
    }
}

/// Calendar or fiscal periods. Only the chosen family keys rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PeriodBasis {
    #[default]
    Calendar,
    Fiscal,
}

impl PeriodBasis {
    pub fn from_fiscal(use_fiscal_period: bool) -> Self {
        if use_fiscal_period {
            PeriodBasis::Fiscal
        } else {
            PeriodBasis::Calendar
        }
    }

    /// The `(year, period)` pair of this family on a record.
    pub fn select(self, record: &FactRecord) -> (Option<i32>, Option<Period>) {
        match self {
            PeriodBasis::Calendar => (record.calendar_year, record.calendar_period),
            PeriodBasis::Fiscal => (record.fiscal_year, record.fiscal_period),
        }
    }
}

/// Row key of a pivoted table.
///
/// `NoPeriod` sorts before every real period. Real periods order by year,
/// then by [`Period`] display order, so annual rows follow the quarters of
/// the same year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    /// The fact carries no usable period, e.g. an entity name.
    NoPeriod,
    Period { year: i32, period: Period },
}

impl PeriodKey {
    pub fn annual(year: i32) -> Self {
        PeriodKey::Period {
            year,
            period: Period::Annual,
        }
    }

    pub fn quarter(year: i32, period: Period) -> Self {
        PeriodKey::Period { year, period }
    }

    pub fn is_no_period(&self) -> bool {
        matches!(self, PeriodKey::NoPeriod)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::NoPeriod => write!(f, "-"),
            PeriodKey::Period {
                year,
                period: Period::Annual,
            } => write!(f, "{}", year),
            PeriodKey::Period { year, period } => write!(f, "{}{}", year, period),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodKey::NoPeriod => serializer.serialize_none(),
            _ => serializer.collect_str(self),
        }
    }
}

/// Builds the row key for one fact.
///
/// A fact with a year and period keeps both in either mode, so annual and
/// quarterly facts of one year land on distinct rows. Annual mode also keys
/// a year without a period as the full year; quarterly mode needs both.
/// Whatever is missing yields [`PeriodKey::NoPeriod`] instead of an error.
pub fn period_key(year: Option<i32>, period: Option<Period>, frequency: PivotFrequency) -> PeriodKey {
    match (frequency, year, period) {
        (_, Some(year), Some(period)) => PeriodKey::quarter(year, period),
        (PivotFrequency::Annual, Some(year), None) => PeriodKey::annual(year),
        _ => PeriodKey::NoPeriod,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarterly_when_both_ends_are_quarters() {
        let q1 = PeriodArg::Period(Period::Q1);
        let q4 = PeriodArg::Period(Period::Q4);
        assert_eq!(
            PivotFrequency::resolve(Some(&q1), Some(&q4), None),
            PivotFrequency::Quarterly
        );
        assert_eq!(
            PivotFrequency::resolve(Some(&q1), None, None),
            PivotFrequency::Annual
        );
    }

    #[test]
    fn annual_when_an_end_is_annual() {
        let q1 = PeriodArg::Period(Period::Q1);
        let y = PeriodArg::from("Y");
        assert_eq!(
            PivotFrequency::resolve(Some(&q1), Some(&y), None),
            PivotFrequency::Annual
        );
        assert_eq!(PivotFrequency::resolve(None, None, None), PivotFrequency::Annual);
    }

    #[test]
    fn period_type_forces_quarterly() {
        assert_eq!(
            PivotFrequency::resolve(None, None, Some(PeriodType::TrailingTwelveMonths)),
            PivotFrequency::Quarterly
        );
        assert_eq!(
            PivotFrequency::resolve(None, None, Some(PeriodType::Quarterly)),
            PivotFrequency::Quarterly
        );
        assert_eq!(
            PivotFrequency::resolve(None, None, Some(PeriodType::Combined)),
            PivotFrequency::Annual
        );
    }

    #[test]
    fn missing_fields_yield_no_period() {
        assert_eq!(
            period_key(None, Some(Period::Q1), PivotFrequency::Quarterly),
            PeriodKey::NoPeriod
        );
        assert_eq!(
            period_key(Some(2020), None, PivotFrequency::Quarterly),
            PeriodKey::NoPeriod
        );
        assert_eq!(period_key(None, None, PivotFrequency::Annual), PeriodKey::NoPeriod);
        assert_eq!(
            period_key(Some(2020), None, PivotFrequency::Annual),
            PeriodKey::annual(2020)
        );
    }

    #[test]
    fn annual_mode_keeps_quarters_apart() {
        assert_eq!(
            period_key(Some(2020), Some(Period::Q2), PivotFrequency::Annual),
            PeriodKey::quarter(2020, Period::Q2)
        );
        assert_eq!(
            period_key(Some(2020), Some(Period::Annual), PivotFrequency::Annual),
            PeriodKey::annual(2020)
        );
    }

    #[test]
    fn keys_sort_no_period_first_then_annual_after_quarters() {
        let mut keys = vec![
            PeriodKey::annual(2020),
            PeriodKey::quarter(2021, Period::Q1),
            PeriodKey::quarter(2020, Period::Q4),
            PeriodKey::NoPeriod,
            PeriodKey::quarter(2020, Period::Q1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                PeriodKey::NoPeriod,
                PeriodKey::quarter(2020, Period::Q1),
                PeriodKey::quarter(2020, Period::Q4),
                PeriodKey::annual(2020),
                PeriodKey::quarter(2021, Period::Q1),
            ]
        );
    }

    #[test]
    fn display_and_serialize() {
        assert_eq!(PeriodKey::annual(2020).to_string(), "2020");
        assert_eq!(PeriodKey::quarter(2020, Period::Q3).to_string(), "2020Q3");
        assert_eq!(
            serde_json::to_value(PeriodKey::NoPeriod).unwrap(),
            serde_json::Value::Null
        );
        assert_eq!(
            serde_json::to_value(PeriodKey::quarter(2019, Period::H1)).unwrap(),
            serde_json::json!("2019H1")
        );
    }
}
