use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which slices of history an open-ended period query returns.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodType {
    #[serde(rename = "annual")]
    Annual,
    #[serde(rename = "quarterly")]
    Quarterly,
    /// Annual and quarterly data together.
    #[serde(rename = "combined")]
    Combined,
    /// Trailing twelve months.
    #[serde(rename = "TTM", alias = "ttm")]
    TrailingTwelveMonths,
}

impl PeriodType {
    /// True when results are keyed by quarter rather than by year.
    pub const fn is_quarterly(self) -> bool {
        matches!(
            self,
            PeriodType::Quarterly | PeriodType::TrailingTwelveMonths
        )
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PeriodType::Annual => "annual",
                PeriodType::Quarterly => "quarterly",
                PeriodType::Combined => "combined",
                PeriodType::TrailingTwelveMonths => "TTM",
            }
        )
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annual" => Ok(PeriodType::Annual),
            "quarterly" => Ok(PeriodType::Quarterly),
            "combined" => Ok(PeriodType::Combined),
            "ttm" => Ok(PeriodType::TrailingTwelveMonths),
            _ => Err(format!(
                "period type must be one of \"annual\", \"quarterly\", \"combined\", \"TTM\", got '{}'",
                s
            )),
        }
    }
}
