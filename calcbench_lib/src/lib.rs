//! Library layer for the Calcbench client: query validation, period
//! resolution, payload building, cursor pagination and fact pivoting.
//!
//! Wraps the `calcbench_api` wire crate with an explicit session context
//! that is generic over the transport.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod payload;
pub mod period;
pub mod validation;

#[cfg(test)]
mod testing;

pub use calcbench_api;
pub use calcbench_api::types;
pub use calcbench_api::{Credentials, Transport};

pub use client::{CalcbenchClient, DisclosureStream};
pub use config::{credentials_from_env, ClientConfig};
pub use error::CalcbenchError;
pub use normalize::{
    normalize, pivot, Cell, ColumnKey, Diagnostics, DuplicateRow, NormalizedFact, Orientation,
    PivotOptions, PivotOutcome, RowKey, WideTable,
};
pub use pagination::{BatchedPaginator, CursorPage, CursorParameters, Paginator};
pub use period::{period_key, PeriodBasis, PeriodKey, PivotFrequency};
pub use validation::{
    validate_company_list, validate_disclosure_search, validate_standardized, CompanyFilter,
    CompanyListArgs, CompanySelector, DisclosureArgs, ListArg, MetricSelection, PeriodSelector,
    StandardizedArgs, ValidatedCompanyList, ValidatedDisclosureSearch, ValidatedQuery,
    ValidationError,
};
