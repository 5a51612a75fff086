//! CLI subcommand implementations.

pub mod companies;
pub mod disclosures;
pub mod metrics;
pub mod standardized;
