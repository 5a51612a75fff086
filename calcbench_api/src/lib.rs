mod client;
mod errors;
mod query;
mod transport;
pub mod types;
pub use self::client::{Client, Credentials, DEFAULT_API_URL, DEFAULT_LOGON_URL};
pub use self::errors::Error;
pub use self::query::{
    ApiQueryParams, CompaniesParameters, CompaniesQuery, Cursor, DateRange, DisclosureParameters,
    PeriodParameters, StandardizedParameters,
};
pub use self::transport::Transport;
