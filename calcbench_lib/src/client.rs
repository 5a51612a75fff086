//! Session-scoped client context.

use calcbench_api::types::{CompanyRecord, DisclosurePage, FactRecord, MetricCatalog};
use calcbench_api::{Client, Credentials, DisclosureParameters, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::CalcbenchError;
use crate::normalize::{pivot, Orientation, PivotOptions, PivotOutcome};
use crate::pagination::{post_once, BatchedPaginator};
use crate::payload::{companies_query, disclosure_payload, standardized_payload};
use crate::validation::{
    validate_company_list, validate_disclosure_search, validate_standardized, CompanyListArgs,
    DisclosureArgs, StandardizedArgs, DISCLOSURE_BATCH_SIZE,
};

const MAPPED_DATA: &str = "mappedData";
const FOOTNOTE_SEARCH: &str = "footnoteSearch";
const COMPANIES: &str = "companies";
const AVAILABLE_METRICS: &str = "availableMetrics";

/// Disclosure search results, fetched lazily batch by batch.
pub type DisclosureStream<'a, T> = BatchedPaginator<'a, T, DisclosureParameters, DisclosurePage>;

/// Explicit session context passed to every operation.
///
/// Generic over the [`Transport`] so the core can run against an
/// authenticated [`Client`] or an in-memory fake.
pub struct CalcbenchClient<T = Client> {
    transport: T,
}

impl CalcbenchClient<Client> {
    /// Logs on and returns a ready session.
    pub async fn connect(
        config: &ClientConfig,
        credentials: &Credentials,
    ) -> Result<Self, CalcbenchError> {
        tracing::info!("connecting to {} as {}", config.api_url, credentials.user_name());
        let client = Client::connect(
            &config.api_url,
            &config.logon_url,
            config.timeout,
            credentials,
        )
        .await?;
        Ok(Self::from_transport(client))
    }

    /// Ends the session.
    pub fn close(self) {
        self.transport.close();
    }
}

impl<T: Transport> CalcbenchClient<T> {
    pub fn from_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Standardized facts exactly as the service returns them.
    ///
    /// Arguments are validated before anything is sent.
    pub async fn standardized_raw(
        &self,
        args: &StandardizedArgs,
    ) -> Result<Vec<FactRecord>, CalcbenchError> {
        let query = validate_standardized(args)?;
        let payload = standardized_payload(&query);
        let body = post_once(&self.transport, MAPPED_DATA, &payload).await?;
        decode_list(body)
    }

    /// Standardized facts pivoted into a wide table.
    pub async fn standardized_table(
        &self,
        args: &StandardizedArgs,
        orientation: Orientation,
    ) -> Result<PivotOutcome, CalcbenchError> {
        let query = validate_standardized(args)?;
        let payload = standardized_payload(&query);
        let body = post_once(&self.transport, MAPPED_DATA, &payload).await?;
        let records = decode_list(body)?;
        tracing::debug!("pivoting {} facts", records.len());
        pivot(&records, &PivotOptions::from_query(&query, orientation))
    }

    /// Searches disclosures. Nothing is fetched until the stream is polled;
    /// identifier lists are split into batches of 30.
    pub fn disclosure_search(
        &self,
        args: &DisclosureArgs,
    ) -> Result<DisclosureStream<'_, T>, CalcbenchError> {
        let search = validate_disclosure_search(args)?;
        Ok(BatchedPaginator::new(
            &self.transport,
            FOOTNOTE_SEARCH,
            disclosure_payload(&search),
            DISCLOSURE_BATCH_SIZE,
        ))
    }

    /// Companies matching one filter: an index, SIC or NAICS codes, explicit
    /// identifiers or the whole universe.
    pub async fn companies(
        &self,
        args: &CompanyListArgs,
    ) -> Result<Vec<CompanyRecord>, CalcbenchError> {
        let list = validate_company_list(args)?;
        let body = post_once(&self.transport, COMPANIES, &companies_query(&list)).await?;
        decode_list(body)
    }

    /// Tickers of the companies matching `args`, in the order the service
    /// lists them.
    pub async fn tickers(&self, args: &CompanyListArgs) -> Result<Vec<String>, CalcbenchError> {
        let companies = self.companies(args).await?;
        Ok(companies.into_iter().map(|c| c.ticker).collect())
    }

    /// The standardized metrics dictionary, keyed by category.
    pub async fn available_metrics(&self) -> Result<MetricCatalog, CalcbenchError> {
        let body = self.transport.get_json(AVAILABLE_METRICS).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn decode_list<R: DeserializeOwned>(body: Value) -> Result<Vec<R>, CalcbenchError> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(body)?)
}
