//! Cursor pagination over search-style endpoints.
//!
//! A [`Paginator`] issues the same request repeatedly, echoing the cursor
//! from each response into `pageParameters.startOffset`, and hands records
//! out one at a time. Nothing is fetched until the caller asks, and page
//! N+1 is only requested once page N has been drained, so dropping the
//! paginator (or simply not calling `next` again) stops all traffic.

use std::collections::VecDeque;

use calcbench_api::types::{DisclosurePage, DisclosureResult};
use calcbench_api::{
    ApiQueryParams, CompaniesParameters, Cursor, DisclosureParameters, StandardizedParameters,
    Transport,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CalcbenchError;

/// One decoded page of a cursor endpoint.
pub trait CursorPage: DeserializeOwned {
    type Item;

    /// Splits the page into its records, the "more results" flag and the
    /// cursor for the following page.
    fn into_parts(self) -> (Vec<Self::Item>, bool, Option<Cursor>);
}

impl CursorPage for DisclosurePage {
    type Item = DisclosureResult;

    fn into_parts(self) -> (Vec<DisclosureResult>, bool, Option<Cursor>) {
        (self.footnotes, self.more_results, self.next_group_start_offset)
    }
}

/// Page parameters that carry a `startOffset` cursor.
pub trait CursorParameters: Serialize + Clone {
    fn set_start_offset(&mut self, cursor: Option<Cursor>);
}

impl CursorParameters for DisclosureParameters {
    fn set_start_offset(&mut self, cursor: Option<Cursor>) {
        self.start_offset = cursor;
    }
}

impl CursorParameters for StandardizedParameters {
    fn set_start_offset(&mut self, cursor: Option<Cursor>) {
        self.start_offset = cursor;
    }
}

/// Forward-only, lazily fetched sequence of records from one cursor loop.
pub struct Paginator<'a, T, P, R: CursorPage> {
    transport: &'a T,
    endpoint: &'static str,
    payload: ApiQueryParams<P>,
    buffer: VecDeque<R::Item>,
    pages_fetched: usize,
    exhausted: bool,
}

impl<'a, T, P, R> Paginator<'a, T, P, R>
where
    T: Transport,
    P: CursorParameters,
    R: CursorPage,
{
    pub fn new(transport: &'a T, endpoint: &'static str, payload: ApiQueryParams<P>) -> Self {
        Self {
            transport,
            endpoint,
            payload,
            buffer: VecDeque::new(),
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }

    /// Fetches the next whole page.
    ///
    /// Returns `None` once the service signals the end: `moreResults` false,
    /// a missing or null cursor, or a `null` body. After an error the
    /// paginator is exhausted and keeps returning `None`. Records already
    /// buffered by [`Paginator::next`] are not included.
    pub async fn next_page(&mut self) -> Option<Result<Vec<R::Item>, CalcbenchError>> {
        if self.exhausted {
            return None;
        }
        let page = self.pages_fetched + 1;
        let body = match serde_json::to_value(&self.payload) {
            Ok(body) => body,
            Err(e) => {
                self.exhausted = true;
                return Some(Err(CalcbenchError::Serialization(e)));
            }
        };
        tracing::debug!("requesting {} page {}", self.endpoint, page);
        self.pages_fetched = page;

        let response = match self.transport.post_json(self.endpoint, &body).await {
            Ok(response) => response,
            Err(source) => {
                tracing::error!("{} page {} failed: {}", self.endpoint, page, source);
                self.exhausted = true;
                return Some(Err(CalcbenchError::Pagination { page, source }));
            }
        };
        if response.is_null() {
            tracing::debug!("{} returned no body on page {}", self.endpoint, page);
            self.exhausted = true;
            return None;
        }

        let decoded: R = match serde_json::from_value::<R>(response) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.exhausted = true;
                return Some(Err(CalcbenchError::Pagination {
                    page,
                    source: calcbench_api::Error::Parse(e),
                }));
            }
        };
        let (items, more_results, cursor) = decoded.into_parts();
        match cursor {
            Some(cursor) if more_results && !cursor.is_null() => {
                self.payload.page_parameters.set_start_offset(Some(cursor));
            }
            _ => self.exhausted = true,
        }
        tracing::debug!(
            "{} page {} returned {} records",
            self.endpoint,
            page,
            items.len()
        );
        Some(Ok(items))
    }

    /// Next record, fetching another page only when the buffer is empty.
    pub async fn next(&mut self) -> Option<Result<R::Item, CalcbenchError>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            match self.next_page().await? {
                Ok(items) => self.buffer.extend(items),
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Drains the remaining records.
    pub async fn collect_all(mut self) -> Result<Vec<R::Item>, CalcbenchError> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}

/// Runs one full cursor loop per batch of identifiers, in batch order.
///
/// Payloads whose company section is not an identifier list run as a
/// single batch.
pub struct BatchedPaginator<'a, T, P, R: CursorPage> {
    transport: &'a T,
    endpoint: &'static str,
    batches: VecDeque<ApiQueryParams<P>>,
    batch_count: usize,
    current: Option<Paginator<'a, T, P, R>>,
    failed: bool,
}

impl<'a, T, P, R> BatchedPaginator<'a, T, P, R>
where
    T: Transport,
    P: CursorParameters,
    R: CursorPage,
{
    pub fn new(
        transport: &'a T,
        endpoint: &'static str,
        payload: ApiQueryParams<P>,
        batch_size: usize,
    ) -> Self {
        let batches = split_batches(payload, batch_size.max(1));
        tracing::debug!("{} split into {} batches", endpoint, batches.len());
        Self {
            transport,
            endpoint,
            batch_count: batches.len(),
            batches,
            current: None,
            failed: false,
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    /// Next record across all batches.
    pub async fn next(&mut self) -> Option<Result<R::Item, CalcbenchError>> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(paginator) = self.current.as_mut() {
                match paginator.next().await {
                    Some(Ok(item)) => return Some(Ok(item)),
                    Some(Err(e)) => {
                        self.failed = true;
                        self.current = None;
                        self.batches.clear();
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }
            let payload = self.batches.pop_front()?;
            self.current = Some(Paginator::new(self.transport, self.endpoint, payload));
        }
    }

    /// Drains every remaining batch.
    pub async fn collect_all(mut self) -> Result<Vec<R::Item>, CalcbenchError> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}

fn split_batches<P: Clone>(
    payload: ApiQueryParams<P>,
    batch_size: usize,
) -> VecDeque<ApiQueryParams<P>> {
    let identifiers = match &payload.companies_parameters {
        CompaniesParameters::Companies {
            company_identifiers,
            entire_universe: false,
        } if company_identifiers.len() > batch_size => Some(company_identifiers.clone()),
        _ => None,
    };
    let Some(identifiers) = identifiers else {
        return VecDeque::from([payload]);
    };
    identifiers
        .chunks(batch_size)
        .map(|chunk| ApiQueryParams {
            companies_parameters: CompaniesParameters::identifiers(chunk.to_vec()),
            period_parameters: payload.period_parameters.clone(),
            page_parameters: payload.page_parameters.clone(),
        })
        .collect()
}

/// Sends one non-paginated request and returns the raw body.
pub(crate) async fn post_once<T: Transport, P: Serialize>(
    transport: &T,
    endpoint: &str,
    payload: &P,
) -> Result<Value, CalcbenchError> {
    let body = serde_json::to_value(payload)?;
    Ok(transport.post_json(endpoint, &body).await?)
}
