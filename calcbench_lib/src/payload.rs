//! Request payload construction from validated selectors.
//!
//! Everything here is a pure function: validation already happened, so
//! building a payload cannot fail and performs no I/O.

use calcbench_api::types::CompanyIdentifier;
use calcbench_api::{
    ApiQueryParams, CompaniesParameters, CompaniesQuery, DateRange, DisclosureParameters,
    PeriodParameters, StandardizedParameters,
};

use crate::validation::{
    CompanyFilter, CompanySelector, PeriodSelector, ValidatedCompanyList,
    ValidatedDisclosureSearch, ValidatedQuery,
};

/// The `companiesParameters` section. Identifiers are sent in canonical case.
pub fn companies_parameters(selector: &CompanySelector) -> CompaniesParameters {
    match selector {
        CompanySelector::Identifiers(ids) => {
            CompaniesParameters::identifiers(ids.iter().map(CompanyIdentifier::normalized).collect())
        }
        CompanySelector::EntireUniverse => CompaniesParameters::entire_universe(),
        CompanySelector::Accession(id) => CompaniesParameters::Accession { accession_id: *id },
        CompanySelector::Filing(id) => CompaniesParameters::Filing { filing_id: *id },
    }
}

/// The `periodParameters` section of a standardized query.
///
/// Filing and accession ids are repeated here because the service reads
/// them from either section depending on the endpoint.
pub fn period_parameters(query: &ValidatedQuery) -> PeriodParameters {
    let (start_year, start_period, end_year, end_period) = query.periods.bounds();
    let (accession_id, filing_id) = match query.companies {
        CompanySelector::Accession(id) => (Some(id), None),
        CompanySelector::Filing(id) => (None, Some(id)),
        _ => (None, None),
    };
    PeriodParameters {
        year: start_year.cloned(),
        period: start_period.cloned(),
        end_year: end_year.cloned(),
        end_period: end_period.cloned(),
        all_history: Some(query.periods == PeriodSelector::AllHistory),
        period_type: query.period_type,
        use_fiscal_period: Some(query.use_fiscal_period),
        update_date: query.update_date,
        updated_from: None,
        date_range: (query.start_date.is_some() || query.end_date.is_some()).then(|| DateRange {
            start_date: query.start_date,
            end_date: query.end_date,
        }),
        all_modifications: Some(query.all_modifications),
        accession_id,
        filing_id,
    }
}

/// The `pageParameters` section of a standardized query.
pub fn standardized_parameters(query: &ValidatedQuery) -> StandardizedParameters {
    StandardizedParameters {
        metrics: query.metrics.metrics.clone(),
        include_trace: query.include_trace,
        point_in_time: query.point_in_time,
        include_preliminary: query.include_preliminary,
        all_footnotes: query.metrics.all_footnotes,
        all_face: query.metrics.all_face,
        include_xbrl: query.include_xbrl,
        all_non_gaap: query.metrics.all_non_gaap,
        all_metrics: query.metrics.all_metrics,
        xbrl_only: query.xbrl_only,
        point_in_time_v2: query.point_in_time_v2,
        start_offset: None,
    }
}

/// Full request body for the `mappedData` endpoint.
pub fn standardized_payload(query: &ValidatedQuery) -> ApiQueryParams<StandardizedParameters> {
    ApiQueryParams {
        companies_parameters: companies_parameters(&query.companies),
        period_parameters: period_parameters(query),
        page_parameters: standardized_parameters(query),
    }
}

/// Full request body for the first page of a `footnoteSearch` call.
///
/// Identifier lists are sent whole; splitting into batches is the
/// paginator's job.
pub fn disclosure_payload(search: &ValidatedDisclosureSearch) -> ApiQueryParams<DisclosureParameters> {
    let accession_id = match search.companies {
        CompanySelector::Accession(id) => Some(id),
        _ => None,
    };
    ApiQueryParams {
        companies_parameters: companies_parameters(&search.companies),
        period_parameters: PeriodParameters {
            year: search.year.clone(),
            period: search.period.clone(),
            all_history: Some(search.all_history),
            period_type: search.period_type,
            use_fiscal_period: Some(search.use_fiscal_period),
            updated_from: search.updated_from,
            accession_id,
            ..Default::default()
        },
        page_parameters: DisclosureParameters {
            full_text_query: search.full_text_search.clone(),
            footnote_type: search.document_type.clone(),
            footnote_tag: search.block_tag_name.clone(),
            disclosure_name: search.document_name.clone(),
            disclosure_names: search.disclosure_names.clone(),
            limit: search.limit,
            sub_divide: search.sub_divide,
            all_footnotes: search.all_documents,
            all_text_blocks: search.all_text_blocks,
            start_offset: None,
        },
    }
}

/// Request body for the `companies` endpoint.
pub fn companies_query(list: &ValidatedCompanyList) -> CompaniesQuery {
    let mut query = CompaniesQuery {
        include_most_recent_filing_extras: list.include_most_recent_filing_extras,
        ..Default::default()
    };
    match &list.filter {
        CompanyFilter::Index(index) => query.index = Some(*index),
        CompanyFilter::SicCodes(codes) => query.sic_codes = Some(codes.clone()),
        CompanyFilter::NaicsCodes(codes) => query.naics_codes = Some(codes.clone()),
        CompanyFilter::Identifiers(ids) => {
            query.company_identifiers = Some(ids.iter().map(CompanyIdentifier::normalized).collect())
        }
        CompanyFilter::EntireUniverse => query.universe = Some(true),
    }
    query
}
